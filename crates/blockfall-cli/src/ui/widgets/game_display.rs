use blockfall_engine::{Board, PieceSource};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// What is shown on top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Start,
    Paused,
    GameOver,
}

/// Board, next piece and stats side by side, with an optional popup.
#[derive(Debug)]
pub struct GameDisplay<'a, S> {
    board: &'a Board<S>,
    fall_speed: u64,
    show_ghost: bool,
    overlay: Option<Overlay>,
}

impl<'a, S> GameDisplay<'a, S>
where
    S: PieceSource,
{
    pub fn new(board: &'a Board<S>, fall_speed: u64) -> Self {
        Self {
            board,
            fall_speed,
            show_ghost: true,
            overlay: None,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn overlay(self, overlay: Option<Overlay>) -> Self {
        Self { overlay, ..self }
    }

    fn border_color(&self) -> Color {
        match self.overlay {
            None | Some(Overlay::Start) => color::WHITE,
            Some(Overlay::Paused) => color::YELLOW,
            Some(Overlay::GameOver) => color::RED,
        }
    }

    fn popup(&self) -> Option<(Text<'static>, Style)> {
        let popup = match self.overlay? {
            Overlay::Start => (
                Text::from(vec![
                    Line::from("BLOCKFALL"),
                    Line::default(),
                    Line::from("Press any key to start"),
                    Line::from("Q quit"),
                ]),
                style::DEFAULT,
            ),
            Overlay::Paused => (
                Text::from(vec![Line::from("PAUSED"), Line::from("P resume")]),
                style::PAUSED,
            ),
            Overlay::GameOver => (
                Text::from(vec![
                    Line::from("GAME OVER"),
                    Line::default(),
                    Line::from(format!("Score: {}", self.board.score())),
                    Line::from(format!("Level: {}", self.board.level())),
                    Line::from(format!("Lines: {}", self.board.lines_cleared())),
                    Line::default(),
                    Line::from("R restart / Q quit"),
                ]),
                style::GAME_OVER,
            ),
        };
        Some(popup)
    }
}

impl<S> Widget for GameDisplay<'_, S>
where
    S: PieceSource,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl<S> Widget for &GameDisplay<'_, S>
where
    S: PieceSource,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = self.border_color();
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(Padding::horizontal(1))
                .border_style(border_color)
                .style(style::DEFAULT)
        };

        let hide_piece = self.overlay == Some(Overlay::Start);
        let falling_piece = self.board.current_piece().filter(|_| !hide_piece);
        let ghost = self
            .board
            .drop_position()
            .filter(|_| self.show_ghost && !hide_piece && !self.board.is_game_over());
        let board = BoardDisplay::new(self.board.cells())
            .falling_piece(falling_piece)
            .ghost(ghost)
            .block(
                Block::bordered()
                    .border_style(border_color)
                    .style(style::DEFAULT),
            );
        let next = PieceDisplay::new(self.board.next_piece().map(|piece| piece.kind()))
            .block(panel("NEXT"));
        let stats = StatsDisplay::new(self.board.stats(), self.fall_speed).block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(board.width()),
            Constraint::Length(next.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(center_column);
        let [next_area] = Layout::vertical([Constraint::Length(next.height())]).areas(right_column);

        let board_width = board.width();
        stats.render(stats_area, buf);
        board.render(board_area, buf);
        next.render(next_area, buf);

        if let Some((text, style)) = self.popup() {
            #[expect(clippy::cast_possible_truncation)]
            let height = text.lines.len() as u16 + 2;
            let area =
                board_area.centered(Constraint::Length(board_width), Constraint::Length(height));
            let block = Block::new().style(style);
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.style(style).centered().render(
                inner.centered_vertically(Constraint::Length(height - 2)),
                buf,
            );
        }
    }
}
