use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, game_display::*, key_binding_display::*,
    piece_display::*, stats_display::*,
};

mod board_display;
mod cell_display;
mod game_display;
mod key_binding_display;
mod piece_display;
mod stats_display;

pub mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 240, 240);
    pub const YELLOW: Color = Color::Rgb(240, 240, 0);
    pub const PURPLE: Color = Color::Rgb(160, 0, 240);
    pub const GREEN: Color = Color::Rgb(0, 240, 0);
    pub const RED: Color = Color::Rgb(240, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 240);
    pub const ORANGE: Color = Color::Rgb(240, 160, 0);
    pub const GRAY: Color = Color::Rgb(110, 110, 110);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn solid(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = solid(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::GRAY, color::BLACK);

    pub const PAUSED: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);

    pub const I_PIECE: Style = solid(color::CYAN);
    pub const O_PIECE: Style = solid(color::YELLOW);
    pub const T_PIECE: Style = solid(color::PURPLE);
    pub const S_PIECE: Style = solid(color::GREEN);
    pub const Z_PIECE: Style = solid(color::RED);
    pub const J_PIECE: Style = solid(color::BLUE);
    pub const L_PIECE: Style = solid(color::ORANGE);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let probe = Rect::new(0, 0, 100, 100);
    probe.height - block.map_or(probe, |block| block.inner(probe)).height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let probe = Rect::new(0, 0, 100, 100);
    probe.width - block.map_or(probe, |block| block.inner(probe)).width
}
