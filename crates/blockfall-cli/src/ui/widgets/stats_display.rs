use std::iter;

use blockfall_engine::GameStats;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::style;

pub struct StatsDisplay<'a> {
    stats: &'a GameStats,
    fall_speed: u64,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(stats: &'a GameStats, fall_speed: u64) -> Self {
        Self {
            stats,
            fall_speed,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let rows: u16 = ROWS.iter().map(|row| row.height()).sum();
        rows + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = fn(&StatsDisplay<'_>) -> String;

/// One line of the stats panel.
#[derive(Clone, Copy)]
enum Row {
    Gap,
    /// Label on its own line; the value goes right-aligned on the next one.
    Headline(&'static str, Value),
    Field(&'static str, Value),
}

impl Row {
    fn height(self) -> u16 {
        match self {
            Self::Gap | Self::Field(..) => 1,
            Self::Headline(..) => 2,
        }
    }
}

fn clears(d: &StatsDisplay<'_>, lines: usize) -> String {
    d.stats.line_clear_counter()[lines].to_string()
}

const ROWS: &[Row] = &[
    Row::Headline("SCORE:", |d| d.stats.score().to_string()),
    Row::Gap,
    Row::Field("LEVEL:", |d| d.stats.level().to_string()),
    Row::Field("LINES:", |d| d.stats.lines_cleared().to_string()),
    Row::Field("PIECES:", |d| d.stats.completed_pieces().to_string()),
    Row::Field("SPEED:", |d| format!("{}f", d.fall_speed)),
    Row::Gap,
    Row::Field("SINGLES:", |d| clears(d, 1)),
    Row::Field("DOUBLES:", |d| clears(d, 2)),
    Row::Field("TRIPLES:", |d| clears(d, 3)),
    Row::Field("TETRIS:", |d| clears(d, 4)),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let heights = ROWS.iter().map(|row| Constraint::Length(row.height()));
        let row_areas = area.layout_vec(&Layout::vertical(heights));

        for (row, row_area) in iter::zip(ROWS, row_areas) {
            let (label, value) = match *row {
                Row::Gap => continue,
                Row::Headline(label, value) | Row::Field(label, value) => (label, value(&self)),
            };
            let label = Line::styled(label, style::DEFAULT).left_aligned();
            let value = Line::styled(value, style::DEFAULT).right_aligned();
            // a headline puts its value on a second line, a field shares one
            let [label_area, value_area] = if row.height() == 2 {
                row_area.layout(&Layout::vertical([Constraint::Length(1); 2]))
            } else {
                row_area.layout(&Layout::horizontal([Constraint::Fill(1); 2]))
            };
            label.render(label_area, buf);
            value.render(value_area, buf);
        }
    }
}
