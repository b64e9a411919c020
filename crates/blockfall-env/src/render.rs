use blockfall_engine::{Board, Grid, PieceSource};

const TITLE: &str = "=== Blockfall ===";
const BLOCK: &str = "██";
const EMPTY: &str = "  ";
const CONTROLS: [&str; 6] = [
    "Controls:",
    "A/D or ←/→: Move",
    "W or ↑: Rotate",
    "S or ↓: Soft Drop",
    "Space: Hard Drop",
    "Q: Quit",
];

/// Draws `board` as plain text, two characters per cell.
pub(crate) fn render_text<S>(board: &Board<S>) -> String
where
    S: PieceSource,
{
    let mut lines = vec![
        TITLE.to_owned(),
        String::new(),
        format!("Score: {}", board.score()),
        format!("Level: {}", board.level()),
        format!("Lines: {}", board.lines_cleared()),
        String::new(),
    ];

    if let Some(next) = board.next_piece() {
        lines.push("Next:".to_owned());
        for row in next.shape() {
            let line: String = row
                .iter()
                .map(|&filled| if filled { BLOCK } else { EMPTY })
                .collect();
            lines.push(line);
        }
    }
    lines.push(String::new());

    let border = "──".repeat(Grid::WIDTH);
    lines.push(format!("┌{border}┐"));
    for row in board.board_with_piece_overlay().rows() {
        let line: String = row
            .iter()
            .map(|cell| if cell.is_filled() { BLOCK } else { EMPTY })
            .collect();
        lines.push(format!("│{line}│"));
    }
    lines.push(format!("└{border}┘"));

    if board.is_game_over() {
        lines.push(String::new());
        lines.push("GAME OVER".to_owned());
    }

    lines.push(String::new());
    lines.extend(CONTROLS.map(str::to_owned));
    lines.join("\n")
}
