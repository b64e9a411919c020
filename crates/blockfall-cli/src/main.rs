mod command;
mod input;
mod logging;
mod tui;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
