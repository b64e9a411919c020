use crossterm::event::Event;
use ratatui::Frame;

use super::Runtime;

/// An application driven by [`Runtime::run`].
pub trait App {
    /// Called once before the first event. Configure the tick rate and
    /// render mode here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles a terminal event. The runtime may be reconfigured in response,
    /// e.g. to stop ticking while paused.
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Advances the application by one tick.
    fn update(&mut self, runtime: &mut Runtime);

    fn draw(&self, frame: &mut Frame);
}
