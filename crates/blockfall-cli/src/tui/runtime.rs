use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use super::{App, RenderMode, event::TuiEvent, schedule::Schedule};

/// Runs an [`App`] in the terminal.
#[derive(Debug)]
pub struct Runtime {
    schedule: Schedule,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates a runtime that does not tick and redraws after every terminal
    /// event.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schedule: Schedule::new(),
        }
    }

    /// Sets the number of ticks per second. `None` stops ticking.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.schedule
            .set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.schedule.set_render_mode(mode);
    }

    /// Takes over the terminal and dispatches events to `app` until it asks
    /// to exit. The terminal is restored on return.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.next_event()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Terminal(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }

    fn next_event(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.schedule.due(now) {
                return Ok(event);
            }
            if let Some(timeout) = self.schedule.wait_time(now)
                && !event::poll(timeout)?
            {
                continue;
            }
            self.schedule.mark_dirty();
            return Ok(event::read()?.into());
        }
    }
}
