use std::time::{Duration, Instant};

use super::event::TuiEvent;

/// When the runtime asks the application to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Draw after every tick or terminal event.
    #[default]
    OnDirty,
    /// Draw after a tick or terminal event, at most once per interval.
    Throttled(Duration),
}

impl RenderMode {
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Decides which timed event is due next.
///
/// Terminal events are not produced here; the caller waits for them for at
/// most [`wait_time`](Self::wait_time) and reports them via
/// [`mark_dirty`](Self::mark_dirty).
#[derive(Debug, Default)]
pub(super) struct Schedule {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Option<Instant>,
    last_render: Option<Instant>,
    dirty: bool,
}

impl Schedule {
    pub(super) fn new() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub(super) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the tick or render event due at `now`, recording it as
    /// delivered. Ticks take precedence over renders.
    pub(super) fn due(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(interval) = self.tick_interval
            && elapsed(self.last_tick, now, interval)
        {
            self.last_tick = Some(now);
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }

        let render = match self.render_mode {
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && elapsed(self.last_render, now, interval)
            }
        };
        if render {
            self.last_render = Some(now);
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    /// How long to wait for terminal input before the next timed event.
    /// `None` means nothing is scheduled.
    pub(super) fn wait_time(&self, now: Instant) -> Option<Duration> {
        let next_tick = self
            .tick_interval
            .map(|interval| next_at(self.last_tick, now, interval));
        let next_render = match self.render_mode {
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => {
                self.dirty.then(|| next_at(self.last_render, now, interval))
            }
        };
        let at = [next_tick, next_render].into_iter().flatten().min()?;
        Some(at.saturating_duration_since(now))
    }
}

fn elapsed(last: Option<Instant>, now: Instant, interval: Duration) -> bool {
    last.is_none_or(|last| now.saturating_duration_since(last) >= interval)
}

fn next_at(last: Option<Instant>, now: Instant, interval: Duration) -> Instant {
    last.map_or(now, |last| last + interval)
}
