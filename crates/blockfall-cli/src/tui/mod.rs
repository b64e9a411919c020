//! Minimal frame loop for ratatui applications.
//!
//! A [`Runtime`] owns the terminal for the duration of [`Runtime::run`] and
//! feeds an [`App`] with ticks, render requests and terminal events.

pub use self::{app::App, runtime::Runtime, schedule::RenderMode};

mod app;
mod event;
mod runtime;
mod schedule;
