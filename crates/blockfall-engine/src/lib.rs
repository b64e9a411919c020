//! Falling-block puzzle engine.
//!
//! The [`core`] module holds pure geometry (pieces, rotation tables and the
//! settled grid); the [`engine`] module builds the game rules on top of it.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
