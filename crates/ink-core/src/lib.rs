//! ink-core: Shared types for handwriting recordings
//!
//! A recording is the ordered sample stream captured from a digitizing
//! tablet while one participant performs one handwriting task. This crate
//! owns the fixed raw schema (`time`, `x`, `y`, `pressure`, `azimuth`,
//! `altitude`) and the immutable [`Recording`] handed to the feature engine.

mod error;
mod recording;
mod sample;

pub use error::*;
pub use recording::*;
pub use sample::*;
