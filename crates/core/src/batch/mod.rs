//! Batch ticket submission.
//!
//! `submit` walks the loaded rows in order, sends one creation request per
//! row and turns every outcome into counters. `spawn_batch` runs the same loop
//! on a background task and streams progress snapshots over a channel.

mod handle;
mod runner;
mod types;

pub use handle::{spawn_batch, BatchHandle};
pub use runner::submit;
pub use types::*;
