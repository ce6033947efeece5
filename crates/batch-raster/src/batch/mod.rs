//! Draw-call batching.
//!
//! Responsibilities:
//! - renderer-agnostic draw-call records, one immutable value per primitive instance
//! - parameter normalisation at enqueue time (endpoint swaps, vertex sorting)
//! - one queue per (primitive, mode) pair, drained in a fixed flush order
//!
//! Shape-specific constructors and push helpers live under `batch::shapes`.

mod cmd;
mod kind;
mod queue;
mod record;

pub mod shapes;

pub use cmd::DrawCall;
pub use kind::{Mode, PrimitiveKind};
pub use queue::DrawQueues;
pub use record::DrawRecord;
