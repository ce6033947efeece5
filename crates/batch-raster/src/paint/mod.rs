//! Packed color helpers.
//!
//! Every pixel and every draw call carries a single `u32` in `0xAARRGGBB`
//! layout; this module only names that convention.

pub mod color;

pub use color::{Argb, BLACK, OPAQUE_ALPHA, TRANSPARENT, WHITE};
