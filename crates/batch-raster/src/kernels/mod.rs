//! Per-pixel membership tests.
//!
//! Every kernel is a pure predicate over `(pixel x, pixel y, draw record)`:
//! no scanline state, no dependence on other pixels or other calls. A launch
//! evaluates the predicate for every (pixel, call) pair and overwrites the
//! pixel with the call's color when it holds.
//!
//! The CPU accelerator calls these functions directly through [`predicate`].
//! `device/shaders/raster.wgsl` carries the same rules for the GPU; keep the
//! two in step.

pub mod circle;
pub mod line;
pub mod rect;
pub mod triangle;

use crate::batch::{DrawRecord, PrimitiveKind};

/// Membership test of one pixel against one draw record.
pub type Predicate = fn(i32, i32, &DrawRecord) -> bool;

/// Kernel table indexed by [`PrimitiveKind::index`].
const TABLE: [Predicate; PrimitiveKind::COUNT] = [
    line::stroke,
    triangle::stroke,
    triangle::fill,
    rect::stroke,
    rect::fill,
    circle::stroke,
    circle::fill,
];

/// Returns the kernel for `kind`.
#[inline]
pub fn predicate(kind: PrimitiveKind) -> Predicate {
    TABLE[kind.index()]
}

/// Evaluates `kind` over a whole `width`-wide raster serially.
///
/// Reference rasterizer used by tests; devices run the same predicates in parallel.
pub fn rasterize_serial(kind: PrimitiveKind, width: u32, pixels: &mut [u32], records: &[DrawRecord]) {
    let test = predicate(kind);
    let width = width as usize;
    for (i, px) in pixels.iter_mut().enumerate() {
        let (x, y) = ((i % width) as i32, (i / width) as i32);
        for record in records {
            if test(x, y, record) {
                *px = record.color;
            }
        }
    }
}
