use bytemuck::{Pod, Zeroable};

use crate::paint::Argb;

/// Upload format of one draw call (32 bytes).
///
///  offset  0  coords  [i32; 6]   primitive-specific, unused slots are zero
///  offset 24  color   u32        packed 0xAARRGGBB
///  offset 28  _pad    u32
///
/// Coordinate slots per primitive:
/// - line / rectangle: `x0, y0, x1, y1`
/// - triangle:         `x0, y0, x1, y1, x2, y2`
/// - circle:           `cx, cy, radius`
///
/// Must match `DrawRecord` in `device/shaders/raster.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawRecord {
    pub coords: [i32; 6],
    pub color: Argb,
    pub _pad: u32,
}

impl DrawRecord {
    #[inline]
    pub const fn new(coords: [i32; 6], color: Argb) -> Self {
        Self { coords, color, _pad: 0 }
    }
}
