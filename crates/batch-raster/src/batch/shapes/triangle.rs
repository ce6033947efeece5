use crate::batch::{DrawCall, DrawQueues, Mode, PrimitiveKind};
use crate::paint::Argb;

/// Triangle given by three vertices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TriangleCall {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub color: Argb,
}

impl TriangleCall {
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: Argb) -> Self {
        Self { x0, y0, x1, y1, x2, y2, color }
    }

    /// Sorts the vertices so that `y0 <= y1 <= y2`.
    ///
    /// Returns `None` for a triangle whose three vertices share one y; those
    /// are dropped instead of rasterized. Vertices with equal y keep their
    /// relative order, which decides the winding the fill kernel sees.
    pub fn normalized(self) -> Option<Self> {
        let Self { mut x0, mut y0, mut x1, mut y1, mut x2, mut y2, color } = self;
        if y0 == y1 && y0 == y2 {
            return None;
        }
        if y0 > y1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }
        if y0 > y2 {
            std::mem::swap(&mut x0, &mut x2);
            std::mem::swap(&mut y0, &mut y2);
        }
        if y1 > y2 {
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut y1, &mut y2);
        }
        Some(Self::new(x0, y0, x1, y1, x2, y2, color))
    }
}

impl DrawQueues {
    /// Records a stroked or filled triangle.
    ///
    /// Returns `false` when the triangle was dropped as degenerate (all y equal).
    #[inline]
    pub fn push_triangle(
        &mut self,
        mode: Mode,
        (x0, y0): (i32, i32),
        (x1, y1): (i32, i32),
        (x2, y2): (i32, i32),
        color: Argb,
    ) -> bool {
        let Some(call) = TriangleCall::new(x0, y0, x1, y1, x2, y2, color).normalized() else {
            log::trace!("dropping flat triangle at y={y0}");
            return false;
        };
        self.push(PrimitiveKind::triangle(mode), DrawCall::Triangle(call));
        true
    }
}
