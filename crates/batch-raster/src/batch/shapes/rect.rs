use crate::batch::{DrawCall, DrawQueues, Mode, PrimitiveKind};
use crate::paint::Argb;

/// Axis-aligned rectangle given by two opposite corners (both inclusive).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RectCall {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub color: Argb,
}

impl RectCall {
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) -> Self {
        Self { x0, y0, x1, y1, color }
    }

    /// Orders the corners so that `x0 <= x1`; y follows its x.
    ///
    /// The y order is left alone; kernels take min/max per axis anyway.
    #[inline]
    pub fn normalized(self) -> Self {
        if self.x0 > self.x1 {
            Self::new(self.x1, self.y1, self.x0, self.y0, self.color)
        } else {
            self
        }
    }
}

impl DrawQueues {
    /// Records a stroked or filled rectangle.
    #[inline]
    pub fn push_rectangle(&mut self, mode: Mode, x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) {
        let call = RectCall::new(x0, y0, x1, y1, color).normalized();
        self.push(PrimitiveKind::rectangle(mode), DrawCall::Rectangle(call));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_swaps_corners_in_lockstep() {
        let r = RectCall::new(8, 0, 1, 5, 3).normalized();
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (1, 5, 8, 0));
    }

    #[test]
    fn push_routes_by_mode() {
        let mut q = DrawQueues::new();
        q.push_rectangle(Mode::Stroke, 0, 0, 1, 1, 1);
        q.push_rectangle(Mode::Fill, 0, 0, 1, 1, 1);
        assert_eq!(q.len(PrimitiveKind::RectangleStroke), 1);
        assert_eq!(q.len(PrimitiveKind::RectangleFill), 1);
    }
}
