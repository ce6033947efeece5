use crate::batch::{DrawCall, DrawQueues, PrimitiveKind};
use crate::paint::Argb;

/// Line segment between two pixel centres. Stroke only.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineCall {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub color: Argb,
}

impl LineCall {
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) -> Self {
        Self { x0, y0, x1, y1, color }
    }

    /// Orders the endpoints so that `x0 <= x1`; y follows its x.
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
    /// Records a line.
    #[inline]
    pub fn push_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) {
        let call = LineCall::new(x0, y0, x1, y1, color).normalized();
        self.push(PrimitiveKind::LineStroke, DrawCall::Line(call));
    }
}
