use crate::batch::{DrawCall, DrawQueues, Mode, PrimitiveKind};
use crate::paint::Argb;

/// Circle around an integer centre.
///
/// Negative radii are stored as given; no pixel ever satisfies their test.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CircleCall {
    pub cx: i32,
    pub cy: i32,
    pub radius: i32,
    pub color: Argb,
}

impl CircleCall {
    #[inline]
    pub fn new(cx: i32, cy: i32, radius: i32, color: Argb) -> Self {
        Self { cx, cy, radius, color }
    }
}

impl DrawQueues {
    /// Records a stroked or filled circle.
    #[inline]
    pub fn push_circle(&mut self, mode: Mode, cx: i32, cy: i32, radius: i32, color: Argb) {
        self.push(
            PrimitiveKind::circle(mode),
            DrawCall::Circle(CircleCall::new(cx, cy, radius, color)),
        );
    }
}
