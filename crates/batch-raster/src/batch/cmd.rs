use crate::paint::Argb;

use super::shapes::circle::CircleCall;
use super::shapes::line::LineCall;
use super::shapes::rect::RectCall;
use super::shapes::triangle::TriangleCall;
use super::{DrawRecord, Mode, PrimitiveKind};

/// A single queued draw call.
///
/// Extending the batcher:
/// - add a new shape module under `batch::shapes::*`
/// - add a new variant here and a record encoding in [`DrawCall::to_record`]
/// - add the matching `PrimitiveKind` entries and kernels
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Line(LineCall),
    Triangle(TriangleCall),
    Rectangle(RectCall),
    Circle(CircleCall),
}

impl DrawCall {
    #[inline]
    pub fn color(&self) -> Argb {
        match self {
            DrawCall::Line(c) => c.color,
            DrawCall::Triangle(c) => c.color,
            DrawCall::Rectangle(c) => c.color,
            DrawCall::Circle(c) => c.color,
        }
    }

    /// The queue/kernel this call runs under. Lines have no fill; they always
    /// map to [`PrimitiveKind::LineStroke`].
    pub fn kind(&self, mode: Mode) -> PrimitiveKind {
        match self {
            DrawCall::Line(_) => PrimitiveKind::LineStroke,
            DrawCall::Triangle(_) => PrimitiveKind::triangle(mode),
            DrawCall::Rectangle(_) => PrimitiveKind::rectangle(mode),
            DrawCall::Circle(_) => PrimitiveKind::circle(mode),
        }
    }

    /// Applies the enqueue-time normalisation of the call's shape.
    ///
    /// `None` means the call is dropped (a flat triangle).
    pub fn normalized(self) -> Option<Self> {
        match self {
            DrawCall::Line(c) => Some(DrawCall::Line(c.normalized())),
            DrawCall::Triangle(c) => c.normalized().map(DrawCall::Triangle),
            DrawCall::Rectangle(c) => Some(DrawCall::Rectangle(c.normalized())),
            DrawCall::Circle(c) => Some(DrawCall::Circle(c)),
        }
    }

    /// Encodes the call into the fixed-size upload format shared by every kernel.
    pub fn to_record(&self) -> DrawRecord {
        match *self {
            DrawCall::Line(c) => DrawRecord::new([c.x0, c.y0, c.x1, c.y1, 0, 0], c.color),
            DrawCall::Triangle(c) => {
                DrawRecord::new([c.x0, c.y0, c.x1, c.y1, c.x2, c.y2], c.color)
            }
            DrawCall::Rectangle(c) => DrawRecord::new([c.x0, c.y0, c.x1, c.y1, 0, 0], c.color),
            DrawCall::Circle(c) => DrawRecord::new([c.cx, c.cy, c.radius, 0, 0, 0], c.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_keep_coordinate_order() {
        let call = DrawCall::Triangle(TriangleCall::new(1, 2, 3, 4, 5, 6, 0xFF00_0000));
        let record = call.to_record();
        assert_eq!(record.coords, [1, 2, 3, 4, 5, 6]);
        assert_eq!(record.color, 0xFF00_0000);
    }

    #[test]
    fn circle_record_layout() {
        let record = DrawCall::Circle(CircleCall::new(7, 8, 9, 0x1234_5678)).to_record();
        assert_eq!(record.coords, [7, 8, 9, 0, 0, 0]);
        assert_eq!(DrawCall::Circle(CircleCall::new(7, 8, 9, 0x1234_5678)).color(), 0x1234_5678);
    }

    #[test]
    fn kind_follows_shape_and_mode() {
        let line = DrawCall::Line(LineCall::new(0, 0, 1, 1, 0));
        assert_eq!(line.kind(Mode::Fill), PrimitiveKind::LineStroke);
        let rect = DrawCall::Rectangle(RectCall::new(0, 0, 1, 1, 0));
        assert_eq!(rect.kind(Mode::Fill), PrimitiveKind::RectangleFill);
        assert_eq!(rect.kind(Mode::Stroke), PrimitiveKind::RectangleStroke);
    }

    #[test]
    fn normalized_dispatches_per_shape() {
        let line = DrawCall::Line(LineCall::new(5, 1, 2, 7, 0));
        assert_eq!(line.normalized(), Some(DrawCall::Line(LineCall::new(2, 7, 5, 1, 0))));
        let flat = DrawCall::Triangle(TriangleCall::new(0, 3, 4, 3, 9, 3, 0));
        assert_eq!(flat.normalized(), None);
        let circle = DrawCall::Circle(CircleCall::new(1, 2, -3, 0));
        assert_eq!(circle.normalized(), Some(circle));
    }
}
