use core::fmt;

/// Outline or interior.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mode {
    Stroke,
    Fill,
}

/// A (primitive, mode) pair. Each kind owns one queue and one kernel.
///
/// Declaration order is flush order: a later kind always paints over an
/// earlier one where they overlap.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    LineStroke,
    TriangleStroke,
    TriangleFill,
    RectangleStroke,
    RectangleFill,
    CircleStroke,
    CircleFill,
}

impl PrimitiveKind {
    pub const COUNT: usize = 7;

    pub const FLUSH_ORDER: [PrimitiveKind; Self::COUNT] = [
        PrimitiveKind::LineStroke,
        PrimitiveKind::TriangleStroke,
        PrimitiveKind::TriangleFill,
        PrimitiveKind::RectangleStroke,
        PrimitiveKind::RectangleFill,
        PrimitiveKind::CircleStroke,
        PrimitiveKind::CircleFill,
    ];

    /// Position in [`Self::FLUSH_ORDER`]; also the index into per-kind tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn triangle(mode: Mode) -> Self {
        match mode {
            Mode::Stroke => PrimitiveKind::TriangleStroke,
            Mode::Fill => PrimitiveKind::TriangleFill,
        }
    }

    #[inline]
    pub const fn rectangle(mode: Mode) -> Self {
        match mode {
            Mode::Stroke => PrimitiveKind::RectangleStroke,
            Mode::Fill => PrimitiveKind::RectangleFill,
        }
    }

    #[inline]
    pub const fn circle(mode: Mode) -> Self {
        match mode {
            Mode::Stroke => PrimitiveKind::CircleStroke,
            Mode::Fill => PrimitiveKind::CircleFill,
        }
    }

    #[inline]
    pub const fn mode(self) -> Mode {
        match self {
            PrimitiveKind::LineStroke
            | PrimitiveKind::TriangleStroke
            | PrimitiveKind::RectangleStroke
            | PrimitiveKind::CircleStroke => Mode::Stroke,
            PrimitiveKind::TriangleFill
            | PrimitiveKind::RectangleFill
            | PrimitiveKind::CircleFill => Mode::Fill,
        }
    }

    /// Name of the compute entry point in `raster.wgsl`.
    pub const fn entry_point(self) -> &'static str {
        match self {
            PrimitiveKind::LineStroke => "line_stroke",
            PrimitiveKind::TriangleStroke => "triangle_stroke",
            PrimitiveKind::TriangleFill => "triangle_fill",
            PrimitiveKind::RectangleStroke => "rectangle_stroke",
            PrimitiveKind::RectangleFill => "rectangle_fill",
            PrimitiveKind::CircleStroke => "circle_stroke",
            PrimitiveKind::CircleFill => "circle_fill",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry_point())
    }
}
