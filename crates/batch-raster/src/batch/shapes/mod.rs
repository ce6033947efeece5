pub(crate) mod circle;
pub(crate) mod line;
pub(crate) mod rect;
pub(crate) mod triangle;

pub use circle::CircleCall;
pub use line::LineCall;
pub use rect::RectCall;
pub use triangle::TriangleCall;
