use crate::batch::DrawRecord;

/// Line kernel: `coords = [x0, y0, x1, y1, _, _]`.
#[inline]
pub fn stroke(px: i32, py: i32, r: &DrawRecord) -> bool {
    let [x0, y0, x1, y1, ..] = r.coords;
    covers(px, py, x0, y0, x1, y1)
}

/// Whether pixel `(px, py)` belongs to the segment `(x0, y0)–(x1, y1)`.
///
/// The pixel must lie in the segment's inclusive bounding box and within half
/// a pixel of the infinite line through both endpoints, measured perpendicular
/// to it. The distance `|m·px − py + b| / sqrt(m² + 1)` is compared in the
/// equivalent exact form `4·cross² < dx² + dy²`, so steep lines never divide.
///
/// Vertical segments (`x0 == x1`) reduce to `|px − x0| < 0.5`, which for
/// integer pixels means `px == x0`. A zero-length segment covers its one pixel.
pub fn covers(px: i32, py: i32, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
    if px < x0.min(x1) || px > x0.max(x1) || py < y0.min(y1) || py > y0.max(y1) {
        return false;
    }
    if x0 == x1 {
        return px == x0;
    }

    // i128: the squared cross product of two i32 spans does not fit in i64.
    let dx = i128::from(x1) - i128::from(x0);
    let dy = i128::from(y1) - i128::from(y0);
    let cross = dy * (i128::from(px) - i128::from(x0)) - dx * (i128::from(py) - i128::from(y0));
    // sqrt(dx² + dy²) <= |dx| + |dy|; bails out before squaring can overflow.
    if cross.abs() > dx.abs() + dy.abs() {
        return false;
    }
    4 * cross * cross < dx * dx + dy * dy
}
