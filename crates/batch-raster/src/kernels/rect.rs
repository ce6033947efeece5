use crate::batch::DrawRecord;

#[inline]
fn bounds(r: &DrawRecord) -> (i32, i32, i32, i32) {
    let [x0, y0, x1, y1, ..] = r.coords;
    (x0.min(x1), x0.max(x1), y0.min(y1), y0.max(y1))
}

/// Rectangle border: inside the inclusive box and on one of its four edges.
#[inline]
pub fn stroke(px: i32, py: i32, r: &DrawRecord) -> bool {
    let (min_x, max_x, min_y, max_y) = bounds(r);
    let on_border = px == min_x || px == max_x || py == min_y || py == max_y;
    let inside = min_x <= px && px <= max_x && min_y <= py && py <= max_y;
    on_border && inside
}

/// Rectangle interior including the border.
#[inline]
pub fn fill(px: i32, py: i32, r: &DrawRecord) -> bool {
    let (min_x, max_x, min_y, max_y) = bounds(r);
    min_x <= px && px <= max_x && min_y <= py && py <= max_y
}
