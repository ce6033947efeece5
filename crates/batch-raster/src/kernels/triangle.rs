use crate::batch::DrawRecord;

use super::line;

/// Triangle outline: the union of the three edge lines, each clipped to its
/// own bounding box.
#[inline]
pub fn stroke(px: i32, py: i32, r: &DrawRecord) -> bool {
    let [x0, y0, x1, y1, x2, y2] = r.coords;
    line::covers(px, py, x0, y0, x1, y1)
        || line::covers(px, py, x1, y1, x2, y2)
        || line::covers(px, py, x2, y2, x0, y0)
}

/// Triangle interior by edge functions.
///
/// `w0`, `w1`, `w2` are the signed edge functions of the pixel against the
/// edges (v1, v2), (v2, v0) and (v0, v1). The pixel is inside when none is
/// negative, so edges and vertices are included.
///
/// Only one winding passes the test. With the batcher's y-sorted vertices
/// (y grows downwards) that is the triangle whose middle vertex `v1` lies
/// left of the long edge `v0 → v2`; the mirrored triangle writes nothing.
#[inline]
pub fn fill(px: i32, py: i32, r: &DrawRecord) -> bool {
    let [x0, y0, x1, y1, x2, y2] = r.coords.map(i128::from);
    let (px, py) = (i128::from(px), i128::from(py));
    let w0 = (x1 - x2) * (py - y2) - (y1 - y2) * (px - x2);
    let w1 = (x2 - x0) * (py - y0) - (y2 - y0) * (px - x0);
    let w2 = (x0 - x1) * (py - y1) - (y0 - y1) * (px - x1);
    w0 >= 0 && w1 >= 0 && w2 >= 0
}
