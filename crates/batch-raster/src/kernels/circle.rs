use crate::batch::DrawRecord;

/// Width of the stroked ring beyond the radius, in hundredths of a pixel.
pub const RING_WIDTH_CENTI: i128 = 98;

#[inline]
fn distance_sq(px: i32, py: i32, cx: i32, cy: i32) -> i128 {
    let dx = i128::from(px) - i128::from(cx);
    let dy = i128::from(py) - i128::from(cy);
    dx * dx + dy * dy
}

/// `floor((r + 0.98)²) - r²` for `r >= 0`.
#[inline]
fn ring_extent(r: i128) -> i128 {
    (2 * RING_WIDTH_CENTI * 100 * r + RING_WIDTH_CENTI * RING_WIDTH_CENTI) / 10_000
}

/// Circle outline: `radius <= dist <= radius + 0.98`.
///
/// The band starts at the radius and grows outwards only, so the ring sits
/// just outside the filled disc of the same radius. Squared distances are
/// integers, so the band is compared exactly as `r² <= d² <= r² + ring_extent(r)`.
#[inline]
pub fn stroke(px: i32, py: i32, r: &DrawRecord) -> bool {
    let [cx, cy, radius, ..] = r.coords;
    if radius < 0 {
        return false;
    }
    let radius = i128::from(radius);
    let d = distance_sq(px, py, cx, cy);
    let inner = radius * radius;
    inner <= d && d <= inner + ring_extent(radius)
}

/// Circle interior: `dist <= radius`, compared exactly as `d² <= radius²`.
#[inline]
pub fn fill(px: i32, py: i32, r: &DrawRecord) -> bool {
    let [cx, cy, radius, ..] = r.coords;
    let radius = i128::from(radius);
    radius >= 0 && distance_sq(px, py, cx, cy) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(cx: i32, cy: i32, radius: i32) -> DrawRecord {
        DrawRecord::new([cx, cy, radius, 0, 0, 0], 1)
    }

    fn count(test: fn(i32, i32, &DrawRecord) -> bool, r: &DrawRecord) -> usize {
        let mut n = 0;
        for y in -20..20 {
            for x in -20..20 {
                n += usize::from(test(x, y, r));
            }
        }
        n
    }

    #[test]
    fn fill_boundary_is_inclusive() {
        let r = rec(0, 0, 5);
        assert!(fill(5, 0, &r));
        assert!(fill(3, 4, &r));
        assert!(!fill(4, 4, &r));
    }

    #[test]
    fn zero_and_negative_radius() {
        assert_eq!(count(fill, &rec(0, 0, 0)), 1);
        assert_eq!(count(stroke, &rec(0, 0, 0)), 1);
        assert_eq!(count(fill, &rec(0, 0, -3)), 0);
        assert_eq!(count(stroke, &rec(0, 0, -3)), 0);
    }

    #[test]
    fn stroke_ring_is_outer_band() {
        let r = rec(0, 0, 2);
        // d² ∈ {4, 5, 8}: 4 axis points, 8 knight moves, 4 diagonals.
        assert_eq!(count(stroke, &r), 16);
        assert!(stroke(2, 0, &r));
        assert!(stroke(2, 2, &r));
        assert!(!stroke(1, 1, &r));
        assert!(!stroke(3, 0, &r));
    }

    #[test]
    fn stroke_lower_bound_is_the_radius_itself() {
        // dist = sqrt(8) ≈ 2.83 is in [2, 2.98] but not in [3, 3.98].
        assert!(stroke(2, 2, &rec(0, 0, 2)));
        assert!(!stroke(2, 2, &rec(0, 0, 3)));
    }

    #[test]
    fn ring_extent_matches_real_band() {
        for r in 0..2000i128 {
            let outer = (r as f64 + 0.98).powi(2).floor() as i128;
            assert_eq!(r * r + ring_extent(r), outer, "radius {r}");
        }
    }

    #[test]
    fn huge_circles_are_exact() {
        // Off-surface centre, the disc edge passing just beyond the origin.
        let r = rec(-46_000, 0, 46_341);
        assert!(fill(0, 0, &r));
        assert!(fill(341, 0, &r));
        assert!(!fill(342, 0, &r));
        assert!(stroke(341, 0, &r));
        assert!(!stroke(340, 0, &r));

        let max = rec(0, 0, i32::MAX);
        assert!(fill(i32::MAX, 0, &max));
        assert!(stroke(i32::MAX, 0, &max));
        assert!(!fill(0, 0, &rec(i32::MIN, 0, i32::MAX)));
    }

    #[test]
    fn fill_is_symmetric() {
        let r = rec(0, 0, 7);
        for y in -10..=10 {
            for x in -10..=10 {
                let v = fill(x, y, &r);
                assert_eq!(v, fill(-x, y, &r));
                assert_eq!(v, fill(x, -y, &r));
                assert_eq!(v, fill(y, x, &r));
            }
        }
    }
}
