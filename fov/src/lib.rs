//! Generic field-of-view computation.
//!
//! Recursive shadowcasting over four 90° quadrants. The caller supplies an
//! opacity predicate and a visitor, both working on offsets relative to the
//! observer, so the crate has no opinion about maps, bounds or storage.

mod quadrant;
pub use quadrant::Quadrant;

/// Run shadowcasting from the origin out to `radius` cells.
///
/// `is_opaque` is queried for cells the scan reaches, `visit` is called for
/// every cell found visible, including the origin. Opaque cells are
/// themselves visible, only the cells behind them are shadowed. Cells on
/// quadrant boundaries may be visited more than once.
///
/// A radius of zero only sees the origin.
pub fn shadowcast(
    radius: i32,
    is_opaque: impl FnMut([i32; 2]) -> bool,
    mut visit: impl FnMut([i32; 2]),
) {
    visit([0, 0]);
    if radius <= 0 {
        return;
    }

    let mut scan = Scan {
        radius,
        is_opaque,
        visit,
    };

    for quadrant in Quadrant::ALL {
        scan.arc(quadrant, 1, -1.0, 1.0);
    }
}

struct Scan<F, G> {
    radius: i32,
    is_opaque: F,
    visit: G,
}

impl<F, G> Scan<F, G>
where
    F: FnMut([i32; 2]) -> bool,
    G: FnMut([i32; 2]),
{
    /// Scan row `depth` of a quadrant between the slopes `min` and `max`,
    /// then recurse outwards.
    fn arc(&mut self, quadrant: Quadrant, depth: i32, mut min: f64, max: f64) {
        if depth > self.radius || min >= max {
            return;
        }

        let d = depth as f64;
        let start = (d * min).ceil() as i32;
        let end = (d * max).floor() as i32;

        for col in start..=end {
            let offset = quadrant.transform(depth, col);

            if (self.is_opaque)(offset) {
                // Everything left of the blocker continues in its own
                // narrower slice.
                self.arc(quadrant, depth + 1, min, (col as f64 - 0.5) / d);
                min = (col as f64 + 0.5) / d;
            }

            (self.visit)(offset);
        }

        self.arc(quadrant, depth + 1, min, max);
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use quickcheck_macros::quickcheck;

    use super::*;

    fn visible(
        radius: i32,
        is_opaque: impl Fn([i32; 2]) -> bool,
    ) -> HashSet<[i32; 2]> {
        let mut ret = HashSet::new();
        shadowcast(radius, is_opaque, |p| {
            ret.insert(p);
        });
        ret
    }

    #[test]
    fn open_field() {
        let seen = visible(3, |_| false);
        for x in -3..=3 {
            for y in -3..=3 {
                assert!(seen.contains(&[x, y]), "{x}, {y} not seen");
            }
        }
        assert!(!seen.contains(&[4, 0]));
        assert!(!seen.contains(&[0, -4]));
    }

    #[test]
    fn zero_radius() {
        let seen = visible(0, |_| false);
        assert_eq!(seen.len(), 1);
        assert!(seen.contains(&[0, 0]));
    }

    #[test]
    fn blocker_shadows_corridor() {
        // Single-width corridor running along +x with a blocker at x = 2.
        let opaque = |[x, y]: [i32; 2]| y != 0 || x == 2;
        let seen = visible(6, opaque);

        assert!(seen.contains(&[1, 0]));
        assert!(seen.contains(&[2, 0]), "blocker itself is visible");
        for x in 3..=6 {
            assert!(!seen.contains(&[x, 0]), "{x} seen through blocker");
        }
    }

    #[test]
    fn pillar_casts_shadow() {
        let seen = visible(5, |p| p == [0, 2]);
        assert!(seen.contains(&[0, 2]));
        assert!(!seen.contains(&[0, 3]));
        assert!(!seen.contains(&[0, 5]));
        // Cells off to the side are unaffected.
        assert!(seen.contains(&[3, 3]));
        assert!(seen.contains(&[-3, 3]));
    }

    #[quickcheck]
    fn adjacent_cells_always_visible(radius: u8, walls: u64) -> bool {
        let radius = 1 + (radius % 12) as i32;
        // Pseudorandom wall pattern from the bits of `walls`.
        let opaque = move |[x, y]: [i32; 2]| {
            let bit = (x * 7 + y * 13).rem_euclid(64);
            walls & (1 << bit) != 0
        };
        let seen = visible(radius, opaque);

        (-1..=1).all(|x| (-1..=1).all(|y| seen.contains(&[x, y])))
    }

    #[quickcheck]
    fn nothing_beyond_radius(radius: u8) -> bool {
        let radius = (radius % 16) as i32;
        visible(radius, |_| false)
            .iter()
            .all(|[x, y]| x.abs() <= radius && y.abs() <= radius)
    }
}
