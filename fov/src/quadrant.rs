/// One of the four 90° sectors scanned by shadowcasting.
///
/// A quadrant maps scan-local coordinates, `depth` along the quadrant's
/// main axis and `col` across it, into an offset from the origin. The
/// mapping is a fixed 2×2 rotation matrix.
///
/// ```notrust
///          Up
///        \ . /
///   Left  \./ Right
///         /.\
///        / . \
///         Down
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Quadrant {
    /// Main axis along +x.
    PosX,
    /// Main axis along -y.
    NegY,
    /// Main axis along -x.
    NegX,
    /// Main axis along +y.
    PosY,
}

use Quadrant::*;

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [PosX, NegY, NegX, PosY];

    /// Rotation matrix `[[a, b], [c, d]]` applied to `(depth, col)`.
    const fn matrix(self) -> [[i32; 2]; 2] {
        match self {
            PosX => [[1, 0], [0, 1]],
            NegY => [[0, 1], [-1, 0]],
            NegX => [[-1, 0], [0, -1]],
            PosY => [[0, -1], [1, 0]],
        }
    }

    /// Map a scan-local position into an origin-relative offset.
    pub const fn transform(self, depth: i32, col: i32) -> [i32; 2] {
        let [[a, b], [c, d]] = self.matrix();
        [a * depth + b * col, c * depth + d * col]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn main_axes() {
        assert_eq!(PosX.transform(2, 0), [2, 0]);
        assert_eq!(NegY.transform(2, 0), [0, -2]);
        assert_eq!(NegX.transform(2, 0), [-2, 0]);
        assert_eq!(PosY.transform(2, 0), [0, 2]);
    }

    #[test]
    fn quadrants_cover_ring() {
        // Every cell on the distance-2 square ring is reachable from some
        // quadrant with |col| <= depth.
        for x in -2i32..=2 {
            for y in -2i32..=2 {
                if x.abs().max(y.abs()) != 2 {
                    continue;
                }
                let found = Quadrant::ALL.iter().any(|q| {
                    (-2..=2).any(|col| q.transform(2, col) == [x, y])
                });
                assert!(found, "{x}, {y} not covered");
            }
        }
    }
}
