use glam::IVec2;

/// 4 directions, clock face order.
pub const DIR_4: [IVec2; 4] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 0]),
];

pub trait VecExt: Sized + Default {
    /// Absolute size of vector in taxicab metric.
    fn taxi_len(&self) -> i32;

    /// Absolute size of vector in chessboard metric.
    fn cheb_len(&self) -> i32;

    /// Vec points to an adjacent cell, left, right, up or down.
    fn is_adjacent(&self) -> bool {
        self.taxi_len() == 1
    }
}

impl VecExt for IVec2 {
    fn taxi_len(&self) -> i32 {
        self[0].abs() + self[1].abs()
    }

    fn cheb_len(&self) -> i32 {
        self[0].abs().max(self[1].abs())
    }
}

#[cfg(test)]
mod test {
    use glam::ivec2;

    use super::*;

    #[test]
    fn metrics() {
        assert_eq!(ivec2(3, -4).taxi_len(), 7);
        assert_eq!(ivec2(3, -4).cheb_len(), 4);
        assert!(ivec2(0, -1).is_adjacent());
        assert!(!ivec2(1, 1).is_adjacent());
        assert!(DIR_4.iter().all(|d| d.is_adjacent()));
    }
}
