//! Logic for revealing unexplored game terrain

use glam::IVec2;

use crate::{prelude::*, Entity};

/// Cells visible from one observer position.
///
/// A pure function of the blocking layout, the observer position and the
/// sight radius, so it can be cached until the observer moves.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct VisibilityMap {
    origin: Position,
    radius: i32,
    size: IVec2,
    /// Visibility flags, x-major.
    cells: Vec<bool>,
}

impl VisibilityMap {
    /// Run shadowcasting over a `size` grid. Cells outside the grid are
    /// never marked visible.
    pub fn compute(
        size: IVec2,
        origin: Position,
        radius: i32,
        blocks_vision: impl Fn(Position) -> bool,
    ) -> Self {
        let mut ret = VisibilityMap {
            origin,
            radius,
            size,
            cells: vec![false; (size.x * size.y).max(0) as usize],
        };

        ::fov::shadowcast(
            radius,
            |v| blocks_vision(origin + IVec2::from(v)),
            |v| ret.set(origin + IVec2::from(v)),
        );

        ret
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    fn index(&self, p: Position) -> Option<usize> {
        (p.x >= 0 && p.y >= 0 && p.x < self.size.x && p.y < self.size.y)
            .then(|| (p.x * self.size.y + p.y) as usize)
    }

    fn set(&mut self, p: Position) {
        if let Some(i) = self.index(p) {
            self.cells[i] = true;
        }
    }

    pub fn get(&self, p: Position) -> bool {
        self.index(p).map_or(false, |i| self.cells[i])
    }

    /// Iterate visible positions.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(|(i, _)| {
                let i = i as i32;
                ivec2(i / self.size.y, i % self.size.y)
            })
    }
}

impl World {
    /// Current player sight radius.
    pub fn player_sight(&self) -> i32 {
        self.player_stats().sight
    }

    fn compute_player_fov(&self) -> VisibilityMap {
        self.maze().visibility(self.player_pos(), self.player_sight())
    }

    /// Cached player visibility map, computed on demand.
    pub fn player_fov(&mut self) -> &VisibilityMap {
        let fov = match self.fov.take() {
            Some(fov) => fov,
            None => self.compute_player_fov(),
        };
        self.fov.insert(fov)
    }

    /// Whether a cell is currently visible to the player.
    pub fn is_visible(&self, p: Position) -> bool {
        match &self.fov {
            Some(fov) => fov.get(p),
            None => self.compute_player_fov().get(p),
        }
    }

    /// Drop the cached player visibility, must be called whenever the player
    /// changes position.
    pub(crate) fn invalidate_fov(&mut self) {
        self.fov = None;
    }

    /// Mark everything the player currently sees as visited.
    pub(crate) fn visit(&mut self) {
        let seen: Vec<Position> = self.player_fov().iter().collect();
        self.visited.extend(seen);
    }

    /// Whether the player has ever seen the cell.
    pub fn is_visited(&self, p: Position) -> bool {
        self.visited.contains(&p)
    }

    /// Mark the whole maze as visited.
    pub fn reveal_all(&mut self) {
        let all: Vec<Position> = self.maze().positions().collect();
        self.visited.extend(all);
    }

    /// Whether an enemy at `pos` can currently see the player.
    pub(crate) fn enemy_sees_player(&self, pos: Position) -> bool {
        let Some(Entity::Enemy(enemy)) = self.entity(pos) else {
            return false;
        };
        self.maze()
            .visibility(pos, enemy.sight)
            .get(self.player_pos())
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn pillar_shadow() {
        let maze = Maze::from_ascii(
            "
            #########
            #.......#
            #.......#
            #...#...#
            #.......#
            #.......#
            #########",
        );
        let fov = maze.visibility(ivec2(5, 4), 8);

        assert!(fov.get(ivec2(5, 4)));
        // Pillar is seen, the column behind it isn't.
        assert!(fov.get(ivec2(3, 4)));
        assert!(!fov.get(ivec2(2, 4)));
        assert!(!fov.get(ivec2(1, 4)));
        assert!(!fov.get(ivec2(0, 4)));
        // Cells next to the shadow are still lit.
        assert!(fov.get(ivec2(2, 3)));
        assert!(fov.get(ivec2(2, 5)));
        assert!(fov.get(ivec2(1, 1)));
        assert!(fov.get(ivec2(0, 0)));
        assert!(fov.get(ivec2(0, 8)));
        // Nothing outside the grid.
        assert!(!fov.get(ivec2(7, 4)));
        assert!(fov.iter().all(|p| maze.contains(p)));
    }

    #[test]
    fn walls_stop_sight() {
        let maze = Maze::from_ascii(
            "
            .....
            #####
            .....",
        );
        let fov = maze.visibility(ivec2(0, 2), 4);
        assert!(fov.get(ivec2(1, 2)));
        assert!(fov.get(ivec2(1, 0)));
        for y in 0..5 {
            assert!(!fov.get(ivec2(2, y)), "saw through wall at {y}");
        }
    }

    #[test]
    fn radius_limits_sight() {
        let maze = Maze::new([1, 10], TileTemplate::floor());
        let fov = maze.visibility(ivec2(0, 0), 3);
        assert_eq!(fov.iter().count(), 4);
        assert!(fov.get(ivec2(0, 3)));
        assert!(!fov.get(ivec2(0, 4)));
    }

    #[quickcheck]
    fn neighbors_always_visible(x: u8, y: u8, radius: u8, walls: u64) -> bool {
        let size = ivec2(8, 8);
        let origin = ivec2((x % 8) as i32, (y % 8) as i32);
        let radius = 1 + (radius % 6) as i32;
        let blocks = |p: Position| {
            p != origin && walls & (1 << (p.x * 8 + p.y).rem_euclid(64)) != 0
        };
        let fov = VisibilityMap::compute(size, origin, radius, blocks);

        (-1..=1).all(|dx| {
            (-1..=1).all(|dy| {
                let p = origin + ivec2(dx, dy);
                fov.get(p) || !(0..8).contains(&p.x) || !(0..8).contains(&p.y)
            })
        })
    }
}
