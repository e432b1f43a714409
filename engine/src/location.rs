//! Grid coordinates and compass directions.
//!
//! Maze grids are indexed `[x][y]`. The x axis runs north to south (row),
//! the y axis runs west to east (column).

use std::fmt;

use bitflags::bitflags;
use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Position of a cell on a maze grid.
pub type Position = IVec2;

/// The four directions the player and the maze generator know about.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    North,
    South,
    West,
    East,
}

use Direction::*;

impl Direction {
    /// Grid step for moving one cell in this direction.
    pub const fn delta(self) -> IVec2 {
        match self {
            North => ivec2(-1, 0),
            South => ivec2(1, 0),
            West => ivec2(0, -1),
            East => ivec2(0, 1),
        }
    }

    pub fn from_delta(delta: IVec2) -> Option<Direction> {
        Direction::iter().find(|d| d.delta() == delta)
    }

    pub const fn opposite(self) -> Direction {
        match self {
            North => South,
            South => North,
            West => East,
            East => West,
        }
    }

    /// East and west are horizontal, they move along the y axis.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, West | East)
    }

    pub const fn flag(self) -> Dirs {
        match self {
            North => Dirs::NORTH,
            South => Dirs::SOUTH,
            West => Dirs::WEST,
            East => Dirs::EAST,
        }
    }
}

bitflags! {
    /// A set of directions, used for module connections.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Dirs: u8 {
        const NORTH = 1;
        const SOUTH = 1 << 1;
        const WEST = 1 << 2;
        const EAST = 1 << 3;
    }
}

impl Dirs {
    /// Every possible direction set, the empty set included.
    pub fn all_subsets() -> impl Iterator<Item = Dirs> {
        (0..=Dirs::all().bits()).map(Dirs::from_bits_truncate)
    }

    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::iter().filter(move |d| self.contains(d.flag()))
    }
}

impl FromIterator<Direction> for Dirs {
    fn from_iter<T: IntoIterator<Item = Direction>>(iter: T) -> Self {
        iter.into_iter().fold(Dirs::empty(), |a, d| a | d.flag())
    }
}

impl fmt::Display for Dirs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        for (i, d) in self.directions().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn directions_are_consistent() {
        for d in Direction::iter() {
            assert_eq!(d.delta() + d.opposite().delta(), IVec2::ZERO);
            assert_eq!(Direction::from_delta(d.delta()), Some(d));
            assert_eq!(d.to_string().parse::<Direction>().unwrap(), d);
        }
        assert_eq!(Direction::from_delta(ivec2(1, 1)), None);
        // Moving south increases x.
        assert_eq!(South.delta(), ivec2(1, 0));
        assert!(East.is_horizontal() && !North.is_horizontal());
    }

    #[test]
    fn dir_sets() {
        assert_eq!(Dirs::all_subsets().count(), 16);
        let set: Dirs = [North, East, North].into_iter().collect();
        assert_eq!(set, Dirs::NORTH | Dirs::EAST);
        assert_eq!(set.to_string(), "north+east");
        assert_eq!(Dirs::empty().to_string(), "none");
        assert_eq!(set.directions().collect::<Vec<_>>(), vec![North, East]);
    }
}
