use anyhow::bail;
use glam::{ivec2, IVec2};
use util::HashSet;

use crate::{EnemyType, Position, Result, TileTemplate, VisibilityMap};

/// Starting stats for the player in a maze.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PlayerBase {
    pub hp: i32,
    pub damage: i32,
}

/// Descriptive data for a maze, used for level selection.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MazeInfo {
    pub name: String,
    /// Maze ids that need to be completed before this one unlocks.
    pub dependencies: Vec<String>,
    pub tutorial: bool,
    /// Sort key in level listings.
    pub order: String,
    pub text: Vec<String>,
}

impl Default for MazeInfo {
    fn default() -> Self {
        MazeInfo {
            name: String::new(),
            dependencies: Vec::new(),
            tutorial: false,
            order: "custom".into(),
            text: Vec::new(),
        }
    }
}

/// Immutable maze template that worlds are instantiated from.
///
/// Mutating methods are for building the maze, a finished maze is shared
/// behind an `Arc` and never changes.
#[derive(Clone, Debug)]
pub struct Maze {
    size: IVec2,
    /// Distinct tile templates used in the maze.
    palette: Vec<TileTemplate>,
    /// Palette indices, x-major.
    cells: Vec<usize>,
    pub start: Position,
    pub end: Position,
    pub enemies: Vec<(Position, EnemyType)>,
    pub player: PlayerBase,
    pub info: MazeInfo,
}

impl Maze {
    /// Create a maze filled with a single tile type.
    pub fn new(size: impl Into<IVec2>, fill: TileTemplate) -> Self {
        let size = size.into();
        assert!(size.x > 0 && size.y > 0, "empty maze");

        Maze {
            size,
            palette: vec![fill],
            cells: vec![0; (size.x * size.y) as usize],
            start: ivec2(0, 0),
            end: size - IVec2::ONE,
            enemies: Vec::new(),
            player: PlayerBase {
                hp: 100,
                damage: 24,
            },
            info: Default::default(),
        }
    }

    /// Build a maze from a text map.
    ///
    /// Each line is a row along the x axis. Legend: `#` wall, `.` floor,
    /// `@` start, `>` end, digits are enemies of that type on floor.
    ///
    /// ```
    /// use engine::prelude::*;
    ///
    /// let maze = Maze::from_ascii("
    ///     @.#
    ///     .1>");
    /// assert_eq!(maze.size(), ivec2(2, 3));
    /// assert_eq!(maze.end, ivec2(1, 2));
    /// assert_eq!(maze.enemies, vec![(ivec2(1, 1), 1)]);
    /// ```
    pub fn from_ascii(map: &str) -> Self {
        let lines: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let mut ret = Maze::new(
            ivec2(lines.len() as i32, width as i32),
            TileTemplate::wall(),
        );

        for (x, line) in lines.iter().enumerate() {
            for (y, c) in line.chars().enumerate() {
                let p = ivec2(x as i32, y as i32);
                if c == '#' {
                    continue;
                }
                ret.set_tile(p, TileTemplate::floor());
                match c {
                    '@' => ret.start = p,
                    '>' => ret.end = p,
                    c => {
                        if let Some(n) = c.to_digit(10) {
                            ret.enemies.push((p, n as EnemyType));
                        }
                    }
                }
            }
        }

        ret
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.size.x && p.y < self.size.y
    }

    pub(crate) fn index(&self, p: Position) -> Option<usize> {
        self.contains(p).then(|| (p.x * self.size.y + p.y) as usize)
    }

    pub(crate) fn position(&self, idx: usize) -> Position {
        let idx = idx as i32;
        ivec2(idx / self.size.y, idx % self.size.y)
    }

    /// Iterate all grid positions in x-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(|i| self.position(i))
    }

    /// Palette index of the tile at a position.
    pub(crate) fn palette_index(&self, p: Position) -> Option<usize> {
        self.index(p).map(|i| self.cells[i])
    }

    pub(crate) fn template(&self, palette_index: usize) -> &TileTemplate {
        &self.palette[palette_index]
    }

    pub fn tile(&self, p: Position) -> Option<&TileTemplate> {
        self.palette_index(p).map(|i| &self.palette[i])
    }

    pub fn set_tile(&mut self, p: Position, tile: TileTemplate) {
        let Some(idx) = self.index(p) else {
            panic!("Maze::set_tile: {p} out of bounds");
        };

        let pal = match self.palette.iter().position(|t| *t == tile) {
            Some(i) => i,
            None => {
                self.palette.push(tile);
                self.palette.len() - 1
            }
        };
        self.cells[idx] = pal;
    }

    /// Out of bounds counts as blocking movement.
    pub fn blocks_movement(&self, p: Position) -> bool {
        self.tile(p).map_or(true, |t| t.blocks_movement)
    }

    /// Out of bounds does not block vision, it just isn't recorded.
    pub fn blocks_vision(&self, p: Position) -> bool {
        self.tile(p).map_or(false, |t| t.blocks_vision)
    }

    /// Compute the cells visible from `origin` out to `radius`.
    pub fn visibility(&self, origin: Position, radius: i32) -> VisibilityMap {
        VisibilityMap::compute(self.size, origin, radius, |p| {
            self.blocks_vision(p)
        })
    }

    /// Check the structural invariants of the maze.
    pub fn validate(&self) -> Result<()> {
        for (what, p) in [("start", self.start), ("end", self.end)] {
            if !self.contains(p) {
                bail!("{what} {p} is outside the maze");
            }
            if self.blocks_movement(p) {
                bail!("{what} {p} is on a blocking tile");
            }
        }

        let mut occupied = HashSet::default();
        for &(p, t) in &self.enemies {
            if !occupied.insert(p) {
                bail!("enemy of type {t} placed on occupied position {p}");
            }
            if !self.contains(p) || self.blocks_movement(p) {
                bail!("enemy of type {t} placed on invalid position {p}");
            }
            if p == self.start {
                bail!("enemy of type {t} placed on the start position");
            }
        }

        Ok(())
    }
}
