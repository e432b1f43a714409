//! Pre-authored maze fragments for the generator.

use anyhow::bail;
use rand::{seq::SliceRandom, Rng};
use strum::IntoEnumIterator;
use util::flood_fill_4;

use crate::{prelude::*, EnemyType};

/// A `MODULE_SIZE` square maze fragment with declared exits.
#[derive(Clone, PartialEq, Debug)]
pub struct Module {
    dirs: Dirs,
    /// Tiles, x-major.
    tiles: Vec<TileTemplate>,
    enemies: Vec<(Position, EnemyType)>,
    /// Becomes the maze start or end when the module is in a corner.
    anchor: Position,
}

impl Module {
    /// Build a module and check that it can be stitched into a maze.
    ///
    /// Each declared exit must have an open cell in the middle of that
    /// edge, edges without an exit must be closed, and the open cells of the
    /// module must form a single area containing the anchor.
    pub fn new(
        dirs: Dirs,
        tiles: Vec<TileTemplate>,
        enemies: Vec<(Position, EnemyType)>,
        anchor: Position,
    ) -> Result<Self> {
        let n = (MODULE_SIZE * MODULE_SIZE) as usize;
        if tiles.len() != n {
            bail!("module has {} tiles, expected {n}", tiles.len());
        }

        let ret = Module {
            dirs,
            tiles,
            enemies,
            anchor,
        };

        if !ret.is_open(anchor) {
            bail!("anchor {anchor} is not on an open tile");
        }

        for &(p, kind) in &ret.enemies {
            if !ret.is_open(p) {
                bail!("enemy of type {kind} placed on invalid position {p}");
            }
            if p == anchor {
                bail!("enemy of type {kind} placed on the anchor");
            }
        }

        for dir in Direction::iter() {
            let (mid, edge) = border(dir);
            if dirs.contains(dir.flag()) {
                if !ret.is_open(mid) {
                    bail!("{dir} exit at {mid} is blocked");
                }
            } else if let Some(p) = edge.into_iter().find(|&p| ret.is_open(p))
            {
                bail!("open tile {p} on {dir} edge without a {dir} exit");
            }
        }

        let open = Module::positions().filter(|&p| ret.is_open(p)).count();
        let reached = flood_fill_4(|&p| ret.is_open(p), [anchor]).count();
        if reached != open {
            bail!("{} open tiles not connected to anchor", open - reached);
        }

        Ok(ret)
    }

    pub fn dirs(&self) -> Dirs {
        self.dirs
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn enemies(&self) -> &[(Position, EnemyType)] {
        &self.enemies
    }

    /// Local positions in x-major order.
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..MODULE_SIZE)
            .flat_map(|x| (0..MODULE_SIZE).map(move |y| ivec2(x, y)))
    }

    pub fn tile(&self, p: Position) -> Option<&TileTemplate> {
        let range = 0..MODULE_SIZE;
        (range.contains(&p.x) && range.contains(&p.y))
            .then(|| &self.tiles[(p.x * MODULE_SIZE + p.y) as usize])
    }

    fn is_open(&self, p: Position) -> bool {
        self.tile(p).map_or(false, TileTemplate::is_walkable)
    }

    /// Plain corridors from the center out to each exit.
    #[cfg(test)]
    pub(crate) fn junction(dirs: Dirs) -> Module {
        let c = MODULE_SIZE / 2;
        let center = ivec2(c, c);
        let idx = |p: Position| (p.x * MODULE_SIZE + p.y) as usize;

        let mut tiles = vec![TileTemplate::wall(); idx(ivec2(MODULE_SIZE, 0))];
        tiles[idx(center)] = TileTemplate::floor();
        for d in dirs.directions() {
            for i in 1..=c {
                tiles[idx(center + d.delta() * i)] = TileTemplate::floor();
            }
        }
        Module::new(dirs, tiles, Vec::new(), center).unwrap()
    }
}

/// Middle cell and all cells of a module edge.
fn border(dir: Direction) -> (Position, Vec<Position>) {
    let (c, last) = (MODULE_SIZE / 2, MODULE_SIZE - 1);
    let cell = |i: i32| match dir {
        Direction::North => ivec2(0, i),
        Direction::South => ivec2(last, i),
        Direction::West => ivec2(i, 0),
        Direction::East => ivec2(i, last),
    };
    (cell(c), (0..MODULE_SIZE).map(cell).collect())
}

/// Modules grouped by their exact exit set.
#[derive(Clone, Default, Debug)]
pub struct ModuleCatalog {
    modules: HashMap<Dirs, Vec<Module>>,
}

impl ModuleCatalog {
    pub fn add(&mut self, module: Module) {
        self.modules.entry(module.dirs).or_default().push(module);
    }

    /// Modules whose exit set is exactly `dirs`.
    pub fn get(&self, dirs: Dirs) -> &[Module] {
        self.modules.get(&dirs).map_or(&[], |v| v.as_slice())
    }

    /// Pick a random module with exactly the exits `dirs`.
    pub fn choose(
        &self,
        dirs: Dirs,
        rng: &mut (impl Rng + ?Sized),
    ) -> Option<&Module> {
        self.get(dirs).choose(rng)
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail unless every possible exit set has at least one module.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<String> = Dirs::all_subsets()
            .filter(|&d| self.get(d).is_empty())
            .map(|d| d.to_string())
            .collect();

        if !missing.is_empty() {
            bail!("no modules for exits: {}", missing.join(", "));
        }
        Ok(())
    }
}
