//! Random mazes stitched together from modules.

use rand::prelude::*;
use strum::IntoEnumIterator;

use crate::{prelude::*, MazeInfo, Module, ModuleCatalog, FREEPLAY_PLAYER};

/// Generator for mazes of a fixed size in modules.
#[derive(Copy, Clone, Debug)]
pub struct MazeGenerator<'a> {
    catalog: &'a ModuleCatalog,
    /// Size in modules, x is the number of module rows.
    cells: IVec2,
}

impl<'a> MazeGenerator<'a> {
    /// Set up a generator for `width` by `height` modules.
    ///
    /// Fails if the catalog can't cover every exit combination, so that a
    /// generator that exists can always produce a maze.
    pub fn new(
        catalog: &'a ModuleCatalog,
        width: i32,
        height: i32,
    ) -> Result<Self> {
        if width < 1 || height < 1 {
            return err(format!("invalid maze size {width}x{height}"));
        }
        catalog.validate()?;

        Ok(MazeGenerator {
            catalog,
            cells: ivec2(height, width),
        })
    }

    pub fn generate(&self, rng: &mut (impl Rng + ?Sized)) -> Maze {
        self.sample(rng)
    }
}

impl Distribution<Maze> for MazeGenerator<'_> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Maze {
        let exits = spanning_tree(self.cells, rng);

        let mut ret =
            Maze::new(self.cells * MODULE_SIZE, TileTemplate::wall());
        ret.player = FREEPLAY_PLAYER;
        ret.info = MazeInfo {
            name: "Freeplay".into(),
            ..Default::default()
        };

        for (i, &dirs) in exits.iter().enumerate() {
            let cell = ivec2(i as i32 / self.cells.y, i as i32 % self.cells.y);
            let Some(module) = self.catalog.choose(dirs, rng) else {
                panic!("MazeGenerator: no module for {dirs} in checked catalog")
            };
            let origin = cell * MODULE_SIZE;

            for p in Module::positions() {
                if let Some(t) = module.tile(p) {
                    ret.set_tile(origin + p, t.clone());
                }
            }
            ret.enemies
                .extend(module.enemies().iter().map(|&(p, t)| (origin + p, t)));

            if cell == IVec2::ZERO {
                ret.start = origin + module.anchor();
            }
            if cell == self.cells - IVec2::ONE {
                ret.end = origin + module.anchor();
            }
        }

        log::info!("generated {}x{} module maze", self.cells.y, self.cells.x);
        ret
    }
}

/// Randomized depth-first spanning tree over a grid of `size` cells.
///
/// Returns the exits of each cell in x-major order. Every edge of the tree
/// shows up as a matching pair of opposite exits on its two cells.
pub(crate) fn spanning_tree(
    size: IVec2,
    rng: &mut (impl Rng + ?Sized),
) -> Vec<Dirs> {
    let n = (size.x * size.y) as usize;
    let idx = |p: IVec2| (p.x * size.y + p.y) as usize;
    let inside =
        |p: IVec2| (0..size.x).contains(&p.x) && (0..size.y).contains(&p.y);

    let mut exits = vec![Dirs::empty(); n];
    let mut seen = vec![false; n];

    let start = ivec2(rng.gen_range(0..size.x), rng.gen_range(0..size.y));
    seen[idx(start)] = true;
    let mut stack = vec![start];

    while let Some(&cell) = stack.last() {
        let open: Vec<Direction> = Direction::iter()
            .filter(|d| {
                let p = cell + d.delta();
                inside(p) && !seen[idx(p)]
            })
            .collect();

        let Some(&dir) = open.choose(rng) else {
            stack.pop();
            continue;
        };

        let next = cell + dir.delta();
        exits[idx(cell)] |= dir.flag();
        exits[idx(next)] |= dir.opposite().flag();
        seen[idx(next)] = true;
        stack.push(next);
    }

    exits
}
