//! Content definitions and their on-disk record formats.

use std::{path::Path, sync::Arc};

use anyhow::{bail, Context};
use serde::Deserialize;
use util::{read_data_dir, IndexMap};

use crate::{
    prelude::*, EnemyArchetype, LootTable, MazeInfo, Module, ModuleCatalog,
    PlayerBase, PortalConfig, SpawnerConfig, DEFAULT_SPAWNER_COOLDOWN,
};

/// Immutable game content, loaded once at startup.
#[derive(Clone, Default, Debug)]
pub struct ContentRegistry {
    enemies: IndexMap<EnemyType, EnemyArchetype>,
    loot: IndexMap<String, LootTable>,
    mazes: IndexMap<String, Arc<Maze>>,
    modules: ModuleCatalog,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Load and validate content from a data directory with `enemies/`,
    /// `loot/`, `mazes/` and `modules/` subdirectories of JSON files.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut ret = ContentRegistry::new();

        for (id, text) in read_data_dir(dir.join("enemies"), "json")? {
            let enemy: EnemyArchetype = serde_json::from_str(&text)
                .with_context(|| format!("enemy {id}"))?;
            ret.add_enemy(enemy);
        }

        for (id, text) in read_data_dir(dir.join("loot"), "json")? {
            let table: LootTable = serde_json::from_str(&text)
                .with_context(|| format!("loot table {id}"))?;
            ret.add_loot(id, table);
        }

        for (id, text) in read_data_dir(dir.join("mazes"), "json")? {
            let maze =
                Maze::from_json(&text).with_context(|| format!("maze {id}"))?;
            ret.add_maze(id, maze);
        }

        for (id, text) in read_data_dir(dir.join("modules"), "json")? {
            let module = Module::from_json(&text)
                .with_context(|| format!("module {id}"))?;
            ret.add_module(module);
        }

        ret.validate()
            .with_context(|| format!("content in {}", dir.display()))?;

        log::info!(
            "loaded {} enemies, {} loot tables, {} mazes, {} modules",
            ret.enemies.len(),
            ret.loot.len(),
            ret.mazes.len(),
            ret.modules.len()
        );
        Ok(ret)
    }

    /// Enemies are keyed by their type number, a later definition replaces
    /// an earlier one.
    pub fn add_enemy(&mut self, enemy: EnemyArchetype) {
        self.enemies.insert(enemy.kind, enemy);
    }

    pub fn add_loot(&mut self, id: impl Into<String>, table: LootTable) {
        self.loot.insert(id.into(), table);
    }

    pub fn add_maze(&mut self, id: impl Into<String>, maze: Maze) {
        self.mazes.insert(id.into(), Arc::new(maze));
    }

    pub fn add_module(&mut self, module: Module) {
        self.modules.add(module);
    }

    pub fn enemy(&self, kind: EnemyType) -> Option<&EnemyArchetype> {
        self.enemies.get(&kind)
    }

    pub fn loot(&self, id: &str) -> Option<&LootTable> {
        self.loot.get(id)
    }

    pub fn maze(&self, id: &str) -> Option<&Arc<Maze>> {
        self.mazes.get(id)
    }

    /// Mazes in load order.
    pub fn mazes(&self) -> impl Iterator<Item = (&str, &Arc<Maze>)> + '_ {
        self.mazes.iter().map(|(id, m)| (id.as_str(), m))
    }

    pub fn modules(&self) -> &ModuleCatalog {
        &self.modules
    }

    /// Check cross references between content and the completeness of the
    /// module catalog.
    pub fn validate(&self) -> Result<()> {
        for e in self.enemies.values() {
            if let Some(id) = &e.loot {
                if self.loot(id).is_none() {
                    bail!("enemy {}: unknown loot table {id:?}", e.name);
                }
            }
        }

        for (id, maze) in &self.mazes {
            maze.validate().with_context(|| format!("maze {id}"))?;
            let placed = maze.enemies.iter().map(|&(_, t)| t);
            let spawned = maze
                .positions()
                .filter_map(|p| maze.tile(p)?.spawner.as_ref()?.enemy);
            for kind in placed.chain(spawned) {
                if self.enemy(kind).is_none() {
                    bail!("maze {id}: unknown enemy type {kind}");
                }
            }
        }

        for dirs in Dirs::all_subsets() {
            for m in self.modules.get(dirs) {
                let placed = m.enemies().iter().map(|&(_, t)| t);
                let spawned = Module::positions()
                    .filter_map(|p| m.tile(p)?.spawner.as_ref()?.enemy);
                for kind in placed.chain(spawned) {
                    if self.enemy(kind).is_none() {
                        bail!("module {dirs}: unknown enemy type {kind}");
                    }
                }
            }
        }
        self.modules.validate()?;

        Ok(())
    }
}

/// Tile id in a grid, content files use both numbers and strings.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Key {
    Number(i64),
    Text(String),
}

impl From<Key> for String {
    fn from(k: Key) -> Self {
        match k {
            Key::Number(n) => n.to_string(),
            Key::Text(s) => s,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TileRecord {
    wall: bool,
    blocks_vision: bool,
    fill: bool,
    name: String,
    map_name: String,
    spawner: Option<SpawnerRecord>,
    portal: Option<PortalRecord>,
}

impl Default for TileRecord {
    fn default() -> Self {
        TileRecord {
            wall: false,
            blocks_vision: false,
            fill: false,
            name: "unknown".into(),
            map_name: "%".into(),
            spawner: None,
            portal: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
struct SpawnerRecord {
    /// Negative numbers mean nothing, same as leaving it out.
    enemy: Option<EnemyType>,
    cooldown: i32,
}

impl Default for SpawnerRecord {
    fn default() -> Self {
        SpawnerRecord {
            enemy: None,
            cooldown: DEFAULT_SPAWNER_COOLDOWN,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PortalRecord {
    id: Option<Key>,
    is_target: bool,
    is_source: bool,
}

impl Default for PortalRecord {
    fn default() -> Self {
        PortalRecord {
            id: None,
            is_target: true,
            is_source: true,
        }
    }
}

impl From<TileRecord> for TileTemplate {
    fn from(r: TileRecord) -> Self {
        TileTemplate {
            blocks_movement: r.wall,
            blocks_vision: r.blocks_vision,
            looks_filled: r.fill || r.wall,
            name: r.name,
            map_symbol: r.map_name,
            spawner: r.spawner.map(|s| SpawnerConfig {
                enemy: s.enemy.filter(|&e| e >= 0),
                cooldown: s.cooldown,
            }),
            // Portals without a frequency never do anything, negative
            // numbers mean no frequency.
            portal: r.portal.and_then(|p| {
                let id = p
                    .id
                    .filter(|k| !matches!(k, Key::Number(n) if *n < 0));
                Some(PortalConfig {
                    frequency: id?.into(),
                    is_source: p.is_source,
                    is_target: p.is_target,
                })
            }),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct EnemyPlacement {
    pos: [i32; 2],
    #[serde(rename = "type")]
    kind: EnemyType,
}

impl EnemyPlacement {
    fn get(&self) -> (Position, EnemyType) {
        (self.pos.into(), self.kind)
    }
}

#[derive(Copy, Clone, Debug, Deserialize)]
struct PlayerRecord {
    hp: i32,
    damage: i32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MazeRecord {
    maze: Vec<Vec<Key>>,
    start: [i32; 2],
    end: [i32; 2],
    #[serde(default)]
    enemies: Vec<EnemyPlacement>,
    player: PlayerRecord,
    #[serde(default)]
    tiles: IndexMap<String, TileRecord>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tutorial: bool,
    #[serde(default = "default_order")]
    order: String,
    #[serde(default)]
    text: Vec<String>,
}

fn default_order() -> String {
    "custom".into()
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleRecord {
    directions: Vec<Direction>,
    maze: Vec<Vec<Key>>,
    #[serde(default)]
    enemies: Vec<EnemyPlacement>,
    #[serde(default)]
    tiles: IndexMap<String, TileRecord>,
    goal_pos: Option<[i32; 2]>,
}

/// Resolve a grid of tile ids into its size and x-major tiles.
fn read_grid(
    grid: Vec<Vec<Key>>,
    tiles: IndexMap<String, TileRecord>,
) -> Result<(IVec2, Vec<TileTemplate>)> {
    let width = grid.first().map_or(0, Vec::len);
    if width == 0 {
        bail!("empty grid");
    }
    if let Some(x) = grid.iter().position(|row| row.len() != width) {
        bail!("grid row {x} has {} cells, expected {width}", grid[x].len());
    }

    let size = ivec2(grid.len() as i32, width as i32);
    let mut ret = Vec::with_capacity(grid.len() * width);
    for id in grid.into_iter().flatten() {
        let id = String::from(id);
        let tile = match TileTemplate::builtin(&id) {
            Some(t) => t,
            None => match tiles.get(&id) {
                Some(r) => r.clone().into(),
                None => bail!("unknown tile id {id:?}"),
            },
        };
        ret.push(tile);
    }

    Ok((size, ret))
}

impl Maze {
    /// Parse a maze content record.
    pub fn from_json(text: &str) -> Result<Maze> {
        let r: MazeRecord = serde_json::from_str(text)?;
        let (size, tiles) = read_grid(r.maze, r.tiles)?;

        let mut ret = Maze::new(size, TileTemplate::wall());
        for (i, t) in tiles.into_iter().enumerate() {
            let i = i as i32;
            ret.set_tile(ivec2(i / size.y, i % size.y), t);
        }

        ret.start = r.start.into();
        ret.end = r.end.into();
        ret.enemies = r.enemies.iter().map(EnemyPlacement::get).collect();
        ret.player = PlayerBase {
            hp: r.player.hp,
            damage: r.player.damage,
        };
        ret.info = MazeInfo {
            name: r.name,
            dependencies: r.dependencies,
            tutorial: r.tutorial,
            order: r.order,
            text: r.text,
        };

        ret.validate()?;
        Ok(ret)
    }
}

impl Module {
    /// Parse a module content record.
    pub fn from_json(text: &str) -> Result<Module> {
        let r: ModuleRecord = serde_json::from_str(text)?;
        let (size, tiles) = read_grid(r.maze, r.tiles)?;
        if size != IVec2::splat(MODULE_SIZE) {
            bail!("module grid is {size}, expected {MODULE_SIZE} square");
        }

        let anchor = r
            .goal_pos
            .map_or(IVec2::splat(MODULE_SIZE / 2), IVec2::from);
        Module::new(
            r.directions.into_iter().collect(),
            tiles,
            r.enemies.iter().map(EnemyPlacement::get).collect(),
            anchor,
        )
    }
}
