//! Game logic layer machinery.

use std::fmt;

/// Sight radius of a fresh player.
pub const DEFAULT_PLAYER_SIGHT: i32 = 2;

/// Sight radius of enemies whose data doesn't specify one.
pub const DEFAULT_ENEMY_SIGHT: i32 = 2;

/// Attack range of enemies whose data doesn't specify one.
pub const DEFAULT_ENEMY_RANGE: i32 = 1;

/// Turns between spawns for spawners whose data doesn't specify one.
pub const DEFAULT_SPAWNER_COOLDOWN: i32 = 4;

/// Side length of a square generation module in tiles.
pub const MODULE_SIZE: i32 = 5;

/// Freeplay maze size in modules, `[width, height]`.
pub const FREEPLAY_SIZE: [i32; 2] = [4, 4];

/// Player base stats in generated mazes.
pub const FREEPLAY_PLAYER: PlayerBase = PlayerBase {
    hp: 100,
    damage: 24,
};

/// Maze selected when there is no stored selection.
pub const DEFAULT_MAZE_ID: &str = "tutorial_move";

mod action;
pub use action::MoveResult;

mod ai;

mod behavior;
pub use behavior::{
    BehaviorKind, PortalNetwork, PortalState, SpawnLog, SpawnerState, TileState,
};

mod data;
pub use data::ContentRegistry;

mod entity;
pub use entity::{EnemyArchetype, EnemyType, Entity, Enemy, PlayerStats};

mod fov;
pub use crate::fov::VisibilityMap;

mod item;
pub use item::{LootEntry, LootTable, StatModifiers};

mod location;
pub use location::{Direction, Dirs, Position};

mod mapgen;
pub use mapgen::MazeGenerator;

mod maze;
pub use maze::{Maze, MazeInfo, PlayerBase};

mod module;
pub use module::{Module, ModuleCatalog};

pub mod prelude;

mod session;
pub use session::{
    GameCommand, LevelChoice, LevelEntry, MenuCommand, MenuOutcome, Progress,
    Session, TurnOutcome,
};

mod tile;
pub use tile::{PortalConfig, SpawnerConfig, TileTemplate};

mod world;
pub use world::World;

pub type Result<T> = anyhow::Result<T>;

/// Shorthand for failing with a content or setup error message.
pub fn err<T>(msg: impl fmt::Display) -> Result<T> {
    Err(anyhow::anyhow!("{msg}"))
}
