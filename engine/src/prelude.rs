pub use crate::{
    err, ContentRegistry, Direction, Dirs, Enemy, EnemyType, Entity, Maze,
    MoveResult, PlayerStats, Position, Result, TileTemplate, VisibilityMap,
    World, MODULE_SIZE,
};
pub use glam::{ivec2, IVec2};
pub use util::{GameRng, HashMap, HashSet, IndexMap, VecExt, DIR_4};
