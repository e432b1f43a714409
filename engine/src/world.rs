use std::sync::Arc;

use anyhow::Context;
use rand::SeedableRng;

use crate::{behavior::WorldData, prelude::*, TileState};

/// Mutable play-through of a maze.
///
/// Everything that changes during play lives here. The maze and the content
/// definitions are shared and never modified, so restarting is just
/// building a new `World` from the same maze.
#[derive(Clone, Debug)]
pub struct World {
    maze: Arc<Maze>,
    pub(crate) content: Arc<ContentRegistry>,
    /// Per-cell behavior state, x-major like the maze.
    pub(crate) tiles: Vec<TileState>,
    pub(crate) entities: HashMap<Position, Entity>,
    pub(crate) player: Position,
    pub(crate) visited: HashSet<Position>,
    /// Cached player visibility, `None` when it needs recomputing.
    pub(crate) fov: Option<VisibilityMap>,
    pub(crate) data: WorldData,
    pub(crate) rng: GameRng,
    pub(crate) kills: u32,
    pub(crate) rounds: u32,
}

impl World {
    pub fn new(
        maze: Arc<Maze>,
        content: Arc<ContentRegistry>,
        rng: GameRng,
    ) -> Result<Self> {
        maze.validate()?;

        let mut data = WorldData::default();
        let tiles = maze
            .positions()
            .map(|p| TileState::new(&maze, p, &mut data))
            .collect();

        let mut entities = HashMap::default();
        entities.insert(
            maze.start,
            Entity::Player(PlayerStats::new(
                maze.player.hp,
                maze.player.damage,
            )),
        );

        for &(p, kind) in &maze.enemies {
            let archetype = content
                .enemy(kind)
                .with_context(|| format!("unknown enemy type {kind} at {p}"))?;
            entities.insert(p, Entity::Enemy(archetype.spawn()));
        }

        let mut ret = World {
            player: maze.start,
            maze,
            content,
            tiles,
            entities,
            visited: Default::default(),
            fov: None,
            data,
            rng,
            kills: 0,
            rounds: 0,
        };

        // Discover the area around the player.
        ret.visit();

        Ok(ret)
    }

    /// Build a world with its rng seeded from a parent rng.
    pub fn spawn_from(
        maze: Arc<Maze>,
        content: Arc<ContentRegistry>,
        rng: &mut impl rand::Rng,
    ) -> Result<Self> {
        World::new(maze, content, GameRng::seed_from_u64(rng.gen()))
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn content(&self) -> &ContentRegistry {
        &self.content
    }

    pub fn size(&self) -> IVec2 {
        self.maze.size()
    }

    pub fn player_pos(&self) -> Position {
        self.player
    }

    pub fn player_stats(&self) -> &PlayerStats {
        match self.entities.get(&self.player) {
            Some(Entity::Player(stats)) => stats,
            _ => panic!("World: no player at {}", self.player),
        }
    }

    pub(crate) fn player_stats_mut(&mut self) -> &mut PlayerStats {
        match self.entities.get_mut(&self.player) {
            Some(Entity::Player(stats)) => stats,
            _ => panic!("World: no player at {}", self.player),
        }
    }

    pub fn entity(&self, p: Position) -> Option<&Entity> {
        self.entities.get(&p)
    }

    /// Iterate all entities in x-major grid order.
    pub fn entities(&self) -> impl Iterator<Item = (Position, &Entity)> + '_ {
        self.maze
            .positions()
            .filter_map(|p| self.entities.get(&p).map(|e| (p, e)))
    }

    pub fn tile(&self, p: Position) -> Option<&TileTemplate> {
        self.maze.tile(p)
    }

    /// Tile state at a position, if it's inside the maze.
    pub fn tile_state(&self, p: Position) -> Option<&TileState> {
        self.maze.index(p).map(|i| &self.tiles[i])
    }

    /// Cell is free for something to move into.
    pub fn can_enter(&self, p: Position) -> bool {
        !self.maze.blocks_movement(p) && !self.entities.contains_key(&p)
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn survived(&self) -> bool {
        self.player_stats().is_alive()
    }

    /// Player either reached the end or died.
    pub fn is_finished(&self) -> bool {
        self.player == self.maze.end || !self.survived()
    }

    /// Move the occupant of `from` to `to`, replacing whatever was there.
    pub(crate) fn relocate(&mut self, from: Position, to: Position) {
        if let Some(e) = self.entities.remove(&from) {
            if e.is_player() {
                self.player = to;
                self.invalidate_fov();
            }
            self.entities.insert(to, e);
        }
    }
}
