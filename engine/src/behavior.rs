//! Stateful tile behaviors, ticked once per turn.

use rand::seq::SliceRandom;
use strum::EnumCount;

use crate::{prelude::*, EnemyType};

/// Runtime state of one maze cell.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TileState {
    /// Palette index of the cell's template in the maze.
    template: usize,
    pub spawner: Option<SpawnerState>,
    pub portal: Option<PortalState>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SpawnerState {
    pub enemy: Option<EnemyType>,
    pub cooldown: i32,
    /// Turns until the next spawn, a spawn happens when this is at most
    /// zero and the cell is free.
    pub cooldown_left: i32,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PortalState {
    pub frequency: String,
    pub is_source: bool,
    pub is_target: bool,
}

impl TileState {
    /// Instantiate the tile at `p`, registering any portal it has into the
    /// world-wide portal network.
    pub(crate) fn new(maze: &Maze, p: Position, data: &mut WorldData) -> Self {
        let template = maze.palette_index(p).unwrap_or_else(|| {
            panic!("TileState::new: {p} outside maze")
        });
        let t = maze.template(template);

        let spawner = t.spawner.as_ref().map(|s| SpawnerState {
            enemy: s.enemy,
            cooldown: s.cooldown,
            cooldown_left: s.cooldown,
        });

        let portal = t.portal.as_ref().map(|c| {
            if c.is_target {
                data.portals().register(&c.frequency, p);
            }
            PortalState {
                frequency: c.frequency.clone(),
                is_source: c.is_source,
                is_target: c.is_target,
            }
        });

        TileState {
            template,
            spawner,
            portal,
        }
    }

    pub fn template<'a>(&self, maze: &'a Maze) -> &'a TileTemplate {
        maze.template(self.template)
    }
}

/// Kinds of tile behavior that keep world-wide shared state.
#[derive(Copy, Clone, Eq, PartialEq, Debug, strum::EnumCount)]
pub enum BehaviorKind {
    Spawner,
    Portal,
}

/// World-wide state shared by all tiles of one behavior kind.
#[derive(Clone, Debug)]
enum SharedState {
    Spawner(SpawnLog),
    Portal(PortalNetwork),
}

impl SharedState {
    fn new(kind: BehaviorKind) -> Self {
        match kind {
            BehaviorKind::Spawner => SharedState::Spawner(Default::default()),
            BehaviorKind::Portal => SharedState::Portal(Default::default()),
        }
    }

    fn new_turn(&mut self) {
        match self {
            SharedState::Spawner(_) => {}
            SharedState::Portal(p) => p.teleported = false,
        }
    }
}

/// Bookkeeping of spawned enemies.
#[derive(Clone, Default, Debug)]
pub struct SpawnLog {
    pub spawned: u32,
}

/// All portals of a world, grouped by frequency.
#[derive(Clone, Default, Debug)]
pub struct PortalNetwork {
    portals: IndexMap<String, Vec<Position>>,
    /// Player already went through a portal this turn.
    pub teleported: bool,
}

impl PortalNetwork {
    pub fn register(&mut self, frequency: &str, p: Position) {
        self.portals.entry(frequency.to_owned()).or_default().push(p);
    }

    /// Portals that can be teleported to on a frequency.
    pub fn targets(&self, frequency: &str) -> &[Position] {
        self.portals.get(frequency).map_or(&[], |v| v.as_slice())
    }
}

/// Per-world shared behavior state, one lazily created slot per kind.
#[derive(Clone, Default, Debug)]
pub(crate) struct WorldData {
    segments: [Option<SharedState>; BehaviorKind::COUNT],
}

impl WorldData {
    fn segment(&mut self, kind: BehaviorKind) -> &mut SharedState {
        self.segments[kind as usize]
            .get_or_insert_with(|| SharedState::new(kind))
    }

    pub fn portals(&mut self) -> &mut PortalNetwork {
        match self.segment(BehaviorKind::Portal) {
            SharedState::Portal(p) => p,
            _ => unreachable!(),
        }
    }

    pub fn spawn_log(&mut self) -> &mut SpawnLog {
        match self.segment(BehaviorKind::Spawner) {
            SharedState::Spawner(s) => s,
            _ => unreachable!(),
        }
    }

    /// Reset per-turn flags at the start of a new player turn.
    pub fn new_turn(&mut self) {
        for s in self.segments.iter_mut().flatten() {
            s.new_turn();
        }
    }
}

impl World {
    /// Run every tile behavior once, in x-major order.
    pub fn tick(&mut self) {
        for i in 0..self.tiles.len() {
            let p = self.maze().position(i);
            self.tick_spawner(i, p);
            self.tick_portal(i, p);
        }
    }

    fn tick_spawner(&mut self, idx: usize, p: Position) {
        // Walls never spawn anything.
        if self.maze().blocks_movement(p) {
            return;
        }
        let occupied = self.entities.contains_key(&p);

        let Some(spawner) = self.tiles[idx].spawner.as_mut() else {
            return;
        };
        let Some(kind) = spawner.enemy else {
            return;
        };

        if spawner.cooldown_left <= 0 && !occupied {
            spawner.cooldown_left = spawner.cooldown;
            self.spawn_enemy(p, kind);
        } else {
            spawner.cooldown_left -= 1;
        }
    }

    fn spawn_enemy(&mut self, p: Position, kind: EnemyType) {
        let Some(archetype) = self.content.enemy(kind) else {
            log::warn!("spawner at {p}: unknown enemy type {kind}");
            return;
        };
        log::debug!("spawned {} at {p}", archetype.name);
        self.entities.insert(p, Entity::Enemy(archetype.spawn()));
        self.data.spawn_log().spawned += 1;
    }

    fn tick_portal(&mut self, idx: usize, p: Position) {
        let Some(portal) = &self.tiles[idx].portal else {
            return;
        };
        if !portal.is_source || p != self.player {
            return;
        }

        let network = self.data.portals();
        if network.teleported {
            return;
        }

        let candidates: Vec<Position> = network
            .targets(&portal.frequency)
            .iter()
            .copied()
            .filter(|&q| q != p && !self.entities.contains_key(&q))
            .collect();
        let Some(&dest) = candidates.choose(&mut self.rng) else {
            return;
        };

        network.teleported = true;
        log::debug!("teleported from {p} to {dest}");
        self.relocate(p, dest);
        self.visit();
    }

    /// Number of enemies spawners have created so far.
    pub fn spawned(&self) -> u32 {
        match &self.data.segments[BehaviorKind::Spawner as usize] {
            Some(SharedState::Spawner(log)) => log.spawned,
            _ => 0,
        }
    }
}
