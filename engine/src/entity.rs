//! Things that occupy grid cells.

use serde::{Deserialize, Serialize};

use crate::{
    StatModifiers, DEFAULT_ENEMY_RANGE, DEFAULT_ENEMY_SIGHT,
    DEFAULT_PLAYER_SIGHT,
};

/// Numeric enemy type id used by content files.
pub type EnemyType = i32;

/// Occupant of a single grid cell.
#[derive(Clone, PartialEq, Debug)]
pub enum Entity {
    Player(PlayerStats),
    Enemy(Enemy),
    /// Loot lying on the floor, picked up by walking over it.
    Item(StatModifiers),
}

impl Entity {
    pub fn is_player(&self) -> bool {
        matches!(self, Entity::Player(_))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, Entity::Enemy(_))
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Entity::Item(_))
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Entity::Enemy(e) => Some(e),
            _ => None,
        }
    }

    /// Single character for plain text map display.
    pub fn symbol(&self) -> char {
        match self {
            Entity::Player(_) => '@',
            Entity::Enemy(e) => e.name.chars().next().unwrap_or('E'),
            Entity::Item(_) => '!',
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PlayerStats {
    pub hp: i32,
    pub damage: i32,
    pub sight: i32,
}

impl PlayerStats {
    pub fn new(hp: i32, damage: i32) -> Self {
        PlayerStats {
            hp,
            damage,
            sight: DEFAULT_PLAYER_SIGHT,
        }
    }

    /// Merge a picked up item into the stats.
    ///
    /// Damage and sight are added. Health is added as is unless the item
    /// declares a maximum, in which case it only heals up to that maximum
    /// and does nothing if the player is already at or above it.
    pub fn apply(&mut self, item: &StatModifiers) {
        match item.max_health {
            Some(max) => {
                if self.hp < max {
                    self.hp = (self.hp + item.health).min(max);
                }
            }
            None => self.hp += item.health,
        }

        self.damage += item.damage;
        self.sight += item.sight;
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// A live enemy on the map.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Enemy {
    pub kind: EnemyType,
    pub name: String,
    pub hp: i32,
    pub damage: i32,
    /// Number of steps or attacks per turn.
    pub speed: i32,
    pub sight: i32,
    pub range: i32,
    /// Loot table rolled when the enemy dies.
    pub loot: Option<String>,
}

/// Content definition that enemies are spawned from.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct EnemyArchetype {
    #[serde(rename = "type")]
    pub kind: EnemyType,
    pub health: i32,
    pub damage: i32,
    pub speed: i32,
    pub name: String,
    #[serde(default = "default_sight")]
    pub sight: i32,
    #[serde(default = "default_range")]
    pub range: i32,
    #[serde(default)]
    pub loot: Option<String>,
}

fn default_sight() -> i32 {
    DEFAULT_ENEMY_SIGHT
}

fn default_range() -> i32 {
    DEFAULT_ENEMY_RANGE
}

impl EnemyArchetype {
    pub fn new(kind: EnemyType, name: &str, health: i32, damage: i32) -> Self {
        EnemyArchetype {
            kind,
            health,
            damage,
            speed: 1,
            name: name.into(),
            sight: DEFAULT_ENEMY_SIGHT,
            range: DEFAULT_ENEMY_RANGE,
            loot: None,
        }
    }

    /// Create a fresh enemy instance at full health.
    pub fn spawn(&self) -> Enemy {
        Enemy {
            kind: self.kind,
            name: self.name.clone(),
            hp: self.health,
            damage: self.damage,
            speed: self.speed,
            sight: self.sight,
            range: self.range,
            loot: self.loot.clone(),
        }
    }
}
