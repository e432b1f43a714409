use crate::{EnemyType, DEFAULT_SPAWNER_COOLDOWN};

/// Static definition of a kind of map cell.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TileTemplate {
    pub blocks_movement: bool,
    pub blocks_vision: bool,
    /// Display hint, tile should be drawn as solid.
    pub looks_filled: bool,
    pub name: String,
    pub map_symbol: String,
    pub spawner: Option<SpawnerConfig>,
    pub portal: Option<PortalConfig>,
}

/// Tile periodically spawns enemies.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SpawnerConfig {
    /// Spawners with no enemy type never do anything.
    pub enemy: Option<EnemyType>,
    pub cooldown: i32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        SpawnerConfig {
            enemy: None,
            cooldown: DEFAULT_SPAWNER_COOLDOWN,
        }
    }
}

/// Tile teleports the player to other portals on the same frequency.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PortalConfig {
    pub frequency: String,
    /// Player can be teleported away from here.
    pub is_source: bool,
    /// Player can be teleported here.
    pub is_target: bool,
}

impl Default for TileTemplate {
    fn default() -> Self {
        TileTemplate {
            blocks_movement: false,
            blocks_vision: false,
            looks_filled: false,
            name: "unknown".into(),
            map_symbol: "%".into(),
            spawner: None,
            portal: None,
        }
    }
}

impl TileTemplate {
    /// Built-in tile id `0`.
    pub fn wall() -> Self {
        TileTemplate {
            blocks_movement: true,
            blocks_vision: true,
            looks_filled: true,
            name: "Wall".into(),
            map_symbol: "#".into(),
            ..Default::default()
        }
    }

    /// Built-in tile id `1`.
    pub fn floor() -> Self {
        TileTemplate {
            name: "Stone".into(),
            map_symbol: ".".into(),
            ..Default::default()
        }
    }

    /// Look up one of the built-in tiles by id.
    pub fn builtin(id: &str) -> Option<Self> {
        match id {
            "0" => Some(Self::wall()),
            "1" => Some(Self::floor()),
            _ => None,
        }
    }

    pub fn is_walkable(&self) -> bool {
        !self.blocks_movement
    }

    /// Single character for plain text map display.
    pub fn symbol(&self) -> char {
        self.map_symbol.chars().next().unwrap_or('?')
    }

    pub fn with_spawner(mut self, enemy: EnemyType, cooldown: i32) -> Self {
        self.spawner = Some(SpawnerConfig {
            enemy: Some(enemy),
            cooldown,
        });
        self
    }

    pub fn with_portal(
        mut self,
        frequency: impl Into<String>,
        is_source: bool,
        is_target: bool,
    ) -> Self {
        self.portal = Some(PortalConfig {
            frequency: frequency.into(),
            is_source,
            is_target,
        });
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtins() {
        let wall = TileTemplate::builtin("0").unwrap();
        assert!(wall.blocks_movement && wall.blocks_vision && wall.looks_filled);
        assert_eq!(wall.symbol(), '#');

        let floor = TileTemplate::builtin("1").unwrap();
        assert!(floor.is_walkable() && !floor.blocks_vision);
        assert_eq!(floor.symbol(), '.');

        assert_eq!(TileTemplate::builtin("lava"), None);
    }
}
