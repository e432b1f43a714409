//! Loot tables and the items they drop.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stat changes applied to the player when an item is picked up.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize,
)]
#[serde(default, rename_all = "camelCase")]
pub struct StatModifiers {
    pub health: i32,
    pub damage: i32,
    pub sight: i32,
    /// Healing from this item won't raise health above this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_health: Option<i32>,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LootEntry {
    pub chance: f64,
    pub item: StatModifiers,
}

/// Weighted item drops. Chances don't need to sum to one, the remainder
/// drops nothing.
#[derive(Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct LootTable {
    pub content: Vec<LootEntry>,
}

impl LootTable {
    pub fn roll(&self, rng: &mut (impl Rng + ?Sized)) -> Option<StatModifiers> {
        let mut x: f64 = rng.gen();

        for e in &self.content {
            if x < e.chance {
                return Some(e.item);
            }
            x -= e.chance;
        }

        None
    }
}
