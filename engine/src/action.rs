//! Player actions.

use crate::{prelude::*, Direction};

/// What happened when the player tried to move.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MoveResult {
    /// Move was not possible, the turn does not advance.
    Illegal,
    Moved,
    /// Player hit an enemy instead of moving.
    Attacked { killed: bool },
}

impl MoveResult {
    pub fn is_legal(self) -> bool {
        self != MoveResult::Illegal
    }
}

impl World {
    /// Move the player one step or attack whatever is in the way.
    pub fn walk(&mut self, dir: Direction) -> MoveResult {
        let target = self.player + dir.delta();

        // Covers out of bounds too.
        if self.maze().blocks_movement(target) {
            return MoveResult::Illegal;
        }

        let ret = match self.entities.get(&target) {
            Some(Entity::Enemy(_)) => MoveResult::Attacked {
                killed: self.attack(target),
            },
            Some(Entity::Player(_)) => {
                panic!("World::walk: second player at {target}")
            }
            None | Some(Entity::Item(_)) => {
                self.step(target);
                MoveResult::Moved
            }
        };

        self.data.new_turn();
        self.rounds += 1;
        ret
    }

    /// Move the player into a free cell, picking up any item there.
    fn step(&mut self, target: Position) {
        let item = match self.entities.remove(&target) {
            Some(Entity::Item(item)) => Some(item),
            None => None,
            Some(e) => panic!("World::step: {target} occupied by {e:?}"),
        };

        self.relocate(self.player, target);

        if let Some(item) = item {
            log::debug!("picked up {item:?}");
            self.player_stats_mut().apply(&item);
        }

        self.visit();
    }

    /// Hit the enemy at `target`, return whether it died.
    fn attack(&mut self, target: Position) -> bool {
        let damage = self.player_stats().damage;
        let Some(Entity::Enemy(enemy)) = self.entities.get_mut(&target) else {
            panic!("World::attack: no enemy at {target}");
        };

        enemy.hp -= damage;
        if enemy.hp > 0 {
            return false;
        }

        log::debug!("killed {} at {target}", enemy.name);
        let loot = enemy.loot.clone();
        self.entities.remove(&target);
        self.kills += 1;

        let drop = loot
            .as_deref()
            .and_then(|id| self.content.loot(id))
            .and_then(|table| table.roll(&mut self.rng));
        if let Some(item) = drop {
            self.entities.insert(target, Entity::Item(item));
        }

        true
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use rand::SeedableRng;

    use super::*;
    use crate::{
        world::test::world, Direction::*, EnemyArchetype, LootEntry,
        LootTable, StatModifiers,
    };

    #[test]
    fn walls_and_edges() {
        let mut w = world(
            "
            @#
            .>",
        );
        assert_eq!(w.walk(East), MoveResult::Illegal);
        assert_eq!(w.walk(North), MoveResult::Illegal);
        assert_eq!(w.walk(West), MoveResult::Illegal);
        assert_eq!(w.rounds(), 0);
        assert_eq!(w.walk(South), MoveResult::Moved);
        assert_eq!(w.rounds(), 1);
        assert_eq!(w.walk(South), MoveResult::Illegal);
    }

    #[test]
    fn combat_monotonicity() {
        let mut w = world("@1.>");
        let enemy = ivec2(0, 1);
        let hp = |w: &World| {
            w.entity(enemy).and_then(Entity::as_enemy).map(|e| e.hp)
        };

        assert_eq!(hp(&w), Some(30));
        assert_eq!(w.walk(East), MoveResult::Attacked { killed: false });
        assert_eq!(hp(&w), Some(6));
        assert_eq!(w.player_pos(), ivec2(0, 0));
        assert_eq!(w.walk(East), MoveResult::Attacked { killed: true });
        assert_eq!(w.entity(enemy), None);
        assert_eq!(w.kills(), 1);
        assert_eq!(w.rounds(), 2);

        assert_eq!(w.walk(East), MoveResult::Moved);
        assert_eq!(w.player_pos(), enemy);
    }

    #[test]
    fn kill_drops_loot() {
        let potion = StatModifiers {
            health: 15,
            damage: 1,
            ..Default::default()
        };
        let mut content = ContentRegistry::new();
        content.add_loot(
            "always",
            LootTable {
                content: vec![LootEntry {
                    chance: 1.0,
                    item: potion,
                }],
            },
        );
        content.add_enemy(EnemyArchetype {
            loot: Some("always".into()),
            ..EnemyArchetype::new(1, "Rat", 10, 1)
        });

        let mut w = World::new(
            Arc::new(Maze::from_ascii("@1>")),
            Arc::new(content),
            GameRng::seed_from_u64(1),
        )
        .unwrap();

        assert_eq!(w.walk(East), MoveResult::Attacked { killed: true });
        assert_eq!(w.entity(ivec2(0, 1)), Some(&Entity::Item(potion)));

        assert_eq!(w.walk(East), MoveResult::Moved);
        assert_eq!(w.player_stats().hp, 115);
        assert_eq!(w.player_stats().damage, 25);
    }
}
