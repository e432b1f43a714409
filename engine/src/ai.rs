//! Enemy turn.

use std::cmp::Ordering;

use crate::prelude::*;

impl World {
    /// Let every enemy that sees the player act.
    ///
    /// Enemies are collected in x-major grid order before anyone moves. Each
    /// one then gets `speed` sub-steps, attacking when the player is within
    /// its range on both axes and otherwise stepping closer. Moves take
    /// effect immediately, so later enemies see the new positions.
    pub fn enemy_move(&mut self) {
        let hunters: Vec<Position> = self
            .entities()
            .filter(|(_, e)| e.is_enemy())
            .map(|(p, _)| p)
            .filter(|&p| self.enemy_sees_player(p))
            .collect();

        for mut pos in hunters {
            let Some(Entity::Enemy(enemy)) = self.entity(pos) else {
                continue;
            };
            let (speed, range, damage) =
                (enemy.speed, enemy.range, enemy.damage);

            for _ in 0..speed {
                let offset = self.player_pos() - pos;
                if offset.cheb_len() <= range {
                    self.player_stats_mut().hp -= damage;
                    continue;
                }

                if let Some(next) = self.pursuit_step(pos, offset) {
                    self.relocate(pos, next);
                    pos = next;
                }
            }
        }
    }

    /// Pick the cell an enemy at `pos` steps into to get closer to a target
    /// at `pos + offset`.
    ///
    /// The axis with the larger distance goes first, on a tie the horizontal
    /// (y) axis goes first. If the preferred step is blocked, the other axis
    /// is tried. Returns `None` if neither works.
    fn pursuit_step(&self, pos: Position, offset: IVec2) -> Option<Position> {
        let along_x = ivec2(offset.x.signum(), 0);
        let along_y = ivec2(0, offset.y.signum());

        let order = match offset.x.abs().cmp(&offset.y.abs()) {
            Ordering::Greater => [along_x, along_y],
            Ordering::Less => [along_y, along_x],
            Ordering::Equal if offset != IVec2::ZERO => [along_y, along_x],
            Ordering::Equal => {
                unreachable!("World::pursuit_step: enemy on top of target")
            }
        };

        order
            .into_iter()
            .filter(|&d| d != IVec2::ZERO)
            .map(|d| pos + d)
            .find(|&p| self.can_enter(p))
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use rand::SeedableRng;

    use super::*;
    use crate::EnemyArchetype;

    /// World with enemy types 1 (sight 5, range 1, speed 1), 2 (speed 2) and
    /// 3 (range 2).
    fn world(map: &str) -> World {
        let mut content = ContentRegistry::new();
        content.add_enemy(EnemyArchetype {
            sight: 5,
            ..EnemyArchetype::new(1, "Rat", 10, 3)
        });
        content.add_enemy(EnemyArchetype {
            sight: 5,
            speed: 2,
            ..EnemyArchetype::new(2, "Goblin", 10, 4)
        });
        content.add_enemy(EnemyArchetype {
            sight: 5,
            range: 2,
            ..EnemyArchetype::new(3, "Archer", 10, 2)
        });

        World::new(
            Arc::new(Maze::from_ascii(map)),
            Arc::new(content),
            GameRng::seed_from_u64(1),
        )
        .unwrap()
    }

    fn enemies(w: &World) -> Vec<Position> {
        w.entities()
            .filter(|(_, e)| e.is_enemy())
            .map(|(p, _)| p)
            .collect()
    }

    #[test]
    fn tie_prefers_horizontal() {
        let mut w = world(
            "
            @....
            .....
            ..1..
            .....
            ....>",
        );
        w.enemy_move();
        assert_eq!(enemies(&w), vec![ivec2(2, 1)]);
    }

    #[test]
    fn larger_offset_first() {
        let mut w = world(
            "
            @....
            .....
            .....
            .1...
            ....>",
        );
        w.enemy_move();
        assert_eq!(enemies(&w), vec![ivec2(2, 1)]);
    }

    #[test]
    fn blocked_step_tries_other_axis() {
        let mut w = world(
            "
            @....
            .....
            .#1..
            .....
            ....>",
        );
        w.enemy_move();
        assert_eq!(enemies(&w), vec![ivec2(1, 2)]);
    }

    #[test]
    fn fully_blocked_stays() {
        let mut w = world(
            "
            @....
            ..#..
            .#1..
            .....
            ....>",
        );
        w.enemy_move();
        assert_eq!(enemies(&w), vec![ivec2(2, 2)]);
        assert_eq!(w.player_stats().hp, 100);
    }

    #[test]
    fn attacks_in_range() {
        let mut w = world(
            "
            @.3..
            .1...
            .....",
        );
        w.enemy_move();
        // Both hit without moving.
        assert_eq!(enemies(&w), vec![ivec2(0, 2), ivec2(1, 1)]);
        assert_eq!(w.player_stats().hp, 100 - 2 - 3);
    }

    #[test]
    fn speed_gives_substeps() {
        let mut w = world("@...2>");
        w.enemy_move();
        // Two steps west, then nothing left for an attack.
        assert_eq!(enemies(&w), vec![ivec2(0, 2)]);
        assert_eq!(w.player_stats().hp, 100);

        // Step then attack.
        w.enemy_move();
        assert_eq!(enemies(&w), vec![ivec2(0, 1)]);
        assert_eq!(w.player_stats().hp, 96);
    }

    #[test]
    fn moves_apply_immediately() {
        let mut w = world("@..11>");
        w.enemy_move();
        assert_eq!(enemies(&w), vec![ivec2(0, 2), ivec2(0, 3)]);
    }

    #[test]
    fn unseen_enemies_wait() {
        let mut w = world(
            "
            @.#..
            ..#.1
            ..#..
            ....>",
        );
        w.enemy_move();
        assert_eq!(enemies(&w), vec![ivec2(1, 4)]);
    }
}
