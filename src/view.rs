//! Plain text rendering of the game state.

use std::fmt::Write;

use engine::{prelude::*, LevelChoice, Session};

/// Draw the parts of the maze the player has seen, with a status line.
///
/// Entities only show up on cells that are currently in view.
pub fn map(world: &World) -> String {
    let mut ret = String::new();
    let size = world.size();

    for x in 0..size.x {
        for y in 0..size.y {
            let p = ivec2(x, y);
            let c = if !world.is_visited(p) {
                ' '
            } else if let Some(e) =
                world.entity(p).filter(|_| world.is_visible(p))
            {
                e.symbol()
            } else if p == world.maze().end {
                '>'
            } else {
                world.tile(p).map_or(' ', |t| t.symbol())
            };
            ret.push(c);
        }
        ret.push('\n');
    }

    let stats = world.player_stats();
    let _ = writeln!(
        ret,
        "HP {}  Damage {}  Sight {}  Kills {}  Rounds {}",
        stats.hp,
        stats.damage,
        stats.sight,
        world.kills(),
        world.rounds()
    );
    ret
}

/// List the mazes and the current selection.
pub fn menu(session: &Session) -> String {
    let mut ret = String::new();
    let selected = match session.choice() {
        LevelChoice::Maze(id) => Some(id.as_str()),
        LevelChoice::Freeplay => None,
    };

    for e in session.levels() {
        let mark = if Some(e.id.as_str()) == selected { '>' } else { ' ' };
        let state = match (e.done, e.available) {
            (true, _) => "done",
            (false, true) => "open",
            (false, false) => "locked",
        };
        let _ = writeln!(ret, "{mark} {:<16} {:<6} {}", e.id, state, e.name);
    }

    let mark = if selected.is_none() { '>' } else { ' ' };
    let _ = writeln!(ret, "{mark} freeplay");
    ret.push_str("start | select <maze> | freeplay | exit\n");
    ret
}
