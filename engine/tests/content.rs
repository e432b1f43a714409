use std::sync::Arc;

use engine::{
    prelude::*, GameCommand, LevelChoice, MazeGenerator, MenuCommand,
    MenuOutcome, Progress, Session, TurnOutcome, FREEPLAY_SIZE,
};
use rand::SeedableRng;
use strum::IntoEnumIterator;
use util::dijkstra_map;

fn content() -> Arc<ContentRegistry> {
    Arc::new(
        ContentRegistry::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../data"))
            .unwrap(),
    )
}

/// Walkable neighbors of a cell, portals count as links to every other
/// portal on their frequency.
fn neighbors(maze: &Maze, p: Position) -> Vec<Position> {
    let mut ret: Vec<Position> = DIR_4
        .iter()
        .map(|&d| p + d)
        .filter(|&q| !maze.blocks_movement(q))
        .collect();

    if let Some(src) = maze.tile(p).and_then(|t| t.portal.as_ref()) {
        if src.is_source {
            ret.extend(maze.positions().filter(|&q| {
                q != p
                    && maze.tile(q).and_then(|t| t.portal.as_ref()).map_or(
                        false,
                        |dst| dst.is_target && dst.frequency == src.frequency,
                    )
            }));
        }
    }
    ret
}

/// Shortest walk from start to end as grid steps, ignoring portals and
/// enemies.
fn walking_route(maze: &Maze) -> Option<Vec<Direction>> {
    let dist: HashMap<Position, usize> = dijkstra_map(
        |&p: &Position| {
            DIR_4
                .iter()
                .map(move |&d| p + d)
                .filter(|&q| !maze.blocks_movement(q))
                .collect::<Vec<_>>()
        },
        [maze.end],
    )
    .collect();

    let mut ret = Vec::new();
    let mut p = maze.start;
    while p != maze.end {
        let n = *dist.get(&p)?;
        let d = Direction::iter()
            .find(|d| dist.get(&(p + d.delta())) == Some(&(n - 1)))?;
        ret.push(d);
        p += d.delta();
    }
    Some(ret)
}

fn command(d: Direction) -> GameCommand {
    match d {
        Direction::North => GameCommand::Up,
        Direction::South => GameCommand::Down,
        Direction::West => GameCommand::Left,
        Direction::East => GameCommand::Right,
    }
}

#[test]
fn shipped_content_loads() {
    let content = content();
    assert!(content.maze(engine::DEFAULT_MAZE_ID).is_some());
    for dirs in Dirs::all_subsets() {
        assert!(!content.modules().get(dirs).is_empty(), "no module {dirs}");
    }
}

#[test]
fn every_maze_is_finishable() {
    let content = content();
    for (id, maze) in content.mazes() {
        let reached: HashSet<Position> = dijkstra_map(
            |&p: &Position| neighbors(maze, p),
            [maze.start],
        )
        .map(|(p, _)| p)
        .collect();
        assert!(reached.contains(&maze.end), "can't reach exit in {id}");

        for dep in &maze.info.dependencies {
            assert!(content.maze(dep).is_some(), "{id}: unknown dep {dep}");
        }
    }
}

#[test]
fn generated_mazes_are_valid() {
    let content = content();
    let [w, h] = FREEPLAY_SIZE;
    let mapgen = MazeGenerator::new(content.modules(), w, h).unwrap();

    for seed in 0..20 {
        let maze = mapgen.generate(&mut GameRng::seed_from_u64(seed));
        maze.validate().unwrap();
        assert_eq!(maze.size(), ivec2(h, w) * MODULE_SIZE);
        assert!(walking_route(&maze).is_some(), "seed {seed} unsolvable");
        World::new(
            Arc::new(maze),
            content.clone(),
            GameRng::seed_from_u64(seed),
        )
        .unwrap();
    }
}

#[test]
fn finishing_first_tutorial_unlocks_next() {
    let content = content();
    let mut session =
        Session::new(content, Progress::default(), GameRng::seed_from_u64(3));

    let locked = MenuCommand::Select(LevelChoice::Maze("tower".into()));
    assert_eq!(session.menu(locked).unwrap(), MenuOutcome::Unavailable);
    assert_eq!(
        session.menu(MenuCommand::Start).unwrap(),
        MenuOutcome::Started
    );

    let maze = session.content().maze("tutorial_move").unwrap().clone();
    let route = walking_route(&maze).unwrap();
    let (last, steps) = route.split_last().unwrap();
    for &d in steps {
        assert_eq!(session.play(command(d)).unwrap(), TurnOutcome::Moved);
    }
    assert_eq!(
        session.play(command(*last)).unwrap(),
        TurnOutcome::Finished { survived: true }
    );

    assert!(session.progress().is_completed("tutorial_move"));
    let fight =
        MenuCommand::Select(LevelChoice::Maze("tutorial_fight".into()));
    assert_eq!(session.menu(fight).unwrap(), MenuOutcome::Selected);
}

#[test]
fn freeplay_from_shipped_modules() {
    let mut session = Session::new(
        content(),
        Progress::default(),
        GameRng::seed_from_u64(9),
    );
    session
        .menu(MenuCommand::Select(LevelChoice::Freeplay))
        .unwrap();
    assert_eq!(
        session.menu(MenuCommand::Start).unwrap(),
        MenuOutcome::Started
    );

    let world = session.world().unwrap();
    // Freeplay mazes start fully revealed.
    assert!(world.is_visited(world.maze().end));
    assert_eq!(world.player_pos(), world.maze().start);
}
