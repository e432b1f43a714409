//! Menu and in-game command surface.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    prelude::*, Direction, MazeGenerator, DEFAULT_MAZE_ID, FREEPLAY_SIZE,
};

/// Persistent player progress.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progress {
    /// Ids of mazes the player has won.
    pub completed: Vec<String>,
    /// Last selected maze.
    pub maze_id: String,
}

impl Default for Progress {
    fn default() -> Self {
        Progress {
            completed: Vec::new(),
            maze_id: DEFAULT_MAZE_ID.into(),
        }
    }
}

impl Progress {
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }

    /// Maze can be played if it's been won before or everything it depends
    /// on has been won.
    pub fn is_available(&self, id: &str, maze: &Maze) -> bool {
        self.is_completed(id)
            || maze.info.dependencies.iter().all(|d| self.is_completed(d))
    }

    fn complete(&mut self, id: &str) {
        if !self.is_completed(id) {
            self.completed.push(id.to_owned());
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum LevelChoice {
    /// Generated maze.
    Freeplay,
    Maze(String),
}

/// Maze listing line for level selection.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LevelEntry {
    pub id: String,
    pub name: String,
    pub tutorial: bool,
    pub order: String,
    pub done: bool,
    pub available: bool,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum MenuCommand {
    Start,
    Select(LevelChoice),
    Exit,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MenuOutcome {
    Started,
    Selected,
    /// Selection was unknown or locked, nothing changed.
    Unavailable,
    Quit,
}

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Debug,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameCommand {
    Up,
    Left,
    Down,
    Right,
    Exit,
    Restart,
}

impl GameCommand {
    pub fn direction(self) -> Option<Direction> {
        match self {
            GameCommand::Up => Some(Direction::North),
            GameCommand::Down => Some(Direction::South),
            GameCommand::Left => Some(Direction::West),
            GameCommand::Right => Some(Direction::East),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TurnOutcome {
    /// Move was not possible, nothing happened.
    Illegal,
    Moved,
    Attacked { killed: bool },
    /// Player reached the exit or died.
    Finished { survived: bool },
    Restarted,
    Exited,
    /// There is no game in progress to take the command.
    NotPlaying,
}

#[derive(Debug)]
struct Game {
    /// `None` for freeplay.
    id: Option<String>,
    maze: Arc<Maze>,
    world: World,
    over: bool,
}

/// A player's session, from the menu through play-throughs.
pub struct Session {
    content: Arc<ContentRegistry>,
    progress: Progress,
    choice: LevelChoice,
    rng: GameRng,
    game: Option<Game>,
}

impl Session {
    pub fn new(
        content: Arc<ContentRegistry>,
        progress: Progress,
        rng: GameRng,
    ) -> Self {
        let choice = LevelChoice::Maze(progress.maze_id.clone());
        Session {
            content,
            progress,
            choice,
            rng,
            game: None,
        }
    }

    pub fn content(&self) -> &ContentRegistry {
        &self.content
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn choice(&self) -> &LevelChoice {
        &self.choice
    }

    /// World of the current or just finished play-through.
    pub fn world(&self) -> Option<&World> {
        self.game.as_ref().map(|g| &g.world)
    }

    pub fn is_playing(&self) -> bool {
        self.game.as_ref().map_or(false, |g| !g.over)
    }

    /// All mazes, tutorials first, each group sorted by order key.
    pub fn levels(&self) -> Vec<LevelEntry> {
        let mut ret: Vec<LevelEntry> = self
            .content
            .mazes()
            .map(|(id, maze)| LevelEntry {
                id: id.to_owned(),
                name: maze.info.name.clone(),
                tutorial: maze.info.tutorial,
                order: maze.info.order.clone(),
                done: self.progress.is_completed(id),
                available: self.progress.is_available(id, maze),
            })
            .collect();

        ret.sort_by(|a, b| {
            (!a.tutorial, &a.order).cmp(&(!b.tutorial, &b.order))
        });
        ret
    }

    pub fn menu(&mut self, cmd: MenuCommand) -> Result<MenuOutcome> {
        match cmd {
            MenuCommand::Start => self.start(),
            MenuCommand::Select(LevelChoice::Freeplay) => {
                self.choice = LevelChoice::Freeplay;
                Ok(MenuOutcome::Selected)
            }
            MenuCommand::Select(LevelChoice::Maze(id)) => {
                if self.playable(&id).is_none() {
                    log::warn!("maze {id:?} is not available");
                    return Ok(MenuOutcome::Unavailable);
                }
                self.progress.maze_id = id.clone();
                self.choice = LevelChoice::Maze(id);
                Ok(MenuOutcome::Selected)
            }
            MenuCommand::Exit => Ok(MenuOutcome::Quit),
        }
    }

    fn playable(&self, id: &str) -> Option<Arc<Maze>> {
        let maze = self.content.maze(id)?;
        self.progress.is_available(id, maze).then(|| maze.clone())
    }

    fn start(&mut self) -> Result<MenuOutcome> {
        let (id, maze) = match &self.choice {
            LevelChoice::Freeplay => {
                let [w, h] = FREEPLAY_SIZE;
                let maze = MazeGenerator::new(self.content.modules(), w, h)?
                    .generate(&mut self.rng);
                (None, Arc::new(maze))
            }
            LevelChoice::Maze(id) => {
                let Some(maze) = self.playable(id) else {
                    log::warn!("maze {id:?} is not available");
                    return Ok(MenuOutcome::Unavailable);
                };
                (Some(id.clone()), maze)
            }
        };

        log::info!("starting {}", id.as_deref().unwrap_or("freeplay"));
        let world = self.new_world(&maze, id.is_none())?;
        self.game = Some(Game {
            id,
            maze,
            world,
            over: false,
        });
        Ok(MenuOutcome::Started)
    }

    fn new_world(
        &mut self,
        maze: &Arc<Maze>,
        freeplay: bool,
    ) -> Result<World> {
        let mut world = World::spawn_from(
            maze.clone(),
            self.content.clone(),
            &mut self.rng,
        )?;
        if freeplay {
            world.reveal_all();
        }
        Ok(world)
    }

    /// Run one in-game command to completion.
    pub fn play(&mut self, cmd: GameCommand) -> Result<TurnOutcome> {
        let Some(game) = self.game.as_ref() else {
            return Ok(TurnOutcome::NotPlaying);
        };

        let dir = match cmd {
            GameCommand::Exit => {
                self.game = None;
                return Ok(TurnOutcome::Exited);
            }
            GameCommand::Restart => {
                let (maze, freeplay) = (game.maze.clone(), game.id.is_none());
                let world = self.new_world(&maze, freeplay)?;
                if let Some(game) = self.game.as_mut() {
                    game.world = world;
                    game.over = false;
                }
                return Ok(TurnOutcome::Restarted);
            }
            _ if game.over => return Ok(TurnOutcome::NotPlaying),
            cmd => match cmd.direction() {
                Some(dir) => dir,
                None => unreachable!(),
            },
        };

        let Some(game) = self.game.as_mut() else {
            return Ok(TurnOutcome::NotPlaying);
        };
        let world = &mut game.world;

        let ret = match world.walk(dir) {
            MoveResult::Illegal => return Ok(TurnOutcome::Illegal),
            MoveResult::Moved => TurnOutcome::Moved,
            MoveResult::Attacked { killed } => {
                TurnOutcome::Attacked { killed }
            }
        };

        if !world.is_finished() {
            world.enemy_move();
            world.tick();
        }

        if !world.is_finished() {
            return Ok(ret);
        }

        let survived = world.survived();
        game.over = true;
        log::info!(
            "game over after {} rounds, {} kills, {}",
            world.rounds(),
            world.kills(),
            if survived { "won" } else { "died" }
        );
        if survived {
            if let Some(id) = &game.id {
                self.progress.complete(id);
            }
        }
        Ok(TurnOutcome::Finished { survived })
    }
}
