use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use clap::Parser;
use engine::{
    prelude::*, GameCommand, LevelChoice, MenuCommand, MenuOutcome, Progress,
    Session, TurnOutcome,
};
use util::Logos;

mod view;

pub const GAME_NAME: &str = "mazecrawl";

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "data", help = "Game content directory")]
    data: PathBuf,

    #[arg(
        long,
        default_value = "data/storage.json",
        help = "Saved progress file"
    )]
    progress: PathBuf,

    #[arg(long, value_parser = |e: &str| Ok::<Logos, &str>(Logos::new(e)), help = "Game world seed")]
    seed: Option<Logos>,

    #[arg(long, help = "Start a generated maze right away")]
    freeplay: bool,

    #[arg(long, help = "Log filter, overrides RUST_LOG")]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    );
    if let Some(filter) = &args.log_level {
        logger.parse_filters(filter);
    }
    logger.init();

    let seed = args
        .seed
        .unwrap_or_else(|| Logos::sample(&mut rand::thread_rng(), 10));
    log::info!("{GAME_NAME} seed: {seed}");

    let content = Arc::new(ContentRegistry::load(&args.data)?);
    let progress = load_progress(&args.progress)?;
    let mut session = Session::new(content, progress, seed.rng());

    if args.freeplay {
        session.menu(MenuCommand::Select(LevelChoice::Freeplay))?;
        session.menu(MenuCommand::Start)?;
    }

    run(&mut session, &args.progress)?;
    save_progress(&args.progress, session.progress())
}

fn load_progress(path: &Path) -> anyhow::Result<Progress> {
    if !path.exists() {
        return Ok(Default::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))
}

fn save_progress(path: &Path, progress: &Progress) -> anyhow::Result<()> {
    fs::write(path, serde_json::to_string_pretty(progress)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Read commands from stdin until the player quits.
fn run(session: &mut Session, progress_path: &Path) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();

    show(session, &mut out)?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if session.world().is_some() {
            let Some(cmd) = parse_game_command(line) else {
                writeln!(out, "unknown command {line:?}")?;
                continue;
            };
            match session.play(cmd)? {
                TurnOutcome::Illegal => writeln!(out, "You can't go there.")?,
                TurnOutcome::Finished { survived: true } => {
                    writeln!(out, "You found the way out!")?;
                    save_progress(progress_path, session.progress())?;
                }
                TurnOutcome::Finished { survived: false } => {
                    writeln!(out, "You died. Restart or exit.")?
                }
                TurnOutcome::NotPlaying => {
                    writeln!(out, "The game is over. Restart or exit.")?
                }
                _ => {}
            }
        } else {
            match parse_menu_command(line) {
                Some(cmd) => match session.menu(cmd)? {
                    MenuOutcome::Quit => return Ok(()),
                    MenuOutcome::Unavailable => {
                        writeln!(out, "That maze isn't available.")?
                    }
                    MenuOutcome::Started => {
                        if let Some(world) = session.world() {
                            for line in &world.maze().info.text {
                                writeln!(out, "{line}")?;
                            }
                        }
                    }
                    MenuOutcome::Selected => {}
                },
                None => writeln!(out, "unknown command {line:?}")?,
            }
        }

        show(session, &mut out)?;
    }

    Ok(())
}

fn show(session: &Session, out: &mut impl Write) -> io::Result<()> {
    match session.world() {
        Some(world) => write!(out, "{}", view::map(world)),
        None => write!(out, "{}", view::menu(session)),
    }?;
    out.flush()
}

fn parse_game_command(s: &str) -> Option<GameCommand> {
    match s {
        "w" | "k" => Some(GameCommand::Up),
        "a" | "h" => Some(GameCommand::Left),
        "s" | "j" => Some(GameCommand::Down),
        "d" | "l" => Some(GameCommand::Right),
        "q" => Some(GameCommand::Exit),
        "r" => Some(GameCommand::Restart),
        s => s.parse().ok(),
    }
}

fn parse_menu_command(s: &str) -> Option<MenuCommand> {
    let mut words = s.split_whitespace();
    let cmd = match (words.next()?, words.next()) {
        ("start", None) => MenuCommand::Start,
        ("exit" | "quit" | "q", None) => MenuCommand::Exit,
        ("freeplay", None) => MenuCommand::Select(LevelChoice::Freeplay),
        ("select", Some(id)) => {
            MenuCommand::Select(LevelChoice::Maze(id.to_owned()))
        }
        _ => return None,
    };
    words.next().is_none().then_some(cmd)
}
