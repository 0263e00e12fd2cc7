//! Play a game at the terminal.
//!
//! ```text
//! werks-console -p Allen -p Bob --seed 42 --save game.json
//! werks-console --resume game.json
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use turnworks::core::{GameSetup, Player, SessionConfig};
use turnworks::engine::{Game, GameEngine};
use turnworks::games::engine_for;
use turnworks::games::tally::TallyEngine;
use turnworks::games::werks::{LocoCatalog, WerksEngine};
use turnworks::play_to_console;
use turnworks::session::Session;

#[derive(Parser)]
#[command(name = "werks-console")]
#[command(about = "Play a turn-based game from the terminal")]
struct Args {
    /// Player name, once per seat in seating order
    #[arg(short, long = "player", required_unless_present = "resume")]
    players: Vec<String>,

    /// Which game to play
    #[arg(long, value_enum, default_value = "werks")]
    game: GameKind,

    /// Game name shown to players
    #[arg(long, default_value = "Werks")]
    name: String,

    /// Seed for all randomness; drawn at random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Session settings as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of turns
    #[arg(long)]
    turns: Option<u32>,

    /// Locomotive catalog JSON (werks only)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Continue a saved game
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write the game here when play stops
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GameKind {
    Werks,
    Tally,
}

impl GameKind {
    fn kind(self) -> &'static str {
        match self {
            GameKind::Werks => WerksEngine::KIND,
            GameKind::Tally => TallyEngine::KIND,
        }
    }
}

fn load_config(args: &Args) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SessionConfig::default(),
    };
    if let Some(turns) = args.turns {
        config = config.with_turns(turns);
        config.validate()?;
    }
    Ok(config)
}

fn build_engine(
    args: &Args,
    config: &SessionConfig,
) -> Result<Box<dyn GameEngine>, Box<dyn std::error::Error>> {
    match (args.game, &args.catalog) {
        (GameKind::Werks, Some(path)) => {
            let catalog = LocoCatalog::from_json(&std::fs::read_to_string(path)?)?;
            Ok(Box::new(WerksEngine::new(catalog, config)))
        }
        (kind, _) => Ok(engine_for(kind.kind(), config)?),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = load_config(&args)?;
    let engine = build_engine(&args, &config)?;

    let mut session = match &args.resume {
        Some(path) => {
            let game = Game::read_from(BufReader::new(File::open(path)?))?;
            info!(path = %path.display(), actions = game.len(), "resuming");
            Session::restore(game, engine, &config)?
        }
        None => {
            let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
            let setup = GameSetup::builder()
                .id(format!("{}-{seed}", args.name.to_lowercase()))
                .name(args.name.clone())
                .players(
                    args.players
                        .iter()
                        .enumerate()
                        .map(|(i, name)| Player::new(format!("p{i}"), name.clone())),
                )
                .seed(seed)
                .build()?;
            Session::start(setup.into_game(), engine, &config)?
        }
    };

    let stdin = io::stdin();
    play_to_console(&mut session, stdin.lock(), io::stdout().lock())?;

    if let Some(path) = &args.save {
        let mut writer = BufWriter::new(File::create(path)?);
        session.game().write_to(&mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), actions = session.game().len(), "saved");
    }
    Ok(())
}
