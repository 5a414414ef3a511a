//! Command-line runner: play one game, run an auto-battle, or replay a
//! saved game record.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use grid_tactics::agents::{HeuristicPlayer, HumanPlayer, MctsPlayer, MinimaxPlayer, RandomPlayer};
use grid_tactics::core::{Board, GameError, Team};
use grid_tactics::eval::MaterialEvaluator;
use grid_tactics::game::{auto_battle, BattleConfig, GameManager, GameRecord, ManagerConfig, Player};
use grid_tactics::mcts::{
    AttackFirstRollout, CloneBackend, MCTSConfig, SearchBackend, TranspositionBackend, UndoBackend,
};

const DEFAULT_MAP: &str = include_str!("../../maps/skirmish.map");

#[derive(Parser, Debug)]
#[command(name = "tactics", about = "Two-team grid tactics with search-based agents")]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a single game.
    Play {
        #[command(flatten)]
        setup: Setup,

        /// Write the game record here.
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// Play several games and report totals.
    Battle {
        #[command(flatten)]
        setup: Setup,

        #[arg(long, default_value_t = 10)]
        games: u32,

        /// Keep the map's first mover in every game.
        #[arg(long)]
        no_alternate: bool,
    },
    /// Re-check a saved game record and print the final board.
    Replay { record: PathBuf },
}

#[derive(Args, Debug)]
struct Setup {
    /// Map file; the bundled skirmish map when omitted.
    #[arg(long)]
    map: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Agent::Mcts)]
    red: Agent,

    #[arg(long, value_enum, default_value_t = Agent::Heuristic)]
    blue: Agent,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// MCTS iterations per decision.
    #[arg(long, default_value_t = 200)]
    iterations: u32,

    /// Per-turn MCTS time budget in milliseconds.
    #[arg(long)]
    turn_ms: Option<u64>,

    #[arg(long, default_value_t = 10_000)]
    max_actions: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Agent {
    Human,
    Heuristic,
    Random,
    Minimax1,
    Minimax2,
    /// MCTS with the in-place undo backend.
    Mcts,
    MctsClone,
    MctsTt,
}

impl Setup {
    fn board(&self) -> Result<Board, GameError> {
        Ok(match &self.map {
            Some(path) => Board::from_map_file(path)?,
            None => Board::from_map_str(DEFAULT_MAP)?,
        })
    }

    fn player(&self, agent: Agent, seed: u64) -> Box<dyn Player> {
        let config = MCTSConfig::default().with_iterations(self.iterations).with_seed(seed);
        let budget = self.turn_ms.map(Duration::from_millis);
        match agent {
            Agent::Human => Box::new(HumanPlayer::stdio()),
            Agent::Heuristic => Box::new(HeuristicPlayer::new(seed)),
            Agent::Random => Box::new(RandomPlayer::new(seed)),
            Agent::Minimax1 => Box::new(MinimaxPlayer::new(1, Arc::new(MaterialEvaluator::default()))),
            Agent::Minimax2 => Box::new(MinimaxPlayer::new(2, Arc::new(MaterialEvaluator::default()))),
            Agent::Mcts => mcts(MctsPlayer::new(UndoBackend::new(), config), budget),
            Agent::MctsClone => mcts(MctsPlayer::new(CloneBackend::new(), config), budget),
            Agent::MctsTt => mcts(MctsPlayer::new(TranspositionBackend::new(), config), budget),
        }
    }
}

fn mcts<B>(player: MctsPlayer<B>, budget: Option<Duration>) -> Box<dyn Player>
where
    B: SearchBackend + 'static,
{
    let player = player.with_policy(AttackFirstRollout::default());
    match budget {
        Some(budget) => Box::new(player.with_turn_budget(budget)),
        None => Box::new(player),
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
}

fn run(cli: Cli) -> Result<(), GameError> {
    match cli.command {
        Command::Play { setup, record } => {
            let board = setup.board()?;
            let red = setup.player(setup.red, setup.seed);
            let blue = setup.player(setup.blue, setup.seed.wrapping_add(1));
            let mut manager = GameManager::new(board, red, blue)
                .with_config(ManagerConfig::default().with_max_actions(setup.max_actions));
            let summary = manager.play()?;
            println!("{}", manager.board());
            println!(
                "result: {} after {} turns (red hp {}, blue hp {})",
                summary.result,
                summary.turns,
                summary.remaining_hp[Team::Red],
                summary.remaining_hp[Team::Blue],
            );
            if let Some(path) = record {
                manager.record().save(&path)?;
                info!(path = %path.display(), "record saved");
            }
        }
        Command::Battle {
            setup,
            games,
            no_alternate,
        } => {
            let board = setup.board()?;
            let config = BattleConfig::default()
                .with_games(games)
                .with_alternation(!no_alternate)
                .with_manager(ManagerConfig::default().with_max_actions(setup.max_actions));
            let stats = auto_battle(&board, &config, |game| {
                let seed = setup.seed.wrapping_add(2 * u64::from(game));
                (setup.player(setup.red, seed), setup.player(setup.blue, seed.wrapping_add(1)))
            })?;
            println!(
                "red {} / blue {} / draw {} ({} decided by turn limit)",
                stats.red_wins, stats.blue_wins, stats.draws, stats.turn_limit_games
            );
        }
        Command::Replay { record } => {
            let record = GameRecord::load(&record)?;
            let board = record.replay()?;
            println!("{board}");
            match record.result {
                Some(result) => println!("{} actions, result: {result}", record.len()),
                None => println!("{} actions, unfinished", record.len()),
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "tactics failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
