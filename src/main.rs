use std::io;

use antichess::engine::{ComputerSide, Options};
use antichess::search::transposition::DEFAULT_CAPACITY;
use antichess::search::Difficulty;
use antichess::Engine;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Plays antichess over a line-oriented text protocol on stdin/stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Config {
    /// Search depth of the automated player, 1 to 10.
    #[arg(short, long, default_value = "1")]
    difficulty: Difficulty,

    /// Color played by the engine in the first game.
    #[arg(short, long, value_enum, default_value_t = ComputerSide::Black)]
    computer: ComputerSide,

    /// Transposition table capacity in entries.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    table_capacity: usize,

    /// Log filter used when `RUST_LOG` is not set. Logs go to stderr.
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    antichess::log_engine_info();

    let options = Options {
        difficulty: config.difficulty,
        computer: config.computer,
        table_capacity: config.table_capacity,
    };
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Engine::new(options, &mut input, &mut output).run()
}
