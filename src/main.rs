use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};

use magic_chess::board::{Board, DEFAULT_TT_MB, START_FEN};
use magic_chess::config::{EngineConfig, DEFAULT_DEPTH};
use magic_chess::engine::EngineController;
use magic_chess::uci::run_uci_loop;

/// Magic-bitboard chess engine speaking a UCI-style protocol on stdin/stdout.
#[derive(Parser, Debug)]
#[command(name = "magic_chess", version, about)]
struct Cli {
    /// Transposition table size in MB
    #[arg(long, default_value_t = DEFAULT_TT_MB)]
    hash: usize,

    /// Search depth used by `go` without an explicit depth
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// NNUE network file; material evaluation when omitted
    #[arg(long)]
    eval_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count leaf nodes of the legal move tree
    Perft {
        /// Position to start from
        #[arg(long, default_value = START_FEN)]
        fen: String,

        #[arg(long, default_value_t = 5)]
        depth: usize,

        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
}

fn init_logging(debug: bool) {
    let default_level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn run_perft(fen: &str, depth: usize, divide: bool) -> Result<()> {
    let mut board = Board::from_fen(fen).with_context(|| format!("bad --fen '{fen}'"))?;
    let start = Instant::now();
    let nodes = if divide {
        let counts = board.divide(depth);
        for (mv, count) in &counts {
            println!("{mv}: {count}");
        }
        println!();
        counts.iter().map(|(_, count)| count).sum()
    } else {
        board.perft(depth)
    };
    let elapsed = start.elapsed();
    println!("Nodes searched: {nodes}");
    info!(
        "perft {depth} took {:.3}s ({:.0} nps)",
        elapsed.as_secs_f64(),
        nodes as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    magic_chess::init();

    if let Some(Command::Perft { fen, depth, divide }) = &cli.command {
        return run_perft(fen, *depth, *divide);
    }

    let config = EngineConfig::default()
        .with_hash_mb(cli.hash)
        .with_default_depth(cli.depth)
        .with_eval_file(cli.eval_file);
    let controller = EngineController::from_config(&config).with_context(|| {
        format!(
            "loading eval file {}",
            config
                .eval_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string())
        )
    })?;
    info!(
        "hash {} MB, default depth {}",
        config.hash_mb, config.default_depth
    );
    run_uci_loop(controller, &config).context("protocol I/O failed")?;
    Ok(())
}
