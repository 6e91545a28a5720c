use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use nebula_app::logging;
use nebula_app::runner::{self, HeadlessOptions, LoopCommand, RunSummary};
use nebula_core::commands::ArenaCommand;
use nebula_sim::{SimConfig, SimulationEngine};

#[derive(Parser)]
#[command(author, version, about = "Headless NEBULA arena simulation", long_about = None)]
struct Args {
    /// JSON config file; omitted fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the config seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Report a kill every N ticks in place of a combat system
    #[arg(short, long)]
    kill_every: Option<u64>,

    /// Write every snapshot to stdout as a JSON line
    #[arg(long)]
    snapshots: bool,

    /// Pace ticks at the fixed tick rate on a game loop thread
    #[arg(long)]
    realtime: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => SimConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let engine = SimulationEngine::try_new(config).context("invalid simulation config")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = if args.realtime {
        run_realtime(engine, &args, &mut out)?
    } else {
        let options = HeadlessOptions {
            ticks: args.ticks,
            kill_every: args.kill_every,
            emit_snapshots: args.snapshots,
        };
        let mut engine = engine;
        runner::run_headless(&mut engine, &options, &mut out)?
    };

    info!("{summary:?}");
    Ok(())
}

fn run_realtime<W: Write>(engine: SimulationEngine, args: &Args, out: &mut W) -> Result<RunSummary> {
    let (snap_tx, snap_rx) = mpsc::channel();
    let (cmd_tx, handle) = runner::spawn_game_loop(engine, snap_tx).context("spawning game loop")?;
    cmd_tx
        .send(LoopCommand::Arena(ArenaCommand::StartGame))
        .context("game loop exited early")?;

    let mut summary = RunSummary::default();
    for tick in 0..args.ticks {
        let snapshot = snap_rx.recv().context("game loop exited early")?;
        summary.record(&snapshot);

        if let Some(every) = args.kill_every.filter(|&n| n > 0) {
            if tick % every == 0 {
                if let Some(enemy) = snapshot.enemies.first() {
                    let kill = ArenaCommand::ReportKill { entity: enemy.entity };
                    cmd_tx.send(LoopCommand::Arena(kill)).context("game loop exited early")?;
                }
            }
        }
        if args.snapshots {
            serde_json::to_writer(&mut *out, &snapshot)?;
            writeln!(out)?;
        }
    }

    // The loop may already be gone; joining is what matters.
    let _ = cmd_tx.send(LoopCommand::Shutdown);
    drop(snap_rx);
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?;
    Ok(summary)
}
