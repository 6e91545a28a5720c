//! Game loop thread and headless batch runner.
//!
//! The real-time loop owns the engine on its own thread. Commands arrive via
//! an `mpsc` channel and snapshots leave through another. The headless runner
//! ticks as fast as possible and stands in for the combat collaborator by
//! reporting kills on a fixed cadence.

use std::io::Write;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, info};

use nebula_core::commands::ArenaCommand;
use nebula_core::constants::TICK_RATE;
use nebula_core::events::GameEvent;
use nebula_core::state::ArenaSnapshot;
use nebula_sim::SimulationEngine;

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Messages into the game loop thread.
#[derive(Debug, Clone)]
pub enum LoopCommand {
    Arena(ArenaCommand),
    Shutdown,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle. The loop exits on
/// `Shutdown`, when the command channel disconnects, or when nobody is left
/// to receive snapshots.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    snapshots: mpsc::Sender<ArenaSnapshot>,
) -> std::io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("nebula-game-loop".into())
        .spawn(move || run_game_loop(engine, cmd_rx, snapshots))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until shutdown or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    snapshots: mpsc::Sender<ArenaSnapshot>,
) {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Arena(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Hand the snapshot to the consumer
        if snapshots.send(snapshot).is_err() {
            debug!("snapshot receiver dropped; stopping game loop");
            return;
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Settings for a headless run.
#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub ticks: u64,
    /// Report the first enemy in the snapshot killed every this many ticks.
    pub kill_every: Option<u64>,
    /// Write every snapshot as a JSON line.
    pub emit_snapshots: bool,
}

/// Event tallies over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub highest_wave: u32,
    pub waves_completed: u32,
    pub boss_phases: u32,
    pub enemies_spawned: u32,
    pub enemies_killed: u32,
    pub shots_requested: u32,
}

impl RunSummary {
    pub fn record(&mut self, snapshot: &ArenaSnapshot) {
        self.ticks += 1;
        self.highest_wave = self.highest_wave.max(snapshot.wave.wave_number);
        for event in &snapshot.events {
            match event {
                GameEvent::WaveComplete { .. } => self.waves_completed += 1,
                GameEvent::BossPhaseStart { .. } => self.boss_phases += 1,
                GameEvent::EnemySpawned { .. } => self.enemies_spawned += 1,
                GameEvent::EnemyKilled { .. } => self.enemies_killed += 1,
                GameEvent::EnemyShootRequest { .. } => self.shots_requested += 1,
                _ => {}
            }
        }
    }
}

/// Start a game and run it for `options.ticks` ticks as fast as possible.
pub fn run_headless<W: Write>(
    engine: &mut SimulationEngine,
    options: &HeadlessOptions,
    out: &mut W,
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut last: Option<ArenaSnapshot> = None;

    engine.queue_command(ArenaCommand::StartGame);
    for tick in 0..options.ticks {
        if let (Some(every), Some(snapshot)) = (options.kill_every, last.as_ref()) {
            if every > 0 && tick % every == 0 {
                if let Some(enemy) = snapshot.enemies.first() {
                    engine.queue_command(ArenaCommand::ReportKill { entity: enemy.entity });
                }
            }
        }

        let snapshot = engine.tick();
        summary.record(&snapshot);
        if options.emit_snapshots {
            serde_json::to_writer(&mut *out, &snapshot)?;
            writeln!(out)?;
        }
        last = Some(snapshot);
    }

    info!(
        "ran {} ticks: reached wave {}, {} waves cleared, {} spawned, {} killed",
        summary.ticks,
        summary.highest_wave,
        summary.waves_completed,
        summary.enemies_spawned,
        summary.enemies_killed
    );
    Ok(summary)
}
