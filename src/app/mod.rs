pub mod config;
pub mod history;
pub mod timer;

use std::{
    io::Write,
    sync::mpsc::{Receiver, sync_channel},
    time::Duration,
};

use crossterm::{
    queue,
    style::{self, Attribute, Color, Stylize},
};
use thiserror::Error;

pub use config::{Config, ConfigError, Settings};
pub use history::SnapshotHistory;
pub use timer::Stopwatch;

use crate::{
    error::MazeError,
    generators::{CancelFlag, GeneratorKind, Outcome, new_generator},
    maze::{Maze, full_wall_count},
    snapshot::{ChannelSink, Snapshot},
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error("timer was stopped before it was started")]
    PrematureTimerStop,
    #[error("compute thread panicked")]
    ComputeThreadPanicked,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Summary of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: GeneratorKind,
    pub width: u32,
    pub height: u32,
    /// Effective seed, never 0
    pub seed: u64,
    pub outcome: Outcome,
    /// Number of snapshots the consumer received
    pub snapshots: usize,
    pub walls_removed: usize,
    pub walls_remaining: usize,
    /// Generation time, when the timer is enabled
    pub elapsed: Option<Duration>,
}

impl Report {
    /// Print the report as styled text.
    pub fn print(&self, out: &mut impl Write) -> std::io::Result<()> {
        let outcome = match self.outcome {
            Outcome::Completed => "Maze completed! ".with(Color::Green),
            Outcome::Cancelled => "Maze generation cancelled. ".with(Color::Yellow),
        };
        queue!(
            out,
            style::PrintStyledContent(outcome.attribute(Attribute::Bold)),
            style::Print(format!(
                "{}x{} maze with {}\r\n",
                self.width, self.height, self.kind
            )),
            style::PrintStyledContent("Seed: ".with(Color::Blue).attribute(Attribute::Bold)),
            style::Print(format!("{}\r\n", self.seed)),
            style::PrintStyledContent("Walls: ".with(Color::Blue).attribute(Attribute::Bold)),
            style::Print(format!(
                "{} removed, {} remaining\r\n",
                self.walls_removed, self.walls_remaining
            )),
            style::PrintStyledContent("Snapshots: ".with(Color::Blue).attribute(Attribute::Bold)),
            style::Print(format!("{}\r\n", self.snapshots))
        )?;
        if let Some(elapsed) = self.elapsed {
            queue!(
                out,
                style::PrintStyledContent("Time: ".with(Color::Blue).attribute(Attribute::Bold)),
                style::Print(format!("{} ms\r\n", elapsed.as_millis()))
            )?;
        }
        out.flush()
    }
}

/// What the compute thread hands back once the generator has returned.
struct Computed {
    outcome: Outcome,
    walls_remaining: usize,
    elapsed: Option<Duration>,
}

pub struct App {
    /// Maximum number of snapshots to keep after a run
    max_history_snapshots: usize,
    /// Raised to stop the current run early. Cleared once a run returns.
    cancel: CancelFlag,
    history: SnapshotHistory,
    /// The last run's maze, rebuilt from the snapshots it received
    maze: Option<Maze>,
}

impl Default for App {
    fn default() -> Self {
        App::new(10000)
    }
}

impl App {
    /// Maximum number of snapshots to buffer in the channel between compute and consumer threads
    const MAX_SNAPSHOTS_IN_CHANNEL_BUFFER: usize = 1000;

    pub fn new(max_history_snapshots: usize) -> Self {
        App {
            max_history_snapshots,
            cancel: CancelFlag::new(),
            history: SnapshotHistory::new(max_history_snapshots),
            maze: None,
        }
    }

    /// Handle that stops the current run when raised, from any thread. Raising it between runs
    /// cancels the next one.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Snapshots recorded by the last run.
    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    /// The maze as the consumer last saw it, `None` before the first run.
    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    /// Generate a maze as configured, consuming its snapshots on the calling thread.
    pub fn run(&mut self, config: &Config) -> Result<Report, AppError> {
        let settings = config.normalized();
        let mut generator =
            new_generator(settings.kind, settings.width, settings.height, settings.seed)?;
        let seed = generator.seed();
        generator.set_cancel_flag(self.cancel.clone());

        let mut maze = Maze::new(settings.width, settings.height)?;
        maze.initialize();

        let (snapshot_tx, snapshot_rx) =
            sync_channel::<Snapshot>(App::MAX_SNAPSHOTS_IN_CHANNEL_BUFFER);

        // Spawn a thread to generate the maze
        let animate = settings.animate;
        let timer = settings.timer;
        let compute_thread_handle = std::thread::spawn(move || -> Result<Computed, AppError> {
            let cancel = generator.cancel_flag();
            let mut sink = if animate {
                ChannelSink::new(snapshot_tx, cancel)
            } else {
                ChannelSink::final_only(snapshot_tx, cancel)
            };
            let mut stopwatch = Stopwatch::new();
            if timer {
                stopwatch.start();
            }
            let outcome = generator.run(&mut sink);
            let elapsed = if timer { Some(stopwatch.stop()?) } else { None };
            sink.send_final(generator.maze());
            Ok(Computed {
                outcome,
                walls_remaining: generator.maze().wall_count(),
                elapsed,
            })
            // The sink is dropped here, as well as the snapshot sender
        });

        let delay = if animate {
            settings.animation_delay
        } else {
            Duration::ZERO
        };
        let snapshots = self.consume(snapshot_rx, &mut maze, delay);

        let joined = compute_thread_handle.join();
        // A cancel request only ever applies to the run in flight
        self.cancel.reset();
        self.maze = Some(maze);
        let computed = joined.map_err(|_| AppError::ComputeThreadPanicked)??;

        let walls_remaining = computed.walls_remaining;
        let report = Report {
            kind: settings.kind,
            width: settings.width,
            height: settings.height,
            seed,
            outcome: computed.outcome,
            snapshots,
            walls_removed: full_wall_count(settings.width, settings.height) - walls_remaining,
            walls_remaining,
            elapsed: computed.elapsed,
        };
        tracing::info!("Run finished: {report:?}");
        Ok(report)
    }

    /// Apply snapshots to `maze` until the compute thread hangs up or the run is cancelled.
    /// Returns the number of snapshots received.
    fn consume(
        &mut self,
        snapshot_rx: Receiver<Snapshot>,
        maze: &mut Maze,
        delay: Duration,
    ) -> usize {
        self.history = SnapshotHistory::new(self.max_history_snapshots);
        let mut received = 0;
        for snapshot in snapshot_rx.iter() {
            if self.cancel.is_cancelled() {
                tracing::info!("Run cancelled, no longer consuming snapshots");
                break;
            }
            snapshot.apply(maze);
            tracing::debug!(
                "Snapshot {}: {} walls, {} unvisited nodes",
                snapshot.step(),
                maze.wall_count(),
                maze.node_count()
            );
            received += 1;
            self.history.add(snapshot);
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }
        received
        // The receiver is dropped here, unblocking a compute thread stuck on a full channel
    }

    /// Profiling mode: generate repeatedly in the background, discarding snapshots.
    /// Returns the mean generation time.
    pub fn profile(
        &self,
        kind: GeneratorKind,
        width: u32,
        height: u32,
        iterations: u32,
    ) -> Result<Duration, AppError> {
        let (snapshot_tx, snapshot_rx) =
            sync_channel::<Snapshot>(App::MAX_SNAPSHOTS_IN_CHANNEL_BUFFER);

        // Spawn a thread to drain snapshots
        let drain_thread_handle = std::thread::spawn(move || snapshot_rx.iter().count());

        let compute_thread_handle =
            std::thread::spawn(move || -> Result<Duration, AppError> {
                let mut total = Duration::ZERO;
                for iteration in 0..iterations {
                    let mut generator = new_generator(kind, width, height, 0)?;
                    let mut sink = ChannelSink::new(snapshot_tx.clone(), generator.cancel_flag());
                    let mut stopwatch = Stopwatch::started();
                    let outcome = generator.run(&mut sink);
                    let elapsed = stopwatch.stop()?;
                    tracing::info!(
                        "Iteration {iteration}: {outcome} in {elapsed:?} (seed {})",
                        generator.seed()
                    );
                    total += elapsed;
                }
                Ok(total)
            });

        let total = compute_thread_handle
            .join()
            .map_err(|_| AppError::ComputeThreadPanicked)??;
        let received = drain_thread_handle
            .join()
            .map_err(|_| AppError::ComputeThreadPanicked)?;

        let mean = total.checked_div(iterations).unwrap_or_default();
        tracing::info!(
            "Profiled {iterations} runs of {kind} on {width}x{height}: {received} snapshots, mean {mean:?}"
        );
        Ok(mean)
    }
}
