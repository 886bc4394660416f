use std::{
    fmt,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;
use thiserror::Error;

mod dfs;
mod prim;

pub use dfs::RandomizedDfs;
pub use prim::RandomizedPrim;

use crate::{
    error::Result,
    maze::{Maze, Node, full_wall_count},
    snapshot::SnapshotSink,
};

/// Shared flag used to ask a running generator to stop.
///
/// Clones share the same flag, so it can be raised from any thread. A generator checks it once
/// per loop iteration and returns [`Outcome::Cancelled`] when it is set.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Lower the flag again for every clone.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// How a call to [`MazeGenerator::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every node was visited: the carved corridors form a spanning tree.
    Completed,
    /// The cancel flag was raised before every node was visited.
    Cancelled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown generator type {0:?}, expected \"dfs\" or \"prim\"")]
pub struct UnknownGeneratorKind(pub String);

/// Available maze generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum GeneratorKind {
    #[default]
    Dfs,
    Prim,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 2] = [GeneratorKind::Dfs, GeneratorKind::Prim];
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Dfs => write!(f, "Randomized Depth-First Search (DFS)"),
            GeneratorKind::Prim => write!(f, "Prim's Algorithm"),
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = UnknownGeneratorKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("dfs") {
            Ok(GeneratorKind::Dfs)
        } else if s.eq_ignore_ascii_case("prim") {
            Ok(GeneratorKind::Prim)
        } else {
            Err(UnknownGeneratorKind(s.to_string()))
        }
    }
}

impl TryFrom<String> for GeneratorKind {
    type Error = UnknownGeneratorKind;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// A maze generation algorithm bound to the maze it carves.
pub trait MazeGenerator {
    fn kind(&self) -> GeneratorKind;

    /// The seed driving the generator's random draws. Never 0: a generator created with seed 0
    /// draws a fresh seed and reports it here.
    fn seed(&self) -> u64;

    fn maze(&self) -> &Maze;

    fn into_maze(self: Box<Self>) -> Maze;

    /// Handle that aborts [`run`](MazeGenerator::run) at its next loop iteration when raised.
    fn cancel_flag(&self) -> CancelFlag;

    /// Make the generator watch `flag` instead of its own cancel flag.
    fn set_cancel_flag(&mut self, flag: CancelFlag);

    /// Carve the maze, handing it to `sink` once after the start node is visited and once after
    /// every removed wall, through [`SnapshotSink::accept_change`].
    ///
    /// Running again after a previous run re-initializes the maze and replays the same
    /// sequence from the recorded seed.
    fn run(&mut self, sink: &mut dyn SnapshotSink) -> Outcome;
}

/// Create a generator of the given kind owning a freshly initialized `width` x `height` maze.
///
/// # Errors
/// [`MazeError::InvalidSize`](crate::error::MazeError::InvalidSize) if either dimension is 0 or
/// the grid has more than [`MAX_CELLS`](crate::maze::MAX_CELLS) nodes.
pub fn new_generator(
    kind: GeneratorKind,
    width: u32,
    height: u32,
    seed: u64,
) -> Result<Box<dyn MazeGenerator + Send>> {
    Ok(match kind {
        GeneratorKind::Dfs => Box::new(RandomizedDfs::new(width, height, seed)?),
        GeneratorKind::Prim => Box::new(RandomizedPrim::new(width, height, seed)?),
    })
}

/// The node every generator starts carving from: the middle of the grid.
pub fn start_node(width: u32, height: u32) -> Node {
    Node::at(width / 2, height / 2)
}

/// Replace the "pick one for me" seed 0 with a fresh non-zero random seed.
fn resolve_seed(seed: u64) -> u64 {
    match seed {
        0 => rand::rng().random_range(1..=u64::MAX),
        s => s,
    }
}

/// Get a random number generator seeded for reproducibility.
fn get_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// State shared by both generators: the maze being carved and what drives the carving.
#[derive(Debug)]
struct Carving {
    maze: Maze,
    rng: StdRng,
    seed: u64,
    cancel: CancelFlag,
    /// Whether `maze` and `rng` have been used by a run since they were last reset
    used: bool,
}

impl Carving {
    fn new(width: u32, height: u32, seed: u64) -> Result<Self> {
        let seed = resolve_seed(seed);
        let mut maze = Maze::new(width, height)?;
        maze.initialize();
        Ok(Carving {
            maze,
            rng: get_rng(seed),
            seed,
            cancel: CancelFlag::new(),
            used: false,
        })
    }

    /// Resets a used maze and RNG before a run.
    fn begin(&mut self, kind: GeneratorKind) {
        if self.used {
            tracing::debug!("Re-initializing maze to replay seed {}", self.seed);
            self.maze.initialize();
            self.rng = get_rng(self.seed);
        }
        self.used = true;
        tracing::info!(
            "Generating {}x{} maze with {kind}, seed {}",
            self.maze.width(),
            self.maze.height(),
            self.seed
        );
    }

    /// Run `carve` over the maze and RNG, logging the run boundaries.
    fn run<F>(&mut self, kind: GeneratorKind, sink: &mut dyn SnapshotSink, carve: F) -> Outcome
    where
        F: FnOnce(&mut Maze, &mut StdRng, &CancelFlag, &mut dyn SnapshotSink) -> Outcome,
    {
        self.begin(kind);
        let outcome = carve(&mut self.maze, &mut self.rng, &self.cancel, sink);
        self.finish(outcome)
    }

    fn finish(&self, outcome: Outcome) -> Outcome {
        let removed =
            full_wall_count(self.maze.width(), self.maze.height()) - self.maze.wall_count();
        match outcome {
            Outcome::Completed => tracing::info!(
                "Maze generation completed: {removed} walls carved, {} remaining",
                self.maze.wall_count()
            ),
            Outcome::Cancelled => {
                tracing::info!("Maze generation cancelled after carving {removed} walls")
            }
        }
        outcome
    }
}

/// RNG returning the same word forever, to pin which candidate every draw picks.
#[cfg(test)]
pub(crate) struct FixedRng(pub u32);

#[cfg(test)]
impl rand::RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.0) << 32) | u64::from(self.0)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.chunks_mut(4).for_each(|chunk| {
            let bytes = self.0.to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        });
    }
}
