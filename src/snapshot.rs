use std::sync::mpsc::SyncSender;

use crate::{
    generators::CancelFlag,
    maze::{Maze, Node, Wall},
};

/// What one generator step did to the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The start node was marked visited
    Start(Node),
    /// `wall` was removed and `node` joined the maze through it
    Carve { wall: Wall, node: Node },
}

impl Change {
    /// Replay the change on `maze`, which should be in the state right before it.
    pub fn apply(&self, maze: &mut Maze) {
        match *self {
            Change::Start(node) => maze.visit(node),
            Change::Carve { wall, node } => {
                maze.remove_wall(&wall);
                maze.visit(node);
            }
        }
    }
}

/// Receiver of the intermediate maze states produced by a generator.
pub trait SnapshotSink {
    fn accept(&mut self, maze: &Maze);

    /// Same as [`accept`](SnapshotSink::accept), also told which change led to `maze`.
    /// Generators call this one.
    fn accept_change(&mut self, maze: &Maze, change: Change) {
        let _ = change;
        self.accept(maze);
    }
}

impl<F: FnMut(&Maze)> SnapshotSink for F {
    fn accept(&mut self, maze: &Maze) {
        self(maze)
    }
}

/// One emit of a run as it travels to another thread.
///
/// Step 0 is the start node being visited, every later step is one removed wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// The change made by emit `step`
    Step { step: usize, change: Change },
    /// The whole maze as it was after emit `step`
    State { step: usize, maze: Box<Maze> },
}

impl Snapshot {
    pub fn step(&self) -> usize {
        match self {
            Snapshot::Step { step, .. } | Snapshot::State { step, .. } => *step,
        }
    }

    /// Bring `maze` to the state after this snapshot. A [`Snapshot::Step`] expects `maze` to be
    /// at the step before.
    pub fn apply(&self, maze: &mut Maze) {
        match self {
            Snapshot::Step { change, .. } => change.apply(maze),
            Snapshot::State { maze: state, .. } => maze.clone_from(state),
        }
    }
}

/// Sink forwarding snapshots over a bounded channel to another thread.
///
/// Changes reported through [`SnapshotSink::accept_change`] travel as [`Snapshot::Step`], a plain
/// [`SnapshotSink::accept`] sends a copy of the whole maze. When the receiving end hangs up, the
/// sink raises its cancel flag so the generator feeding it stops at its next loop iteration.
pub struct ChannelSink {
    sender: SyncSender<Snapshot>,
    cancel: CancelFlag,
    /// Number of snapshots accepted so far
    steps: usize,
    /// Only forward the first snapshot, leaving the last one to [`ChannelSink::send_final`]
    final_only: bool,
}

impl ChannelSink {
    pub fn new(sender: SyncSender<Snapshot>, cancel: CancelFlag) -> Self {
        ChannelSink {
            sender,
            cancel,
            steps: 0,
            final_only: false,
        }
    }

    /// A sink that forwards the start snapshot and otherwise waits for
    /// [`send_final`](ChannelSink::send_final), for runs that are not animated.
    pub fn final_only(sender: SyncSender<Snapshot>, cancel: CancelFlag) -> Self {
        ChannelSink {
            final_only: true,
            ..ChannelSink::new(sender, cancel)
        }
    }

    /// Number of snapshots accepted so far, forwarded or not.
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn send(&self, snapshot: Snapshot) -> bool {
        match self.sender.send(snapshot) {
            Ok(()) => true,
            Err(_) => {
                // Receiver dropped, nobody is listening anymore
                tracing::debug!("Snapshot receiver disconnected, cancelling generation");
                self.cancel.cancel();
                false
            }
        }
    }

    /// Counts an accepted snapshot, returning its step if it should be forwarded.
    fn next_step(&mut self) -> Option<usize> {
        let step = self.steps;
        self.steps += 1;
        let held_back = self.final_only && step > 0;
        (!held_back && !self.cancel.is_cancelled()).then_some(step)
    }

    /// Forward the last accepted state if [`final_only`](ChannelSink::final_only) held it back.
    /// Returns whether a snapshot was sent.
    pub fn send_final(&mut self, maze: &Maze) -> bool {
        if !self.final_only || self.steps < 2 {
            return false;
        }
        self.send(Snapshot::State {
            step: self.steps - 1,
            maze: Box::new(maze.clone()),
        })
    }
}

impl SnapshotSink for ChannelSink {
    fn accept(&mut self, maze: &Maze) {
        if let Some(step) = self.next_step() {
            self.send(Snapshot::State {
                step,
                maze: Box::new(maze.clone()),
            });
        }
    }

    fn accept_change(&mut self, _maze: &Maze, change: Change) {
        if let Some(step) = self.next_step() {
            self.send(Snapshot::Step { step, change });
        }
    }
}
