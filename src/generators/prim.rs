use rand::{Rng, rngs::StdRng};

use super::{CancelFlag, Carving, GeneratorKind, MazeGenerator, Outcome, start_node};
use crate::{
    error::Result,
    maze::{Maze, Wall, WallCollection, neighbors},
    snapshot::{Change, SnapshotSink},
};

/// Randomized Prim's algorithm over a frontier of walls bordering the visited region.
#[derive(Debug)]
pub struct RandomizedPrim {
    carving: Carving,
}

impl RandomizedPrim {
    pub fn new(width: u32, height: u32, seed: u64) -> Result<Self> {
        Ok(RandomizedPrim {
            carving: Carving::new(width, height, seed)?,
        })
    }
}

impl MazeGenerator for RandomizedPrim {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Prim
    }

    fn seed(&self) -> u64 {
        self.carving.seed
    }

    fn maze(&self) -> &Maze {
        &self.carving.maze
    }

    fn into_maze(self: Box<Self>) -> Maze {
        self.carving.maze
    }

    fn cancel_flag(&self) -> CancelFlag {
        self.carving.cancel.clone()
    }

    fn set_cancel_flag(&mut self, flag: CancelFlag) {
        self.carving.cancel = flag;
    }

    fn run(&mut self, sink: &mut dyn SnapshotSink) -> Outcome {
        self.carving.run(GeneratorKind::Prim, sink, carve::<StdRng>)
    }
}

/// Carve an initialized maze from its start node.
fn carve<R: Rng + ?Sized>(
    maze: &mut Maze,
    rng: &mut R,
    cancel: &CancelFlag,
    sink: &mut dyn SnapshotSink,
) -> Outcome {
    if cancel.is_cancelled() {
        return Outcome::Cancelled;
    }
    let (width, height) = (maze.width(), maze.height());
    let start = start_node(width, height);

    maze.visit(start);
    sink.accept_change(maze, Change::Start(start));

    // Every wall in the frontier has at least one visited endpoint
    let mut frontier: WallCollection = neighbors(start, width, height)
        .into_iter()
        .map(|node| Wall::between_neighbors(start, node))
        .collect();

    loop {
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }
        let Some(wall) = frontier.take_random(rng) else {
            break;
        };

        let node = match (maze.is_visited(wall.a()), maze.is_visited(wall.b())) {
            (true, false) => wall.b(),
            (false, true) => wall.a(),
            // Both sides already belong to the maze
            _ => continue,
        };

        maze.remove_wall(&wall);
        maze.visit(node);
        sink.accept_change(maze, Change::Carve { wall, node });

        frontier.extend(
            neighbors(node, width, height)
                .into_iter()
                .filter(|&neighbor| !maze.is_visited(neighbor))
                .map(|neighbor| Wall::between_neighbors(node, neighbor)),
        );
    }

    Outcome::Completed
}
