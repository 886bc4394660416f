use rand::{Rng, rngs::StdRng};

use super::{CancelFlag, Carving, GeneratorKind, MazeGenerator, Outcome, start_node};
use crate::{
    error::Result,
    maze::{Maze, NodeCollection, Wall, neighbors},
    snapshot::{Change, SnapshotSink},
};

/// Randomized depth-first search, a.k.a. the recursive backtracker, driven by an explicit
/// stack.
#[derive(Debug)]
pub struct RandomizedDfs {
    carving: Carving,
}

impl RandomizedDfs {
    pub fn new(width: u32, height: u32, seed: u64) -> Result<Self> {
        Ok(RandomizedDfs {
            carving: Carving::new(width, height, seed)?,
        })
    }
}

impl MazeGenerator for RandomizedDfs {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Dfs
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
        self.carving.run(GeneratorKind::Dfs, sink, carve::<StdRng>)
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

    // The stack only ever holds visited nodes
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }

        let unvisited: NodeCollection = neighbors(current, width, height)
            .into_iter()
            .filter(|&node| !maze.is_visited(node))
            .collect();
        let Some(next) = unvisited.choose(rng) else {
            // Dead end, backtrack
            continue;
        };

        // Put the current node back first so its other neighbors get looked at later
        stack.push(current);
        let wall = Wall::between_neighbors(current, next);
        maze.remove_wall(&wall);
        maze.visit(next);
        stack.push(next);
        sink.accept_change(maze, Change::Carve { wall, node: next });
    }

    Outcome::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generators::FixedRng,
        maze::{Node, full_wall_count},
    };

    fn run_recorded(width: u32, height: u32, seed: u64) -> (Outcome, Vec<Maze>) {
        let mut generator = RandomizedDfs::new(width, height, seed).unwrap();
        let mut snapshots = Vec::new();
        let outcome = generator.run(&mut |maze: &Maze| snapshots.push(maze.clone()));
        (outcome, snapshots)
    }

    struct Changes(Vec<Change>);

    impl SnapshotSink for Changes {
        fn accept(&mut self, _maze: &Maze) {}

        fn accept_change(&mut self, _maze: &Maze, change: Change) {
            self.0.push(change);
        }
    }

    /// Carved `(from, to)` pairs when every draw picks the first candidate.
    fn first_choice_carves(width: u32, height: u32) -> Vec<(Node, Node)> {
        let mut maze = Maze::new(width, height).unwrap();
        maze.initialize();
        let mut changes = Changes(Vec::new());
        let outcome = carve(&mut maze, &mut FixedRng(0), &CancelFlag::new(), &mut changes);
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(changes.0[0], Change::Start(Node::at(width / 2, height / 2)));
        changes.0[1..]
            .iter()
            .map(|change| match *change {
                Change::Carve { wall, node } => {
                    assert_eq!(wall.b(), node);
                    (wall.a(), node)
                }
                Change::Start(_) => panic!("start emitted twice"),
            })
            .collect()
    }

    fn pairs(coords: &[((u32, u32), (u32, u32))]) -> Vec<(Node, Node)> {
        coords
            .iter()
            .map(|&(a, b)| (Node::from(a), Node::from(b)))
            .collect()
    }

    #[test]
    fn test_first_choice_sequence() {
        // West, east, north, south: the first unvisited neighbour is always taken
        assert_eq!(
            first_choice_carves(3, 3),
            pairs(&[
                ((1, 1), (0, 1)),
                ((0, 1), (0, 0)),
                ((0, 0), (1, 0)),
                ((1, 0), (2, 0)),
                ((2, 0), (2, 1)),
                ((2, 1), (2, 2)),
                ((2, 2), (1, 2)),
                ((1, 2), (0, 2)),
            ])
        );
        assert_eq!(
            first_choice_carves(4, 3),
            pairs(&[
                ((2, 1), (1, 1)),
                ((1, 1), (0, 1)),
                ((0, 1), (0, 0)),
                ((0, 0), (1, 0)),
                ((1, 0), (2, 0)),
                ((2, 0), (3, 0)),
                ((3, 0), (3, 1)),
                ((3, 1), (3, 2)),
                ((3, 2), (2, 2)),
                ((2, 2), (1, 2)),
                ((1, 2), (0, 2)),
            ])
        );
    }

    #[test]
    fn test_three_by_three_seed_one() {
        let (outcome, snapshots) = run_recorded(3, 3, 1);
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(snapshots.len(), 9);

        // One more wall gone per snapshot after the first
        for (i, maze) in snapshots.iter().enumerate() {
            assert_eq!(maze.wall_count(), 12 - i);
            assert_eq!(maze.node_value(Node::at(1, 1)), 0);
        }
        let last = snapshots.last().unwrap();
        assert_eq!(last.wall_count(), 4);
        assert_eq!(full_wall_count(3, 3) - last.wall_count(), 8);

        let (_, replay) = run_recorded(3, 3, 1);
        assert_eq!(snapshots, replay);
    }

    #[test]
    fn test_carves_from_last_visited_node() {
        let mut generator = RandomizedDfs::new(6, 6, 5).unwrap();
        let mut changes = Changes(Vec::new());
        generator.run(&mut changes);
        // Each carve continues from the node visited by the step before, unless it backtracked
        // to a node still on the path
        let mut visited = vec![Node::at(3, 3)];
        for change in &changes.0[1..] {
            let Change::Carve { wall, node } = *change else {
                panic!("start emitted twice");
            };
            assert!(!visited.contains(&node));
            assert!(visited.contains(&wall.a()));
            visited.push(node);
        }
        assert_eq!(visited.len(), 36);
    }

    #[test]
    fn test_single_column() {
        let (outcome, snapshots) = run_recorded(1, 5, 8);
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(snapshots.len(), 5);
        let last = snapshots.last().unwrap();
        assert_eq!(last.wall_count(), 0);
        assert!((0..5).all(|y| last.is_visited(Node::at(0, y))));
    }
}
