use std::fmt;

use crate::error::{MazeError, Result};

/// A cell of the maze grid, identified by its coordinates.
///
/// Nodes are plain values: two nodes are equal iff their coordinates match. The
/// visited/unvisited marker of a node lives in the owning [`Maze`](super::Maze), not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    // Field order gives row-major ordering: y first, then x
    y: u32,
    x: u32,
}

impl Node {
    /// Creates a node from signed coordinates.
    ///
    /// # Errors
    /// [`MazeError::InvalidCoordinate`] if either coordinate is negative or does not fit
    /// into the grid's coordinate range.
    pub fn new(x: i64, y: i64) -> Result<Self> {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(x), Ok(y)) => Ok(Node { x, y }),
            _ => Err(MazeError::InvalidCoordinate { x, y }),
        }
    }

    /// Creates a node from coordinates that are non-negative by construction.
    pub const fn at(x: u32, y: u32) -> Self {
        Node { x, y }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    /// Checks if the node lies within a `width` x `height` grid.
    pub fn is_in_bounds(&self, width: u32, height: u32) -> bool {
        self.x < width && self.y < height
    }
}

impl From<(u32, u32)> for Node {
    fn from((x, y): (u32, u32)) -> Self {
        Node::at(x, y)
    }
}

impl From<Node> for (u32, u32) {
    fn from(node: Node) -> Self {
        (node.x, node.y)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
