use std::{
    fmt,
    hash::{Hash, Hasher},
};

use super::{Node, grid::is_adjacent};
use crate::error::{MazeError, Result};

/// A wall separating two grid-adjacent nodes.
///
/// Walls are undirected: `Wall::new(a, b) == Wall::new(b, a)`, and both hash the same.
/// The order the endpoints were given in is kept and exposed through [`Wall::a`] and
/// [`Wall::b`].
#[derive(Debug, Clone, Copy)]
pub struct Wall {
    a: Node,
    b: Node,
}

impl Wall {
    /// # Errors
    /// [`MazeError::InvalidWall`] if `a` and `b` are not adjacent.
    pub fn new(a: Node, b: Node) -> Result<Self> {
        if !is_adjacent(a, b) {
            return Err(MazeError::invalid_wall(a, b));
        }
        Ok(Wall { a, b })
    }

    /// Builds a wall between nodes the caller has obtained from the grid's neighbour
    /// functions, which are adjacent by construction.
    pub(crate) fn between_neighbors(a: Node, b: Node) -> Self {
        debug_assert!(is_adjacent(a, b), "{a} and {b} are not neighbours");
        Wall { a, b }
    }

    pub fn a(&self) -> Node {
        self.a
    }

    pub fn b(&self) -> Node {
        self.b
    }

    /// Endpoints in ascending (row-major) order: the west node first for a vertical wall, the
    /// north node first otherwise.
    pub(crate) fn ordered(&self) -> (Node, Node) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    /// Whether the wall runs between two horizontally adjacent nodes.
    pub fn is_vertical(&self) -> bool {
        self.a.y() == self.b.y()
    }
}

impl PartialEq for Wall {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for Wall {}

impl Hash for Wall {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.a, self.b)
    }
}
