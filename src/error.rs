use thiserror::Error;

use crate::maze::{MAX_CELLS, Node};

/// Contract violations raised by the maze data model.
///
/// None of these can be produced by the generators themselves: they only surface when a
/// caller builds nodes, walls or mazes from invalid input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("both coordinates must be non-negative, got x: {x}, y: {y}")]
    InvalidCoordinate { x: i64, y: i64 },
    #[error("nodes must be neighbours, got {a} and {b}")]
    InvalidWall { a: Node, b: Node },
    #[error("index {index} out of range for collection of size {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(
        "maze dimensions must be at least 1x1 and at most {max} cells, got {width}x{height}",
        max = MAX_CELLS
    )]
    InvalidSize { width: u32, height: u32 },
    #[error("node {node} lies outside of a {width}x{height} maze")]
    OutOfBounds { node: Node, width: u32, height: u32 },
}

/// Shorthand for results carrying a [`MazeError`].
pub type Result<T> = std::result::Result<T, MazeError>;

impl MazeError {
    pub(crate) fn invalid_wall(wall_a: Node, wall_b: Node) -> Self {
        MazeError::InvalidWall {
            a: wall_a,
            b: wall_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MazeError::InvalidCoordinate { x: -1, y: 3 };
        assert_eq!(
            err.to_string(),
            "both coordinates must be non-negative, got x: -1, y: 3"
        );

        let err = MazeError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "index 4 out of range for collection of size 2");

        let err = MazeError::InvalidSize {
            width: 0,
            height: 3,
        };
        assert_eq!(
            err.to_string(),
            "maze dimensions must be at least 1x1 and at most 16777216 cells, got 0x3"
        );

        let a = Node::new(0, 0).unwrap();
        let b = Node::new(2, 0).unwrap();
        assert_eq!(
            MazeError::invalid_wall(a, b).to_string(),
            "nodes must be neighbours, got (0, 0) and (2, 0)"
        );
    }
}
