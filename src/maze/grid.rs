use super::{Node, NodeCollection};

/// Get neighbors of a node.
/// A neighbor is a node one step away in the cardinal directions that lies within a
/// `width` x `height` grid. The order is fixed (west, east, north, south): generators draw
/// uniform indices into this list, so changing it changes every seeded maze.
pub fn neighbors(node: Node, width: u32, height: u32) -> NodeCollection {
    let (x, y): (u32, u32) = node.into();
    [
        // NOTE: When x or y is 0, wrapping_sub gives u32::MAX which is filtered out by the
        // bounds check. saturating_add keeps u32::MAX out of range for the same reason, as
        // the largest valid coordinate is u32::MAX - 1.
        (x.wrapping_sub(1), y),
        (x.saturating_add(1), y),
        (x, y.wrapping_sub(1)),
        (x, y.saturating_add(1)),
    ]
    .into_iter()
    .map(Node::from)
    .filter(|n| n.is_in_bounds(width, height))
    .collect()
}

/// The east and south neighbors of a node, when in bounds.
/// Visiting every node's south-east neighbors enumerates each adjacent pair exactly once.
pub fn south_east_neighbors(node: Node, width: u32, height: u32) -> impl Iterator<Item = Node> {
    let (x, y): (u32, u32) = node.into();
    [
        (x.saturating_add(1) < width).then(|| Node::at(x + 1, y)),
        (y.saturating_add(1) < height).then(|| Node::at(x, y + 1)),
    ]
    .into_iter()
    .flatten()
}

/// True iff `a` and `b` differ by exactly 1 in one coordinate and are equal in the other.
pub fn is_adjacent(a: Node, b: Node) -> bool {
    let dx = a.x().abs_diff(b.x());
    let dy = a.y().abs_diff(b.y());
    matches!((dx, dy), (1, 0) | (0, 1))
}

/// Number of adjacent node pairs in a `width` x `height` grid, i.e. the wall count of a
/// freshly initialized maze: `2wh - w - h`.
pub fn full_wall_count(width: u32, height: u32) -> usize {
    let (w, h) = (width as usize, height as usize);
    w.saturating_mul(h)
        .saturating_mul(2)
        .saturating_sub(w.saturating_add(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_order() {
        let found = neighbors(Node::at(3, 3), 7, 7);
        assert_eq!(
            found.as_slice(),
            &[Node::at(2, 3), Node::at(4, 3), Node::at(3, 2), Node::at(3, 4)]
        );
    }

    #[test]
    fn test_neighbors_at_edges() {
        assert_eq!(
            neighbors(Node::at(0, 0), 3, 3).as_slice(),
            &[Node::at(1, 0), Node::at(0, 1)]
        );
        assert_eq!(
            neighbors(Node::at(2, 2), 3, 3).as_slice(),
            &[Node::at(1, 2), Node::at(2, 1)]
        );
        assert!(neighbors(Node::at(0, 0), 1, 1).is_empty());
        // Out of bounds nodes still only get in-bounds neighbors
        assert_eq!(
            neighbors(Node::at(3, 0), 3, 1).as_slice(),
            &[Node::at(2, 0)]
        );
    }

    #[test]
    fn test_neighbors_near_coordinate_limit() {
        let node = Node::at(u32::MAX - 1, 0);
        assert_eq!(
            neighbors(node, u32::MAX, 1).as_slice(),
            &[Node::at(u32::MAX - 2, 0)]
        );
    }

    #[test]
    fn test_south_east_neighbors() {
        let found: Vec<_> = south_east_neighbors(Node::at(0, 0), 2, 2).collect();
        assert_eq!(found, vec![Node::at(1, 0), Node::at(0, 1)]);
        let found: Vec<_> = south_east_neighbors(Node::at(1, 1), 2, 2).collect();
        assert!(found.is_empty());
    }

    #[test]
    fn test_is_adjacent() {
        let a = Node::at(1, 1);
        assert!(is_adjacent(a, Node::at(0, 1)));
        assert!(is_adjacent(a, Node::at(1, 2)));
        assert!(!is_adjacent(a, a));
        assert!(!is_adjacent(a, Node::at(2, 2)));
        assert!(!is_adjacent(a, Node::at(3, 1)));
    }

    #[test]
    fn test_full_wall_count() {
        assert_eq!(full_wall_count(3, 3), 12);
        assert_eq!(full_wall_count(1, 5), 4);
        assert_eq!(full_wall_count(1, 1), 0);
        assert_eq!(full_wall_count(4, 2), 10);
        // Saturates instead of overflowing on absurd sizes
        assert!(full_wall_count(u32::MAX, u32::MAX) > 0);
    }
}
