pub mod collection;
pub mod grid;
mod node;
mod wall;

use std::fmt;

pub use collection::{Collection, NodeCollection, WallCollection};
pub use grid::{full_wall_count, is_adjacent, neighbors, south_east_neighbors};
pub use node::Node;
pub use wall::Wall;

use crate::error::{MazeError, Result};

/// Value of a node that has not been reached by a generator yet.
pub const UNVISITED: i32 = 1;
/// Value of a carved node. This is also the implicit value of any node without an entry.
pub const VISITED: i32 = 0;
/// Largest number of nodes a maze can hold.
pub const MAX_CELLS: usize = 1 << 24;

/// The walls and node values of one `width` x `height` maze.
///
/// Walls are undirected and stored at most once. Node values default to 0: a node whose value
/// is 0 has no entry, so only non-zero values count as stored.
///
/// Storage is dense and row-major. Every wall is kept as the east or south side of its west or
/// north node, which makes adding, removing and looking up walls and values constant time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: u32,
    height: u32,
    /// `east[i]`: wall between node `i` and its east neighbour
    east: Vec<bool>,
    /// `south[i]`: wall between node `i` and its south neighbour
    south: Vec<bool>,
    wall_count: usize,
    values: Vec<i32>,
    /// Number of non-zero entries in `values`
    stored: usize,
}

impl Maze {
    /// Creates an empty maze (no walls, every node at value 0) of the given size in nodes.
    ///
    /// # Errors
    /// [`MazeError::InvalidSize`] if either dimension is 0 or the maze would have more than
    /// [`MAX_CELLS`] nodes.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let cells = (width as usize).checked_mul(height as usize);
        let Some(cells) = cells.filter(|&cells| cells > 0 && cells <= MAX_CELLS) else {
            return Err(MazeError::InvalidSize { width, height });
        };
        Ok(Maze {
            width,
            height,
            east: vec![false; cells],
            south: vec![false; cells],
            wall_count: 0,
            values: vec![0; cells],
            stored: 0,
        })
    }

    /// Returns the width of the maze in nodes.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the maze in nodes.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks if the given node is within the bounds of the maze.
    pub fn is_in_bounds(&self, node: Node) -> bool {
        node.is_in_bounds(self.width, self.height)
    }

    fn index(&self, node: Node) -> Option<usize> {
        self.is_in_bounds(node)
            .then(|| node.y() as usize * self.width as usize + node.x() as usize)
    }

    fn check_bounds(&self, node: Node) -> Result<usize> {
        self.index(node).ok_or(MazeError::OutOfBounds {
            node,
            width: self.width,
            height: self.height,
        })
    }

    /// The flag holding `wall`, `None` if the wall leaves the maze.
    fn slot(&self, wall: &Wall) -> Option<(bool, usize)> {
        let (first, second) = wall.ordered();
        self.index(second)?;
        Some((wall.is_vertical(), self.index(first)?))
    }

    fn slot_mut(&mut self, (east, index): (bool, usize)) -> &mut bool {
        if east {
            &mut self.east[index]
        } else {
            &mut self.south[index]
        }
    }

    /// Adds the wall between `a` and `b`.
    /// Returns `true` if the wall was not present before.
    ///
    /// # Errors
    /// * [`MazeError::InvalidWall`] if `a` and `b` are not adjacent
    /// * [`MazeError::OutOfBounds`] if either node lies outside the maze
    pub fn add_wall(&mut self, a: Node, b: Node) -> Result<bool> {
        self.insert_wall(Wall::new(a, b)?)
    }

    /// Adds `wall` to the maze. Returns `true` if the wall was not present before.
    ///
    /// # Errors
    /// [`MazeError::OutOfBounds`] if either endpoint lies outside the maze.
    pub fn insert_wall(&mut self, wall: Wall) -> Result<bool> {
        self.check_bounds(wall.a())?;
        self.check_bounds(wall.b())?;
        let Some(slot) = self.slot(&wall) else {
            return Ok(false);
        };
        let present = self.slot_mut(slot);
        if *present {
            return Ok(false);
        }
        *present = true;
        self.wall_count += 1;
        Ok(true)
    }

    /// Removes the wall between `a` and `b`, in either orientation.
    /// Returns `true` if a wall was removed, `false` if there was none.
    ///
    /// # Errors
    /// [`MazeError::InvalidWall`] if `a` and `b` are not adjacent.
    pub fn remove_wall_between(&mut self, a: Node, b: Node) -> Result<bool> {
        Ok(self.remove_wall(&Wall::new(a, b)?))
    }

    /// Removes `wall`. Returns `true` if a wall was removed, `false` if there was none.
    pub fn remove_wall(&mut self, wall: &Wall) -> bool {
        let Some(slot) = self.slot(wall) else {
            return false;
        };
        let present = self.slot_mut(slot);
        if !*present {
            return false;
        }
        *present = false;
        self.wall_count -= 1;
        true
    }

    pub fn contains_wall(&self, wall: &Wall) -> bool {
        match self.slot(wall) {
            Some((true, index)) => self.east[index],
            Some((false, index)) => self.south[index],
            None => false,
        }
    }

    /// Sets the value of a node. A value of 0 removes the node's entry, reverting it to
    /// the implicit default.
    ///
    /// # Errors
    /// [`MazeError::OutOfBounds`] if the node lies outside the maze.
    pub fn set_node_value(&mut self, node: Node, value: i32) -> Result<()> {
        let index = self.check_bounds(node)?;
        self.store(index, value);
        Ok(())
    }

    fn store(&mut self, index: usize, value: i32) {
        let old = std::mem::replace(&mut self.values[index], value);
        match (old == 0, value == 0) {
            (true, false) => self.stored += 1,
            (false, true) => self.stored -= 1,
            _ => {}
        }
    }

    /// Marks a node produced by the grid's neighbour functions as [`VISITED`].
    pub(crate) fn visit(&mut self, node: Node) {
        debug_assert!(self.is_in_bounds(node), "{node} lies outside the maze");
        if let Some(index) = self.index(node) {
            self.store(index, VISITED);
        }
    }

    /// Returns the value of a node, 0 if the node has no stored entry.
    pub fn node_value(&self, node: Node) -> i32 {
        self.index(node).map_or(VISITED, |index| self.values[index])
    }

    /// Whether a generator has carved its way into `node`.
    pub fn is_visited(&self, node: Node) -> bool {
        self.node_value(node) == VISITED
    }

    /// Every node of the maze, row by row.
    fn all_nodes(&self) -> impl Iterator<Item = Node> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Node::at(x, y)))
    }

    /// Iterates over the walls currently in the maze, row by row, each node's east wall before
    /// its south wall. Walls are given west to east and north to south.
    pub fn walls(&self) -> impl Iterator<Item = Wall> + '_ {
        self.all_nodes().flat_map(move |node| {
            south_east_neighbors(node, self.width, self.height)
                .map(move |neighbor| Wall::between_neighbors(node, neighbor))
                .filter(move |wall| self.contains_wall(wall))
        })
    }

    /// Iterates over the nodes with a stored (non-zero) value, row by row.
    pub fn nodes(&self) -> impl Iterator<Item = (Node, i32)> + '_ {
        self.all_nodes()
            .zip(self.values.iter().copied())
            .filter(|&(_, value)| value != 0)
    }

    /// Returns the number of walls in the maze.
    pub fn wall_count(&self) -> usize {
        self.wall_count
    }

    /// Returns the number of nodes with a stored value.
    pub fn node_count(&self) -> usize {
        self.stored
    }

    /// Resets the maze to the complete grid graph: a wall between every pair of adjacent
    /// nodes and every node marked [`UNVISITED`].
    pub fn initialize(&mut self) {
        let (width, height) = (self.width, self.height);
        self.all_nodes()
            .zip(self.east.iter_mut().zip(self.south.iter_mut()))
            .for_each(|(node, (east, south))| {
                *east = node.x().saturating_add(1) < width;
                *south = node.y().saturating_add(1) < height;
            });
        self.wall_count = full_wall_count(width, height);
        self.values.fill(UNVISITED);
        self.stored = self.values.len();
    }
}

impl fmt::Display for Maze {
    /// The maze's walls, e.g. `[(0, 0) | (1, 0), (0, 0) | (0, 1)]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let walls: WallCollection = self.walls().collect();
        write!(f, "{walls}")
    }
}
