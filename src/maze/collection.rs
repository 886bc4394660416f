use std::{collections::HashSet, fmt, hash::Hash};

use rand::Rng;

use super::{Node, Wall};
use crate::error::{MazeError, Result};

/// Ordered collection of nodes without duplicates.
pub type NodeCollection = Collection<Node>;
/// Ordered collection of walls without duplicates, walls compared as unordered pairs.
pub type WallCollection = Collection<Wall>;

/// Insertion-ordered, duplicate-free collection.
///
/// Membership, lookup and removal go through the element's own equality, so for walls
/// `wall(a, b)` finds a stored `wall(b, a)`. The insertion order is part of the
/// generators' reproducibility: random draws are uniform indices into it.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    members: HashSet<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection {
            items: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Collection {
            items: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Appends `item` unless an equal item is already stored.
    /// Returns `true` if the item was added.
    pub fn insert(&mut self, item: T) -> bool {
        if !self.members.insert(item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Returns the stored item equal to `item`, if any.
    pub fn get(&self, item: &T) -> Option<T> {
        self.members.get(item).copied()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.members.contains(item)
    }

    /// Removes the stored item equal to `item`, keeping the order of the rest.
    /// Returns the removed item, or `None` if nothing matched.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let stored = self.members.take(item)?;
        if let Some(pos) = self.items.iter().position(|i| *i == stored) {
            self.items.remove(pos);
        }
        Some(stored)
    }

    /// # Errors
    /// [`MazeError::IndexOutOfRange`] if `index >= len()`.
    pub fn get_index(&self, index: usize) -> Result<T> {
        self.items
            .get(index)
            .copied()
            .ok_or(MazeError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
    }

    /// Removes the item at `index`, keeping the order of the rest.
    ///
    /// # Errors
    /// [`MazeError::IndexOutOfRange`] if `index >= len()`.
    pub fn remove_index(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(MazeError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let item = self.items.remove(index);
        self.members.remove(&item);
        Ok(item)
    }

    /// Removes the item at `index` by moving the last item into its place.
    ///
    /// # Errors
    /// [`MazeError::IndexOutOfRange`] if `index >= len()`.
    pub fn swap_remove_index(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(MazeError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let item = self.items.swap_remove(index);
        self.members.remove(&item);
        Ok(item)
    }

    /// Removes and returns an item picked uniformly at random, `None` when the collection is
    /// empty. Draws exactly like [`choose`](Collection::choose) and fills the gap with the last
    /// item.
    pub fn take_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.items.len());
        self.swap_remove_index(index).ok()
    }

    /// Picks an item uniformly at random, `None` when the collection is empty.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items[rng.random_range(0..self.items.len())])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Copy + Eq + Hash> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Collection::new();
        iter.into_iter().for_each(|item| {
            collection.insert(item);
        });
        collection
    }
}

impl<T: Copy + Eq + Hash> Extend<T> for Collection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| {
            self.insert(item);
        });
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    /// Two collections are equal when they hold the same items in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: fmt::Display> fmt::Display for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn wall(a: (u32, u32), b: (u32, u32)) -> Wall {
        Wall::new(a.into(), b.into()).unwrap()
    }

    #[test]
    fn test_insert_keeps_order_and_rejects_duplicates() {
        let mut nodes = NodeCollection::new();
        assert!(nodes.insert(Node::at(2, 0)));
        assert!(nodes.insert(Node::at(0, 0)));
        assert!(!nodes.insert(Node::at(2, 0)));
        assert_eq!(nodes.as_slice(), &[Node::at(2, 0), Node::at(0, 0)]);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_walls_match_as_unordered_pairs() {
        let mut walls = WallCollection::new();
        walls.insert(wall((0, 0), (1, 0)));
        assert!(!walls.insert(wall((1, 0), (0, 0))));
        assert!(walls.contains(&wall((1, 0), (0, 0))));

        // Lookup returns the stored instance, with its original endpoint order
        let stored = walls.get(&wall((1, 0), (0, 0))).unwrap();
        assert_eq!(stored.a(), Node::at(0, 0));

        assert_eq!(walls.remove(&wall((1, 0), (0, 0))), Some(stored));
        assert!(walls.is_empty());
        assert_eq!(walls.remove(&stored), None);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut nodes: NodeCollection = (0..5).map(|x| Node::at(x, 0)).collect();
        nodes.remove(&Node::at(1, 0));
        assert_eq!(nodes.remove_index(1), Ok(Node::at(2, 0)));
        assert_eq!(
            nodes.as_slice(),
            &[Node::at(0, 0), Node::at(3, 0), Node::at(4, 0)]
        );
        // Re-adding a removed item is allowed and goes to the back
        assert!(nodes.insert(Node::at(1, 0)));
        assert_eq!(nodes.get_index(3), Ok(Node::at(1, 0)));
    }

    #[test]
    fn test_swap_remove() {
        let mut nodes: NodeCollection = (0..4).map(|x| Node::at(x, 0)).collect();
        assert_eq!(nodes.swap_remove_index(0), Ok(Node::at(0, 0)));
        assert_eq!(
            nodes.as_slice(),
            &[Node::at(3, 0), Node::at(1, 0), Node::at(2, 0)]
        );
        assert!(!nodes.contains(&Node::at(0, 0)));
        assert_eq!(
            nodes.swap_remove_index(3),
            Err(MazeError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_take_random_drains() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut nodes: NodeCollection = (0..6).map(|x| Node::at(x, 1)).collect();
        let mut taken: Vec<Node> = std::iter::from_fn(|| nodes.take_random(&mut rng)).collect();
        assert!(nodes.is_empty());
        taken.sort();
        assert_eq!(taken, (0..6).map(|x| Node::at(x, 1)).collect::<Vec<_>>());
    }

    #[test]
    fn test_index_out_of_range() {
        let mut nodes: NodeCollection = [Node::at(0, 0)].into_iter().collect();
        assert_eq!(
            nodes.get_index(1),
            Err(MazeError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            nodes.remove_index(3),
            Err(MazeError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_choose() {
        let mut rng = StdRng::seed_from_u64(7);
        let empty = NodeCollection::new();
        assert_eq!(empty.choose(&mut rng), None);

        let nodes: NodeCollection = (0..4).map(|y| Node::at(0, y)).collect();
        for _ in 0..32 {
            let node = nodes.choose(&mut rng).unwrap();
            assert!(nodes.contains(&node));
        }
    }

    #[test]
    fn test_display() {
        let walls: WallCollection = [wall((0, 0), (1, 0)), wall((0, 0), (0, 1))]
            .into_iter()
            .collect();
        assert_eq!(walls.to_string(), "[(0, 0) | (1, 0), (0, 0) | (0, 1)]");
        assert_eq!(NodeCollection::new().to_string(), "[]");
    }
}
