//! Showtime ranking index
//!
//! A binary search tree of movies ordered by their showtime count, stored as
//! an arena of nodes with children referenced by position. Equal counts go to
//! the right subtree and the tree is never rebalanced, so its shape depends on
//! insertion order while the descending traversal does not.

mod persist;

pub use persist::IndexError;

use crate::data::MovieRecord;

#[derive(Debug, Clone)]
struct IndexNode {
    record: MovieRecord,
    /// Ranking key, computed once on insertion
    showtime_count: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Movies ranked by number of available showtimes
#[derive(Debug, Clone, Default)]
pub struct ShowtimeIndex {
    nodes: Vec<IndexNode>,
    root: Option<usize>,
}

impl ShowtimeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index by inserting `records` in order
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = MovieRecord>,
    {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Number of movies inserted
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a movie; a count strictly lower than a node's goes left, anything else right
    pub fn insert(&mut self, record: MovieRecord) {
        let showtime_count = record.showtime_count();
        let id = self.nodes.len();
        self.nodes.push(IndexNode {
            record,
            showtime_count,
            left: None,
            right: None,
        });

        let Some(mut current) = self.root else {
            self.root = Some(id);
            return;
        };

        loop {
            let node = &mut self.nodes[current];
            let slot = if showtime_count < node.showtime_count {
                &mut node.left
            } else {
                &mut node.right
            };
            match *slot {
                Some(next) => current = next,
                None => {
                    *slot = Some(id);
                    return;
                }
            }
        }
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty)
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();

        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[id];
            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }

        height
    }

    /// Movies from most to fewest showtimes
    pub fn iter_descending(&self) -> impl Iterator<Item = &MovieRecord> + '_ {
        Descending::new(self).map(|node| &node.record)
    }

    /// Movies from most to fewest showtimes, paired with their showtime count
    pub fn iter_ranked(&self) -> impl Iterator<Item = (usize, &MovieRecord)> + '_ {
        Descending::new(self).map(|node| (node.showtime_count, &node.record))
    }
}

/// Reverse in-order walk (right, node, left) with an explicit stack
struct Descending<'a> {
    nodes: &'a [IndexNode],
    stack: Vec<usize>,
}

impl<'a> Descending<'a> {
    fn new(index: &'a ShowtimeIndex) -> Self {
        let mut iter = Self {
            nodes: &index.nodes,
            stack: Vec::new(),
        };
        iter.push_right_spine(index.root);
        iter
    }

    fn push_right_spine(&mut self, mut current: Option<usize>) {
        while let Some(id) = current {
            self.stack.push(id);
            current = self.nodes[id].right;
        }
    }
}

impl<'a> Iterator for Descending<'a> {
    type Item = &'a IndexNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.nodes[id];
        self.push_right_spine(node.left);
        Some(node)
    }
}
