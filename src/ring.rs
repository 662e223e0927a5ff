//! A consistent hash ring implementation on a continuum of node points.
//!
//! The ring is a continuum of points, each with a hash value and the index of the node owning it.
//! When a key hash is passed to the ring, the ring returns the point with the smallest hash value
//! that is greater than or equal to the key's hash, wrapping around to the very first point when
//! the key's hash lies past the last one.
//!
//! Points are kept sorted by hash value so that lookups are a binary search over the continuum.

use std::iter::FromIterator;

struct Entry {
    value: i64,
    node_index: usize,
}

/// Ordered mapping from ring coordinate to node index.
#[derive(Default)]
pub struct Ring {
    continuum: Vec<Entry>,
}

impl Ring {
    /// Creates an empty [`Ring`].
    pub fn new() -> Ring {
        Ring::default()
    }

    /// Creates an empty [`Ring`] with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Ring {
        Ring {
            continuum: Vec::with_capacity(capacity),
        }
    }

    /// Places `node_index` at `value`, replacing whichever node previously owned that point.
    pub fn insert(&mut self, value: i64, node_index: usize) {
        match self.search(value) {
            Ok(index) => self.continuum[index].node_index = node_index,
            Err(index) => self.continuum.insert(index, Entry { value, node_index }),
        }
    }

    /// Number of points on the ring.
    pub fn len(&self) -> usize {
        self.continuum.len()
    }

    /// Whether the ring has no points at all.
    pub fn is_empty(&self) -> bool {
        self.continuum.is_empty()
    }

    /// Whether a point sits exactly at `value`.
    pub fn contains(&self, value: i64) -> bool {
        self.search(value).is_ok()
    }

    /// Exact lookup of the node owning the point at `value`.
    pub fn get(&self, value: i64) -> Option<usize> {
        self.search(value)
            .ok()
            .map(|index| self.continuum[index].node_index)
    }

    /// Returns the smallest point greater than or equal to `value`, or the smallest point on the
    /// ring if `value` lies past every point.
    ///
    /// # Panics
    ///
    /// Panics if the ring is empty.
    pub fn ceiling_or_wrap(&self, value: i64) -> i64 {
        self.continuum[self.ceiling_index(value)].value
    }

    /// Returns the node owning the point [`Ring::ceiling_or_wrap`] resolves `value` to.
    ///
    /// # Panics
    ///
    /// Panics if the ring is empty.
    pub fn node_index_for(&self, value: i64) -> usize {
        self.continuum[self.ceiling_index(value)].node_index
    }

    /// Smallest point on the ring.
    pub fn first_key(&self) -> Option<i64> {
        self.continuum.first().map(|e| e.value)
    }

    /// Largest point on the ring.
    pub fn last_key(&self) -> Option<i64> {
        self.continuum.last().map(|e| e.value)
    }

    /// Iterates over `(point, node_index)` pairs in ascending point order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.continuum.iter().map(|e| (e.value, e.node_index))
    }

    fn search(&self, value: i64) -> Result<usize, usize> {
        self.continuum.binary_search_by(|e| e.value.cmp(&value))
    }

    fn ceiling_index(&self, value: i64) -> usize {
        assert!(!self.continuum.is_empty(), "lookup on an empty ring");
        match self.search(value) {
            Ok(index) => index,
            Err(index) if index == self.continuum.len() => 0,
            Err(index) => index,
        }
    }
}

impl FromIterator<(i64, usize)> for Ring {
    /// Builds a ring from `(point, node_index)` pairs in one pass.
    ///
    /// Colliding points resolve the same way as repeated [`Ring::insert`] calls: the pair that
    /// comes last wins.
    fn from_iter<I: IntoIterator<Item = (i64, usize)>>(iter: I) -> Self {
        let mut continuum: Vec<Entry> = iter
            .into_iter()
            .map(|(value, node_index)| Entry { value, node_index })
            .collect();

        // stable sort: colliding points stay in arrival order
        continuum.sort_by_key(|e| e.value);
        continuum.dedup_by(|later, kept| {
            if later.value == kept.value {
                kept.node_index = later.node_index;
                true
            } else {
                false
            }
        });

        Ring { continuum }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_of(points: &[(i64, usize)]) -> Ring {
        let mut ring = Ring::new();
        for (value, node_index) in points {
            ring.insert(*value, *node_index);
        }
        ring
    }

    #[test]
    fn test_insert_keeps_points_sorted() {
        let ring = ring_of(&[(300, 2), (100, 0), (200, 1)]);

        assert_eq!(ring.len(), 3);
        assert_eq!(
            ring.iter().collect::<Vec<_>>(),
            vec![(100, 0), (200, 1), (300, 2)]
        );
        assert_eq!(ring.first_key(), Some(100));
        assert_eq!(ring.last_key(), Some(300));
    }

    #[test]
    fn test_insert_overwrites_colliding_point() {
        let ring = ring_of(&[(100, 0), (100, 3)]);

        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get(100), Some(3));
    }

    #[test]
    fn test_collect_sorts_and_keeps_last_collision() {
        let points = vec![(300, 2), (100, 0), (200, 1), (100, 4), (300, 5), (100, 6)];

        let collected: Ring = points.iter().copied().collect();
        let inserted = ring_of(&points);

        assert_eq!(
            collected.iter().collect::<Vec<_>>(),
            vec![(100, 6), (200, 1), (300, 5)]
        );
        assert_eq!(
            collected.iter().collect::<Vec<_>>(),
            inserted.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_collect_empty() {
        let ring: Ring = Vec::<(i64, usize)>::new().into_iter().collect();

        assert!(ring.is_empty());
    }

    #[test]
    fn test_contains_and_get() {
        let ring = ring_of(&[(100, 0), (200, 1)]);

        assert!(ring.contains(100));
        assert!(!ring.contains(150));
        assert_eq!(ring.get(200), Some(1));
        assert_eq!(ring.get(150), None);
    }

    #[test]
    fn test_ceiling_exact_match() {
        let ring = ring_of(&[(100, 0), (200, 1), (300, 2)]);

        assert_eq!(ring.ceiling_or_wrap(200), 200);
        assert_eq!(ring.node_index_for(200), 1);
    }

    #[test]
    fn test_ceiling_between_points() {
        let ring = ring_of(&[(100, 0), (200, 1), (300, 2)]);

        assert_eq!(ring.ceiling_or_wrap(101), 200);
        assert_eq!(ring.ceiling_or_wrap(i64::MIN), 100);
        assert_eq!(ring.node_index_for(250), 2);
    }

    #[test]
    fn test_ceiling_wraps_past_last_point() {
        let ring = ring_of(&[(100, 0), (200, 1), (300, 2)]);

        assert_eq!(ring.ceiling_or_wrap(301), 100);
        assert_eq!(ring.ceiling_or_wrap(i64::MAX), 100);
        assert_eq!(ring.node_index_for(301), 0);
    }

    #[test]
    #[should_panic(expected = "empty ring")]
    fn test_ceiling_on_empty_ring_panics() {
        Ring::new().ceiling_or_wrap(42);
    }

    #[test]
    fn test_empty_ring() {
        let ring = Ring::with_capacity(16);

        assert!(ring.is_empty());
        assert_eq!(ring.first_key(), None);
        assert_eq!(ring.get(0), None);
    }
}
