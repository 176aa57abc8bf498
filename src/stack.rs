use std::fmt;
use std::slice;

use crate::vertex::FieldVertex;

/// One accepted candidate: a vertex borrowed from the tree and its distance
/// to the query point.
pub type Neighbor<'t, F> = (&'t FieldVertex<F>, f64);

/// Fixed-capacity list of the best candidates seen so far, kept sorted
/// ascending by distance, with at most one entry per distinct sample point.
///
/// A query creates one stack, offers every candidate it encounters through
/// [`examine`](NeighborStack::examine) and hands the stack back to the
/// caller, who owns it from then on.
pub struct NeighborStack<'t, F> {
    entries: Vec<Neighbor<'t, F>>,
    capacity: usize,
    examined: usize,
}

impl<'t, F> NeighborStack<'t, F> {
    pub fn new(capacity: usize) -> NeighborStack<'t, F> {
        NeighborStack {
            entries: Vec::with_capacity(capacity),
            capacity,
            examined: 0,
        }
    }

    /// Offer a candidate, keeping the stack sorted and bounded. Returns
    /// whether the candidate was retained.
    ///
    /// A vertex whose point is already present is rejected: the search can
    /// reach the same sample along several traversal paths. When an
    /// insertion pushes the stack over capacity the farthest entry is
    /// dropped; a candidate no closer than every retained entry is rejected
    /// once the stack is full.
    pub fn examine(&mut self, vertex: &'t FieldVertex<F>, distance: f64) -> bool {
        self.examined += 1;
        if self.entries.is_empty() {
            self.entries.push((vertex, distance));
            return true;
        }
        for i in 0..self.entries.len() {
            if self.entries[i].0.point == vertex.point {
                return false;
            }
            if distance < self.entries[i].1 {
                self.entries.insert(i, (vertex, distance));
                if self.entries.len() > self.capacity {
                    self.entries.pop();
                }
                return true;
            }
        }
        if self.entries.len() < self.capacity {
            self.entries.push((vertex, distance));
            return true;
        }
        false
    }

    /// The closest accepted candidate.
    pub fn front(&self) -> Option<&Neighbor<'t, F>> {
        self.entries.first()
    }

    /// The farthest accepted candidate.
    pub fn back(&self) -> Option<&Neighbor<'t, F>> {
        self.entries.last()
    }

    /// Distance of the farthest accepted candidate. This is the search
    /// radius the backtracking phase prunes against: improving any of the
    /// retained slots means beating this distance.
    pub fn farthest_distance(&self) -> Option<f64> {
        self.entries.last().map(|&(_, distance)| distance)
    }

    pub fn iter(&self) -> slice::Iter<'_, Neighbor<'t, F>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of candidates offered over the stack's lifetime, accepted or
    /// not. With one stack per query this measures how much of the tree the
    /// search touched.
    pub fn examined(&self) -> usize {
        self.examined
    }
}

/// Sequence comparison: same length, pairwise equal points and distances.
/// Capacity and the examined count are not part of the comparison, so a
/// tree search result can be checked against a linear-scan result directly.
impl<F> PartialEq for NeighborStack<'_, F> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.0.point == b.0.point && a.1 == b.1)
    }
}

impl<F> fmt::Debug for NeighborStack<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|&(vertex, distance)| (vertex.point, distance)))
            .finish()
    }
}
