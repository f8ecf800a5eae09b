//! Answer collectors for range and nearest-neighbor queries.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;

use num_traits::Float;

use crate::metric::MetricObject;

/// Collector for range-search answers.
///
/// Objects are deduplicated by `Arc` identity: a reference point reported via
/// pivot inclusion is the same allocation as its copy inside some bucket, so
/// an infinite-radius search returns every inserted object exactly once.
pub(crate) struct AnswerSet<T: MetricObject> {
    seen: HashSet<usize>,
    objects: Vec<Arc<T>>,
}

impl<T: MetricObject> AnswerSet<T> {
    pub(crate) fn new() -> Self {
        Self {
            seen: HashSet::new(),
            objects: Vec::new(),
        }
    }

    /// Record a match. The caller has already checked the radius.
    pub(crate) fn collect(&mut self, object: &Arc<T>) {
        if self.seen.insert(Arc::as_ptr(object) as usize) {
            self.objects.push(Arc::clone(object));
        }
    }

    pub(crate) fn into_objects(self) -> Vec<Arc<T>> {
        self.objects
    }
}

/// A neighbor candidate ordered by distance.
struct Neighbor<T: MetricObject> {
    distance: T::Distance,
    object: Arc<T>,
}

impl<T: MetricObject> PartialEq for Neighbor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl<T: MetricObject> Eq for Neighbor<T> {}

impl<T: MetricObject> PartialOrd for Neighbor<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: MetricObject> Ord for Neighbor<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // We don't allow NaN distances. This should only panic on NaN.
        self.distance.partial_cmp(&other.distance).unwrap()
    }
}

/// Bounded best-k collector for nearest-neighbor search.
///
/// A max-heap of at most `k` candidates; the heap top is the current k-th
/// best distance and doubles as the dynamic pruning radius, which shrinks
/// monotonically as better candidates arrive.
pub(crate) struct NearestNeighbors<T: MetricObject> {
    k: usize,
    seen: HashSet<usize>,
    heap: BinaryHeap<Neighbor<T>>,
}

impl<T: MetricObject> NearestNeighbors<T> {
    pub(crate) fn new(k: usize) -> Self {
        Self {
            k,
            seen: HashSet::new(),
            heap: BinaryHeap::new(),
        }
    }

    /// The current pruning radius: the k-th best distance so far, infinite
    /// while fewer than `k` candidates are known.
    pub(crate) fn pruning_radius(&self) -> T::Distance {
        if self.heap.len() < self.k {
            return T::Distance::infinity();
        }
        self.heap
            .peek()
            .map(|neighbor| neighbor.distance)
            .unwrap_or_else(T::Distance::infinity)
    }

    /// Offer a candidate; it is kept if it is within the current pruning
    /// radius and was not collected before (by `Arc` identity).
    pub(crate) fn collect(&mut self, object: &Arc<T>, distance: T::Distance) {
        if distance > self.pruning_radius() {
            return;
        }
        if !self.seen.insert(Arc::as_ptr(object) as usize) {
            return;
        }
        self.heap.push(Neighbor {
            distance,
            object: Arc::clone(object),
        });
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    /// The collected neighbors, ascending by distance, at most `k` entries.
    pub(crate) fn into_sorted(self) -> Vec<(Arc<T>, T::Distance)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|neighbor| (neighbor.object, neighbor.distance))
            .collect()
    }
}
