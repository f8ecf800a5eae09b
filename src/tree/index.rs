use std::sync::Arc;

use num_traits::{Float, Zero};

use crate::bucket::BucketDispatcher;
use crate::error::{GhtError, Result};
use crate::metric::MetricObject;
use crate::tree::node::Node;
use crate::tree::query::{AnswerSet, NearestNeighbors};
use crate::tree::strategy::SplitStrategy;

/// A Generalized Hyperplane Tree over objects of type `T`.
///
/// Objects live in shared [`Arc`]s: the same allocation backs the copy in a
/// leaf bucket and, once chosen, its role as a reference point, and is what
/// query answers hand back.
///
/// ```
/// use ght_index::metric::EuclideanPoint;
/// use ght_index::tree::{HyperplaneTreeBuilder, SplitStrategy};
///
/// let mut tree = HyperplaneTreeBuilder::new_with_bucket_capacity(SplitStrategy::Generic, 2)
///     .finish()
///     .unwrap();
/// tree.insert(EuclideanPoint::new(vec![0.0, 0.0])).unwrap();
/// tree.insert(EuclideanPoint::new(vec![3.0, 4.0])).unwrap();
///
/// let query = EuclideanPoint::new(vec![0.0, 0.0]);
/// let hits = tree.range_search(&query, 1.0).unwrap();
/// assert_eq!(hits.len(), 1);
///
/// let neighbors = tree.nearest_neighbor_search(&query, 1).unwrap();
/// assert_eq!(neighbors[0].1, 0.0);
/// ```
pub struct HyperplaneTree<T: MetricObject> {
    pub(crate) root: Node<T>,
    pub(crate) dispatcher: BucketDispatcher<T>,
    pub(crate) strategy: SplitStrategy,
    pub(crate) bucket_capacity: usize,
}

impl<T: MetricObject> HyperplaneTree<T> {
    /// Insert an object.
    pub fn insert(&mut self, object: T) -> Result<()> {
        self.root.insert(Arc::new(object), &mut self.dispatcher)?;
        self.dispatcher.record_insertion();
        Ok(())
    }

    /// Insert a batch of objects.
    ///
    /// On an empty tree this is a bulk construction: the whole batch is
    /// staged into the root bucket and the configured bucket capacity is
    /// then retrofitted top-down through forced splits. On a non-empty tree
    /// it inserts one by one.
    pub fn bulk_insert(&mut self, objects: Vec<T>) -> Result<()> {
        if !self.is_empty() || objects.len() <= self.bucket_capacity {
            for object in objects {
                self.insert(object)?;
            }
            return Ok(());
        }

        let desired = self.bucket_capacity;
        self.dispatcher.set_capacity(objects.len());
        for object in objects {
            self.insert(object)?;
        }
        self.root
            .propagate_bucket_capacity(&mut self.dispatcher, desired)
    }

    /// All objects within `radius` of `query`, in no particular order.
    ///
    /// An infinite radius returns every object exactly once.
    pub fn range_search(&self, query: &T, radius: T::Distance) -> Result<Vec<Arc<T>>> {
        if radius.is_nan() || radius < T::Distance::zero() {
            return Err(GhtError::InvalidQuery(
                "range radius must be non-negative".to_string(),
            ));
        }
        let mut answer = AnswerSet::new();
        self.root.range_search(query, radius, &mut answer);
        Ok(answer.into_objects())
    }

    /// The `k` objects nearest to `query`, ascending by distance, paired
    /// with their distances. Fewer than `k` entries come back when the tree
    /// holds fewer objects.
    pub fn nearest_neighbor_search(
        &self,
        query: &T,
        k: usize,
    ) -> Result<Vec<(Arc<T>, T::Distance)>> {
        if k == 0 {
            return Err(GhtError::InvalidQuery("k must be positive".to_string()));
        }
        let mut answer = NearestNeighbors::new(k);
        self.root.nearest_neighbor_search(query, &mut answer);
        Ok(answer.into_sorted())
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.dispatcher.total_object_count()
    }

    /// Whether the tree holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The reference-point-selection strategy this tree was built with.
    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    /// Number of live buckets backing the leaves.
    pub fn bucket_count(&self) -> usize {
        self.dispatcher.bucket_count()
    }

    /// The capacity buckets are currently held to.
    pub fn bucket_capacity(&self) -> usize {
        self.dispatcher.capacity()
    }

    #[cfg(test)]
    pub(crate) fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        self.root.leaf_sizes(&mut sizes);
        sizes
    }
}
