use std::marker::PhantomData;

use crate::bucket::{BucketDispatcher, DEFAULT_BUCKET_CAPACITY};
use crate::error::Result;
use crate::metric::MetricObject;
use crate::tree::index::HyperplaneTree;
use crate::tree::node::Node;
use crate::tree::strategy::{SplitStrategy, StrategyState};

/// A builder to create a [`HyperplaneTree`].
pub struct HyperplaneTreeBuilder<T: MetricObject> {
    strategy: SplitStrategy,
    bucket_capacity: usize,
    max_buckets: usize,
    phantom: PhantomData<T>,
}

impl<T: MetricObject> HyperplaneTreeBuilder<T> {
    /// Create a builder with the provided strategy and the default bucket
    /// capacity.
    pub fn new(strategy: SplitStrategy) -> Self {
        Self::new_with_bucket_capacity(strategy, DEFAULT_BUCKET_CAPACITY)
    }

    /// Create a builder with the provided strategy and bucket capacity.
    ///
    /// A bucket must be able to hold at least two objects, otherwise a split
    /// cannot select two reference points.
    pub fn new_with_bucket_capacity(strategy: SplitStrategy, bucket_capacity: usize) -> Self {
        assert!(bucket_capacity >= 2);
        Self {
            strategy,
            bucket_capacity,
            max_buckets: usize::MAX,
            phantom: PhantomData,
        }
    }

    /// Cap the number of buckets the dispatcher may allocate. Once the quota
    /// is reached, inserts that need a split fail with
    /// [`GhtError::StorageExhausted`][crate::GhtError::StorageExhausted].
    pub fn max_buckets(mut self, max_buckets: usize) -> Self {
        self.max_buckets = max_buckets;
        self
    }

    /// Consume this builder, producing an empty tree: a single leaf wrapping
    /// a fresh bucket.
    pub fn finish(self) -> Result<HyperplaneTree<T>> {
        let mut dispatcher = BucketDispatcher::new(self.bucket_capacity, self.max_buckets);
        let root_bucket = dispatcher.create_bucket()?;
        let root = Node::leaf(root_bucket, StrategyState::root(self.strategy));
        Ok(HyperplaneTree {
            root,
            dispatcher,
            strategy: self.strategy,
            bucket_capacity: self.bucket_capacity,
        })
    }
}
