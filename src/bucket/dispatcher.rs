use std::marker::PhantomData;

use crate::bucket::pivot::PivotSource;
use crate::bucket::storage::{Bucket, BucketId};
use crate::error::{GhtError, Result};
use crate::metric::MetricObject;

/// Per-bucket object capacity of a freshly configured dispatcher.
pub const DEFAULT_BUCKET_CAPACITY: usize = 64;

/// Allocator and bookkeeper for every bucket of one tree.
///
/// Bucket values are owned by the leaves that use them; the dispatcher issues
/// never-reused ids, enforces the allocation quota, owns the capacity setting
/// consulted on every add, and keeps the live-bucket and stored-object
/// counts. Every bucket a tree uses must come from, and go back to, the same
/// dispatcher the tree was built with.
pub struct BucketDispatcher<T: MetricObject> {
    capacity: usize,
    max_buckets: usize,
    next_id: u64,
    live_buckets: usize,
    stored_objects: usize,
    phantom: PhantomData<T>,
}

impl<T: MetricObject> BucketDispatcher<T> {
    /// Create a dispatcher with the given per-bucket capacity and bucket
    /// quota.
    pub fn new(capacity: usize, max_buckets: usize) -> Self {
        Self {
            capacity,
            max_buckets,
            next_id: 0,
            live_buckets: 0,
            stored_objects: 0,
            phantom: PhantomData,
        }
    }

    /// Allocate a fresh, empty bucket under the current quota.
    pub fn create_bucket(&mut self) -> Result<Bucket<T>> {
        if self.live_buckets >= self.max_buckets {
            return Err(GhtError::StorageExhausted(format!(
                "bucket quota of {} reached",
                self.max_buckets
            )));
        }
        let id = BucketId(self.next_id);
        self.next_id += 1;
        self.live_buckets += 1;
        Ok(Bucket::new(id))
    }

    /// Return a bucket to the dispatcher, ending its lifetime. Its id is
    /// retired and will not be issued again.
    pub fn release_bucket(&mut self, bucket: Bucket<T>) {
        self.stored_objects -= bucket.len();
        self.live_buckets -= 1;
    }

    /// A pivot source scoped to `bucket`'s current objects.
    pub fn pivot_source<'a>(&self, bucket: &'a Bucket<T>) -> PivotSource<'a, T> {
        PivotSource::new(bucket.objects())
    }

    /// The capacity every bucket is currently held to.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replace the capacity setting; applies to every add from here on.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Number of live buckets.
    pub fn bucket_count(&self) -> usize {
        self.live_buckets
    }

    /// Number of objects stored across all live buckets.
    pub fn total_object_count(&self) -> usize {
        self.stored_objects
    }

    pub(crate) fn record_insertion(&mut self) {
        self.stored_objects += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::metric::EuclideanPoint;
    use crate::GhtError;

    #[test]
    fn quota_is_enforced() {
        let mut dispatcher: BucketDispatcher<EuclideanPoint> = BucketDispatcher::new(8, 2);
        let a = dispatcher.create_bucket().unwrap();
        let _b = dispatcher.create_bucket().unwrap();
        assert!(matches!(
            dispatcher.create_bucket(),
            Err(GhtError::StorageExhausted(_))
        ));

        // releasing frees a slot
        dispatcher.release_bucket(a);
        assert!(dispatcher.create_bucket().is_ok());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut dispatcher: BucketDispatcher<EuclideanPoint> = BucketDispatcher::new(8, usize::MAX);
        let a = dispatcher.create_bucket().unwrap();
        let a_id = a.id();
        dispatcher.release_bucket(a);
        let b = dispatcher.create_bucket().unwrap();
        assert!(b.id() > a_id);
    }

    #[test]
    fn capacity_setting_is_global() {
        let mut dispatcher: BucketDispatcher<EuclideanPoint> = BucketDispatcher::new(8, usize::MAX);
        assert_eq!(dispatcher.capacity(), 8);
        dispatcher.set_capacity(4);
        assert_eq!(dispatcher.capacity(), 4);
    }
}
