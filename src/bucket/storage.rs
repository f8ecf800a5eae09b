use std::fmt;
use std::sync::Arc;

use crate::metric::MetricObject;
use crate::tree::query::{AnswerSet, NearestNeighbors};

/// Identifier of a bucket, issued by the dispatcher.
///
/// Ids increase monotonically and are never reused, so a stale id can never
/// alias a live bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketId(pub(crate) u64);

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bucket #{}", self.0)
    }
}

/// Outcome of [`Bucket::add`].
///
/// Overflow is an ordinary control-flow outcome, not an error: the tree
/// reacts to `Full` by splitting the owning leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The object was stored.
    Added,
    /// The bucket is at capacity and the object was not stored.
    Full,
}

/// A bounded in-memory container of objects, the leaf-level storage unit.
///
/// The capacity bound is a dispatcher-wide setting consulted on every add
/// rather than a per-bucket field, so tightening the setting applies to all
/// live buckets at once.
pub struct Bucket<T: MetricObject> {
    id: BucketId,
    objects: Vec<Arc<T>>,
}

impl<T: MetricObject> Bucket<T> {
    pub(crate) fn new(id: BucketId) -> Self {
        Self {
            id,
            objects: Vec::new(),
        }
    }

    /// The id the dispatcher issued for this bucket.
    pub fn id(&self) -> BucketId {
        self.id
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the bucket holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub(crate) fn objects(&self) -> &[Arc<T>] {
        &self.objects
    }

    /// Store `object` unless the bucket already holds `capacity` objects.
    pub fn add(&mut self, object: Arc<T>, capacity: usize) -> AddOutcome {
        if self.objects.len() >= capacity {
            return AddOutcome::Full;
        }
        self.objects.push(object);
        AddOutcome::Added
    }

    /// Drain this bucket into `left` and `right`: every object goes to the
    /// side whose pivot is closer, ties to the left.
    ///
    /// The two target buckets together hold exactly the objects this bucket
    /// held, in the original order within each side.
    pub fn partition(
        &mut self,
        left_pivot: &T,
        right_pivot: &T,
        left: &mut Bucket<T>,
        right: &mut Bucket<T>,
    ) {
        for object in self.objects.drain(..) {
            if object.distance(left_pivot) <= object.distance(right_pivot) {
                left.objects.push(object);
            } else {
                right.objects.push(object);
            }
        }
    }

    /// Linear scan collecting every object within `radius` of `query`.
    pub(crate) fn scan_within_radius(
        &self,
        query: &T,
        radius: T::Distance,
        answer: &mut AnswerSet<T>,
    ) {
        for object in &self.objects {
            if query.distance(object) <= radius {
                answer.collect(object);
            }
        }
    }

    /// Linear scan offering every object to the bounded best-k collector.
    ///
    /// The collector's pruning radius shrinks while the scan runs, so every
    /// candidate is checked against the tightest bound known so far.
    pub(crate) fn scan_for_knn(&self, query: &T, answer: &mut NearestNeighbors<T>) {
        for object in &self.objects {
            let distance = query.distance(object);
            answer.collect(object, distance);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::metric::EuclideanPoint;

    fn point(x: f64) -> Arc<EuclideanPoint> {
        Arc::new(EuclideanPoint::new(vec![x]))
    }

    #[test]
    fn add_signals_overflow() {
        let mut bucket: Bucket<EuclideanPoint> = Bucket::new(BucketId(0));
        assert_eq!(bucket.add(point(1.0), 2), AddOutcome::Added);
        assert_eq!(bucket.add(point(2.0), 2), AddOutcome::Added);
        assert_eq!(bucket.add(point(3.0), 2), AddOutcome::Full);
        assert_eq!(bucket.len(), 2);
    }

    #[test]
    fn partition_assigns_by_closer_pivot_ties_left() {
        let mut bucket: Bucket<EuclideanPoint> = Bucket::new(BucketId(0));
        for x in [1.0, 4.0, 5.0, 6.0, 9.0] {
            bucket.add(point(x), usize::MAX);
        }
        let left_pivot = EuclideanPoint::new(vec![0.0]);
        let right_pivot = EuclideanPoint::new(vec![10.0]);

        let mut left = Bucket::new(BucketId(1));
        let mut right = Bucket::new(BucketId(2));
        bucket.partition(&left_pivot, &right_pivot, &mut left, &mut right);

        assert!(bucket.is_empty());
        let left_xs: Vec<f64> = left.objects().iter().map(|p| p.0[0]).collect();
        let right_xs: Vec<f64> = right.objects().iter().map(|p| p.0[0]).collect();
        // 5.0 is equidistant and must go left
        assert_eq!(left_xs, vec![1.0, 4.0, 5.0]);
        assert_eq!(right_xs, vec![6.0, 9.0]);
    }
}
