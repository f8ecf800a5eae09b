use std::sync::Arc;

use crate::bucket::{AddOutcome, Bucket, BucketDispatcher};
use crate::error::Result;
use crate::metric::MetricObject;
use crate::tree::query::{AnswerSet, NearestNeighbors};
use crate::tree::strategy::StrategyState;

/// A node of the hyperplane tree.
///
/// A node is exactly one of: a leaf owning a bucket, or an inner node owning
/// two reference points and two children. The enum makes the exclusivity
/// invariant structural; the only transition is leaf to inner, at split time,
/// and it never reverses.
pub(crate) struct Node<T: MetricObject> {
    strategy: StrategyState<T>,
    state: NodeState<T>,
}

enum NodeState<T: MetricObject> {
    Leaf {
        bucket: Bucket<T>,
    },
    Inner {
        left_pivot: Arc<T>,
        right_pivot: Arc<T>,
        left: Box<Node<T>>,
        right: Box<Node<T>>,
    },
}

impl<T: MetricObject> Node<T> {
    /// A fresh leaf wrapping `bucket`.
    pub(crate) fn leaf(bucket: Bucket<T>, strategy: StrategyState<T>) -> Self {
        Self {
            strategy,
            state: NodeState::Leaf { bucket },
        }
    }

    /// Insert `object` into the subtree rooted at this node.
    pub(crate) fn insert(
        &mut self,
        object: Arc<T>,
        dispatcher: &mut BucketDispatcher<T>,
    ) -> Result<()> {
        if let NodeState::Leaf { bucket } = &mut self.state {
            match bucket.add(Arc::clone(&object), dispatcher.capacity()) {
                AddOutcome::Added => return Ok(()),
                AddOutcome::Full => self.split(dispatcher)?,
            }
        }
        // the node is inner here: either it already was, or the full leaf
        // was just split
        let NodeState::Inner {
            left_pivot,
            right_pivot,
            left,
            right,
        } = &mut self.state
        else {
            unreachable!("a split leaf becomes an inner node");
        };
        if object.distance(left_pivot) <= object.distance(right_pivot) {
            left.insert(object, dispatcher)
        } else {
            right.insert(object, dispatcher)
        }
    }

    /// Turn this full leaf into an inner node with two leaf children.
    ///
    /// The replacement buckets are allocated up front, so an allocation
    /// failure surfaces before the node, the strategy state or the
    /// dispatcher counts are touched, and callers never observe a partially
    /// split node.
    fn split(&mut self, dispatcher: &mut BucketDispatcher<T>) -> Result<()> {
        let mut left_bucket = dispatcher.create_bucket()?;
        let mut right_bucket = match dispatcher.create_bucket() {
            Ok(bucket) => bucket,
            Err(err) => {
                dispatcher.release_bucket(left_bucket);
                return Err(err);
            }
        };

        let NodeState::Leaf { bucket } = &mut self.state else {
            unreachable!("only a full leaf splits");
        };

        // pick the reference points from the bucket about to dissolve
        let selection = {
            let mut source = dispatcher.pivot_source(bucket);
            self.strategy.select_reference_points(&mut source)
        };
        let (left_pivot, right_pivot) = match selection {
            Ok(pivots) => pivots,
            Err(err) => {
                dispatcher.release_bucket(left_bucket);
                dispatcher.release_bucket(right_bucket);
                return Err(err);
            }
        };

        // closer pivot wins, ties go left
        bucket.partition(&left_pivot, &right_pivot, &mut left_bucket, &mut right_bucket);

        let (left_state, right_state) = self.strategy.child_states(&left_pivot, &right_pivot);
        let children = NodeState::Inner {
            left: Box::new(Node::leaf(left_bucket, left_state)),
            right: Box::new(Node::leaf(right_bucket, right_state)),
            left_pivot,
            right_pivot,
        };

        match std::mem::replace(&mut self.state, children) {
            // the drained bucket goes back to the dispatcher
            NodeState::Leaf { bucket } => dispatcher.release_bucket(bucket),
            NodeState::Inner { .. } => unreachable!("only a full leaf splits"),
        }
        Ok(())
    }

    /// Range search: leaves scan their bucket, inner nodes apply pivot
    /// inclusion and the generalized-hyperplane exclusion rule.
    pub(crate) fn range_search(
        &self,
        query: &T,
        radius: T::Distance,
        answer: &mut AnswerSet<T>,
    ) {
        match &self.state {
            NodeState::Leaf { bucket } => bucket.scan_within_radius(query, radius, answer),
            NodeState::Inner {
                left_pivot,
                right_pivot,
                left,
                right,
            } => {
                let left_distance = query.distance(left_pivot);
                let right_distance = query.distance(right_pivot);

                // pivot inclusion
                if left_distance <= radius {
                    answer.collect(left_pivot);
                }
                if right_distance <= radius {
                    answer.collect(right_pivot);
                }
                // hyperplane exclusion: skip a child only when the query
                // ball provably lies entirely on the other side; both
                // descents firing is the common case
                if left_distance - radius <= right_distance + radius {
                    left.range_search(query, radius, answer);
                }
                if left_distance + radius >= right_distance - radius {
                    right.range_search(query, radius, answer);
                }
            }
        }
    }

    /// Nearest-neighbor search: the same traversal as range search, with the
    /// collector's current k-th best distance as the pruning radius.
    pub(crate) fn nearest_neighbor_search(&self, query: &T, answer: &mut NearestNeighbors<T>) {
        match &self.state {
            NodeState::Leaf { bucket } => bucket.scan_for_knn(query, answer),
            NodeState::Inner {
                left_pivot,
                right_pivot,
                left,
                right,
            } => {
                let left_distance = query.distance(left_pivot);
                let right_distance = query.distance(right_pivot);
                let radius = answer.pruning_radius();

                if left_distance <= radius {
                    answer.collect(left_pivot, left_distance);
                }
                if right_distance <= radius {
                    answer.collect(right_pivot, right_distance);
                }
                if left_distance - radius <= right_distance + radius {
                    left.nearest_neighbor_search(query, answer);
                }
                if left_distance + radius >= right_distance - radius {
                    right.nearest_neighbor_search(query, answer);
                }
            }
        }
    }

    /// Retrofit a tighter bucket capacity onto this subtree: repeatedly
    /// halve the dispatcher capacity (clamped to `desired`), splitting
    /// whenever the leaf overflows the tightened bound.
    pub(crate) fn propagate_bucket_capacity(
        &mut self,
        dispatcher: &mut BucketDispatcher<T>,
        desired: usize,
    ) -> Result<()> {
        let current = dispatcher.capacity();
        self.shrink_bucket_capacity(dispatcher, desired, current)
    }

    // `current` is threaded explicitly: both subtrees must walk the same
    // halving schedule even though the dispatcher setting is global, and the
    // left recursion lowers that setting before the right one runs
    fn shrink_bucket_capacity(
        &mut self,
        dispatcher: &mut BucketDispatcher<T>,
        desired: usize,
        mut current: usize,
    ) -> Result<()> {
        loop {
            if current > desired {
                current = (current / 2).max(desired);
                dispatcher.set_capacity(current);
            }
            if let NodeState::Leaf { bucket } = &self.state {
                let before = bucket.len();
                if before <= current {
                    if current == desired {
                        return Ok(());
                    }
                    // fits so far; keep halving
                    continue;
                }
                self.split(dispatcher)?;
                if self.split_made_no_progress(before) {
                    // the selected pivots coincide; no further split can
                    // separate these objects
                    return Ok(());
                }
            }
            let NodeState::Inner { left, right, .. } = &mut self.state else {
                unreachable!("an overfull leaf was just split");
            };
            left.shrink_bucket_capacity(dispatcher, desired, current)?;
            return right.shrink_bucket_capacity(dispatcher, desired, current);
        }
    }

    fn split_made_no_progress(&self, before: usize) -> bool {
        let unsplit = |node: &Node<T>| match &node.state {
            NodeState::Leaf { bucket } => bucket.len() == before,
            NodeState::Inner { .. } => false,
        };
        match &self.state {
            NodeState::Inner { left, right, .. } => unsplit(left) || unsplit(right),
            NodeState::Leaf { .. } => false,
        }
    }
}

#[cfg(test)]
impl<T: MetricObject> Node<T> {
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.state, NodeState::Leaf { .. })
    }

    pub(crate) fn children(&self) -> Option<(&Node<T>, &Node<T>)> {
        match &self.state {
            NodeState::Inner { left, right, .. } => Some((left, right)),
            NodeState::Leaf { .. } => None,
        }
    }

    pub(crate) fn pivots(&self) -> Option<(&Arc<T>, &Arc<T>)> {
        match &self.state {
            NodeState::Inner {
                left_pivot,
                right_pivot,
                ..
            } => Some((left_pivot, right_pivot)),
            NodeState::Leaf { .. } => None,
        }
    }

    pub(crate) fn monotonous_inherited(&self) -> Option<&Arc<T>> {
        match &self.strategy {
            StrategyState::Monotonous { inherited } => inherited.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn leaf_sizes(&self, sizes: &mut Vec<usize>) {
        match &self.state {
            NodeState::Leaf { bucket } => sizes.push(bucket.len()),
            NodeState::Inner { left, right, .. } => {
                left.leaf_sizes(sizes);
                right.leaf_sizes(sizes);
            }
        }
    }
}
