use std::sync::Arc;

use crate::bucket::PivotSource;
use crate::error::{GhtError, Result};
use crate::metric::MetricObject;

/// Reference-point-selection strategy, fixed when the tree is built.
///
/// The strategy is the only polymorphic axis of the tree: it decides how an
/// overflowing leaf picks its two reference points and what node-local state
/// its children carry forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Draw two arbitrary pivots from the source, independently, on every
    /// split.
    Generic,
    /// Pivot indices are a function of the node's depth `d`: the reference
    /// points sit at indices `2d` and `2d + 1`.
    Leanest,
    /// The left reference point is inherited unchanged from the parent
    /// (freshly drawn only at the root); the right one is drawn on every
    /// split, after which the source cursor is rewound.
    Monotonous,
    /// Two integer cursors enumerate pivot-index pairs round-robin, so
    /// deeper splits keep using new pairs until the enumeration is
    /// exhausted and the pivot range grows.
    Permutation,
}

/// The node-local state a strategy carries across splits.
///
/// Child state is derived explicitly in [`StrategyState::child_states`]
/// rather than copied implicitly, which keeps the provenance of inherited
/// reference points and cursor values auditable.
pub(crate) enum StrategyState<T: MetricObject> {
    Generic,
    Leanest {
        depth: usize,
    },
    Monotonous {
        inherited: Option<Arc<T>>,
    },
    Permutation {
        permutation_index: usize,
        last_pivot_index: usize,
    },
}

impl<T: MetricObject> StrategyState<T> {
    /// The state of a root node under `strategy`.
    pub(crate) fn root(strategy: SplitStrategy) -> Self {
        match strategy {
            SplitStrategy::Generic => Self::Generic,
            SplitStrategy::Leanest => Self::Leanest { depth: 0 },
            SplitStrategy::Monotonous => Self::Monotonous { inherited: None },
            SplitStrategy::Permutation => Self::Permutation {
                permutation_index: 0,
                last_pivot_index: 1,
            },
        }
    }

    /// Choose the two reference points for a split of the owning node.
    ///
    /// Cursor-style state is adjusted in place, so a later
    /// [`child_states`][StrategyState::child_states] call sees the values
    /// that were actually used.
    pub(crate) fn select_reference_points(
        &mut self,
        source: &mut PivotSource<'_, T>,
    ) -> Result<(Arc<T>, Arc<T>)> {
        match self {
            Self::Generic => {
                let left = source.next_pivot()?;
                let right = source.next_pivot()?;
                Ok((left, right))
            }
            Self::Leanest { depth } => {
                let left = source.pivot_at(2 * *depth)?;
                let right = source.pivot_at(2 * *depth + 1)?;
                Ok((left, right))
            }
            Self::Monotonous { inherited } => {
                let left = match inherited {
                    Some(pivot) => Arc::clone(pivot),
                    None => source.next_pivot()?,
                };
                // the inherited point lives in this bucket too; drawing the
                // same allocation again would make the reference points
                // coincide and the partition one-sided
                let mut right = source.next_pivot()?;
                if Arc::ptr_eq(&left, &right) {
                    right = source.next_pivot()?;
                }
                source.reset();
                Ok((left, right))
            }
            Self::Permutation {
                permutation_index,
                last_pivot_index,
            } => {
                if *permutation_index >= *last_pivot_index {
                    *permutation_index -= *last_pivot_index;
                    *last_pivot_index += 1;
                }
                if *permutation_index >= *last_pivot_index {
                    return Err(GhtError::MalformedStrategyState(format!(
                        "permutation cursors out of order after adjustment: ({}, {})",
                        permutation_index, last_pivot_index
                    )));
                }
                let left = source.pivot_at(*last_pivot_index)?;
                let right = source.pivot_at(*permutation_index)?;
                Ok((left, right))
            }
        }
    }

    /// The states the two children of a freshly split node start with.
    pub(crate) fn child_states(&self, left_pivot: &Arc<T>, right_pivot: &Arc<T>) -> (Self, Self) {
        match self {
            Self::Generic => (Self::Generic, Self::Generic),
            Self::Leanest { depth } => (
                Self::Leanest { depth: depth + 1 },
                Self::Leanest { depth: depth + 1 },
            ),
            Self::Monotonous { .. } => (
                Self::Monotonous {
                    inherited: Some(Arc::clone(left_pivot)),
                },
                Self::Monotonous {
                    inherited: Some(Arc::clone(right_pivot)),
                },
            ),
            Self::Permutation {
                permutation_index,
                last_pivot_index,
            } => (
                Self::Permutation {
                    permutation_index: permutation_index + 1,
                    last_pivot_index: *last_pivot_index,
                },
                Self::Permutation {
                    permutation_index: permutation_index + 2,
                    last_pivot_index: *last_pivot_index,
                },
            ),
        }
    }

    #[cfg(test)]
    pub(crate) fn permutation_cursors(&self) -> Option<(usize, usize)> {
        match self {
            Self::Permutation {
                permutation_index,
                last_pivot_index,
            } => Some((*permutation_index, *last_pivot_index)),
            _ => None,
        }
    }
}
