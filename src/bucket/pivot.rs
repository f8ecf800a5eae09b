use std::sync::Arc;

use crate::error::{GhtError, Result};
use crate::metric::MetricObject;

/// A source of reference points scoped to one bucket's objects.
///
/// [`next_pivot`][PivotSource::next_pivot] enumerates the objects in bucket
/// order; [`pivot_at`][PivotSource::pivot_at] is stable, repeatable indexed
/// access. Indices wrap around the end of the source so that depth-derived
/// indices stay valid deep in the tree.
pub struct PivotSource<'a, T: MetricObject> {
    objects: &'a [Arc<T>],
    cursor: usize,
}

impl<'a, T: MetricObject> PivotSource<'a, T> {
    pub(crate) fn new(objects: &'a [Arc<T>]) -> Self {
        Self { objects, cursor: 0 }
    }

    /// Number of distinct pivots on offer.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the source has no pivots at all.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Draw the next pivot in source order.
    pub fn next_pivot(&mut self) -> Result<Arc<T>> {
        let pivot = self.pivot_at(self.cursor)?;
        self.cursor += 1;
        Ok(pivot)
    }

    /// The pivot at `index`, wrapping around the end of the source.
    pub fn pivot_at(&self, index: usize) -> Result<Arc<T>> {
        if self.objects.is_empty() {
            return Err(GhtError::MalformedStrategyState(
                "pivot requested from an empty bucket".to_string(),
            ));
        }
        Ok(Arc::clone(&self.objects[index % self.objects.len()]))
    }

    /// Rewind [`next_pivot`][PivotSource::next_pivot] to the start of the
    /// source.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
