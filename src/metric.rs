//! The metric-object abstraction the tree indexes over.

use std::fmt::Debug;

use num_traits::Float;

/// A trait for numeric types that can carry a distance value.
///
/// Blanket-implemented for every floating point type satisfying the bounds,
/// so `f32` and `f64` work out of the box.
pub trait DistanceValue: Float + Debug + Send + Sync + 'static {}

impl<D> DistanceValue for D where D: Float + Debug + Send + Sync + 'static {}

/// A trait for objects that live in a metric space.
///
/// Hyperplane pruning is only correct when the distance is symmetric,
/// non-negative and satisfies the triangle inequality. The tree never checks
/// these laws; an implementation that breaks them silently loses query
/// results.
pub trait MetricObject {
    /// The scalar type distances are measured in.
    type Distance: DistanceValue;

    /// The distance from `self` to `other`.
    fn distance(&self, other: &Self) -> Self::Distance;
}

/// A point in n-dimensional Euclidean space.
///
/// The bundled example object, mainly useful for tests and benchmarks; real
/// deployments implement [`MetricObject`] for their own types.
#[derive(Debug, Clone, PartialEq)]
pub struct EuclideanPoint(pub Vec<f64>);

impl EuclideanPoint {
    /// Create a point from its coordinates.
    pub fn new(coords: Vec<f64>) -> Self {
        Self(coords)
    }

    /// The coordinates of this point.
    pub fn coords(&self) -> &[f64] {
        &self.0
    }
}

impl MetricObject for EuclideanPoint {
    type Distance = f64;

    fn distance(&self, other: &Self) -> f64 {
        let len = self.0.len().min(other.0.len());
        let mut sum = 0.0;
        for i in 0..len {
            let diff = self.0[i] - other.0[i];
            sum += diff * diff;
        }
        sum.sqrt()
    }
}
