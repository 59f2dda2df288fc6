//! K-nearest-neighbors classification over support embeddings.

use super::{check_query, check_support, Classifier, DistanceMetric, FittedClassifier};
use crate::error::{LignError, Result};
use crate::primitives::Matrix;
use crate::sampling::Label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// K-Nearest Neighbors classifier.
///
/// Instance-based: fitting stores the support embeddings, prediction votes
/// among the `k` closest support rows. With few-shot support sets `k` may
/// exceed the number of examples; it is clamped to the support size.
/// Vote ties resolve to the lowest label.
///
/// # Example
///
/// ```
/// use lign::classification::{Classifier, FittedClassifier, KNearestNeighbors};
/// use lign::primitives::Matrix;
///
/// let x = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0,  // class 0
///     0.0, 1.0,  // class 0
///     1.0, 0.0,  // class 0
///     5.0, 5.0,  // class 1
///     5.0, 6.0,  // class 1
///     6.0, 5.0,  // class 1
/// ]).expect("6x2 matrix with 12 values");
///
/// let knn = KNearestNeighbors::new(3).fit(&x, &[0, 0, 0, 1, 1, 1]).expect("valid support");
///
/// let test = Matrix::from_vec(1, 2, vec![0.5, 0.5]).expect("1x2 test matrix");
/// assert_eq!(knn.predict(&test).expect("same dimension"), vec![0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KNearestNeighbors {
    /// Number of neighbors to use
    k: usize,
    metric: DistanceMetric,
    /// Whether to use weighted voting (inverse distance)
    weights: bool,
}

impl KNearestNeighbors {
    /// Creates a kNN classifier voting among `k` neighbors.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            metric: DistanceMetric::Euclidean,
            weights: false,
        }
    }

    /// Sets the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Enables weighted voting (inverse distance weighting).
    #[must_use]
    pub fn with_weights(mut self, weights: bool) -> Self {
        self.weights = weights;
        self
    }
}

impl Default for KNearestNeighbors {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Classifier for KNearestNeighbors {
    type Fitted = FittedKnn;

    fn fit(&self, x: &Matrix<f32>, y: &[Label]) -> Result<FittedKnn> {
        if self.k == 0 {
            return Err(LignError::invalid("k", 0, "k >= 1"));
        }
        self.metric.validate()?;
        check_support(x, y)?;

        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        Ok(FittedKnn {
            k: self.k.min(x.n_rows()),
            metric: self.metric,
            weights: self.weights,
            x_train: x.clone(),
            y_train: y.to_vec(),
            classes,
        })
    }
}

/// Support rows stored by [`KNearestNeighbors`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedKnn {
    /// Effective neighbor count (clamped to the support size)
    k: usize,
    metric: DistanceMetric,
    weights: bool,
    x_train: Matrix<f32>,
    y_train: Vec<Label>,
    classes: Vec<Label>,
}

impl FittedKnn {
    /// Effective number of neighbors.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    fn vote(&self, row: &[f32]) -> Label {
        let mut distances: Vec<(f32, Label)> = self
            .x_train
            .rows()
            .zip(&self.y_train)
            .map(|(train, &label)| (self.metric.distance(row, train), label))
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut tally: BTreeMap<Label, f32> = BTreeMap::new();
        for &(dist, label) in &distances[..self.k] {
            // An exact match outweighs any finite inverse distance.
            let weight = if self.weights { 1.0 / dist.max(1e-10) } else { 1.0 };
            *tally.entry(label).or_insert(0.0) += weight;
        }

        // Ascending label order with a strict comparison keeps the lowest label on ties.
        let mut best = (self.classes[0], f32::NEG_INFINITY);
        for (label, score) in tally {
            if score > best.1 {
                best = (label, score);
            }
        }
        best.0
    }
}

impl FittedClassifier for FittedKnn {
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<Label>> {
        check_query(x, self.n_features())?;
        Ok(x.rows().map(|row| self.vote(row)).collect())
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.x_train.n_cols()
    }
}
