//! Nearest-prototype classification.

use super::{check_query, check_support, Classifier, DistanceMetric, FittedClassifier};
use crate::error::Result;
use crate::primitives::Matrix;
use crate::sampling::Label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nearest-prototype classifier.
///
/// Fitting computes one prototype per class, the mean of that class's
/// support embeddings. Prediction assigns each query row the class of the
/// nearest prototype; equal distances resolve to the lowest label.
///
/// # Example
///
/// ```
/// use lign::classification::{Classifier, DistanceMetric, FittedClassifier, NearestPrototype};
/// use lign::primitives::Matrix;
///
/// let x = Matrix::from_vec(4, 2, vec![
///     0.0, 0.0,  // class 3
///     0.0, 2.0,  // class 3
///     8.0, 8.0,  // class 7
///     9.0, 9.0,  // class 7
/// ]).expect("4x2");
///
/// let fitted = NearestPrototype::new()
///     .with_metric(DistanceMetric::Manhattan)
///     .fit(&x, &[3, 3, 7, 7])
///     .expect("valid support");
/// assert_eq!(fitted.classes(), &[3, 7]);
/// assert_eq!(fitted.prototype(3), Some(&[0.0, 1.0][..]));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NearestPrototype {
    metric: DistanceMetric,
}

impl NearestPrototype {
    /// Euclidean nearest-prototype classifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Configured distance metric.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }
}

impl Classifier for NearestPrototype {
    type Fitted = FittedPrototypes;

    fn fit(&self, x: &Matrix<f32>, y: &[Label]) -> Result<FittedPrototypes> {
        self.metric.validate()?;
        check_support(x, y)?;
        let n_features = x.n_cols();

        let mut sums: BTreeMap<Label, (Vec<f32>, usize)> = BTreeMap::new();
        for (row, &label) in x.rows().zip(y) {
            let (sum, count) = sums
                .entry(label)
                .or_insert_with(|| (vec![0.0; n_features], 0));
            for (s, &v) in sum.iter_mut().zip(row) {
                *s += v;
            }
            *count += 1;
        }

        let mut classes = Vec::with_capacity(sums.len());
        let mut counts = Vec::with_capacity(sums.len());
        let mut data = Vec::with_capacity(sums.len() * n_features);
        for (label, (sum, count)) in sums {
            classes.push(label);
            counts.push(count);
            data.extend(sum.into_iter().map(|s| s / count as f32));
        }

        Ok(FittedPrototypes {
            prototypes: Matrix::from_vec(classes.len(), n_features, data)?,
            classes,
            counts,
            metric: self.metric,
        })
    }
}

/// Class prototypes learned by [`NearestPrototype`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPrototypes {
    /// Distinct labels, ascending; row `i` of `prototypes` belongs to `classes[i]`
    classes: Vec<Label>,
    /// Support examples behind each prototype
    counts: Vec<usize>,
    prototypes: Matrix<f32>,
    metric: DistanceMetric,
}

impl FittedPrototypes {
    /// Prototype matrix, one row per class in [`classes`](FittedClassifier::classes) order.
    #[must_use]
    pub fn prototypes(&self) -> &Matrix<f32> {
        &self.prototypes
    }

    /// Prototype of `label`, if the class was seen during fitting.
    #[must_use]
    pub fn prototype(&self, label: Label) -> Option<&[f32]> {
        self.classes
            .binary_search(&label)
            .ok()
            .map(|i| self.prototypes.row(i))
    }

    /// Number of support examples averaged into each prototype.
    #[must_use]
    pub fn support_counts(&self) -> &[usize] {
        &self.counts
    }

    /// Index of the nearest prototype; ties keep the earliest (lowest label).
    fn nearest(&self, row: &[f32]) -> usize {
        let mut best = 0;
        let mut best_dist = f32::INFINITY;
        for (i, proto) in self.prototypes.rows().enumerate() {
            let d = self.metric.distance(row, proto);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        best
    }
}

impl FittedClassifier for FittedPrototypes {
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<Label>> {
        check_query(x, self.n_features())?;
        Ok(x.rows().map(|row| self.classes[self.nearest(row)]).collect())
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.prototypes.n_cols()
    }
}
