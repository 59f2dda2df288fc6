//! Few-shot classifiers over embedding rows.
//!
//! A classifier is split in two stages:
//!
//! - a [`Classifier`] is immutable configuration (distance metric, k, ...);
//! - [`Classifier::fit`] returns a separate [`FittedClassifier`] value holding
//!   the reference structure learned from the support set.
//!
//! Because fitting never mutates the configuration, one classifier can be
//! shared by repeated or concurrent evaluations without stale state leaking
//! from one call into the next.
//!
//! Implementations:
//! - [`NearestPrototype`] - nearest class mean (the default)
//! - [`KNearestNeighbors`] - majority vote among the k nearest support rows
//!
//! # Example
//!
//! ```
//! use lign::classification::{Classifier, FittedClassifier, NearestPrototype};
//! use lign::primitives::Matrix;
//!
//! let support = Matrix::from_vec(2, 2, vec![0.0, 0.0, 10.0, 10.0]).expect("2x2");
//! let fitted = NearestPrototype::new().fit(&support, &[0, 1]).expect("valid support");
//!
//! let query = Matrix::from_vec(1, 2, vec![1.0, 1.0]).expect("1x2");
//! assert_eq!(fitted.predict(&query).expect("same dimension"), vec![0]);
//! ```

mod knn;
mod prototype;

pub use knn::{FittedKnn, KNearestNeighbors};
pub use prototype::{FittedPrototypes, NearestPrototype};

use crate::error::{LignError, Result};
use crate::primitives::Matrix;
use crate::sampling::Label;
use serde::{Deserialize, Serialize};

/// Classifier configuration; fitting produces a separate fitted model.
pub trait Classifier {
    /// Model produced by [`fit`](Self::fit).
    type Fitted: FittedClassifier;

    /// Fits on support embeddings `x` (one row per example) and labels `y`.
    ///
    /// Classes with a single support example are valid.
    ///
    /// # Errors
    ///
    /// - [`LignError::InvalidArgument`] for an empty support set
    /// - [`LignError::ShapeMismatch`] if `y.len() != x.n_rows()`
    fn fit(&self, x: &Matrix<f32>, y: &[Label]) -> Result<Self::Fitted>;
}

/// A classifier fitted on a support set.
pub trait FittedClassifier {
    /// Predicts one label per row of `x`, in row order.
    ///
    /// Every prediction is one of [`classes`](Self::classes).
    ///
    /// # Errors
    ///
    /// Returns [`LignError::ShapeMismatch`] if `x` has a different number of
    /// columns than the support embeddings.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<Label>>;

    /// Labels seen during fitting, ascending.
    fn classes(&self) -> &[Label];

    /// Embedding dimension seen during fitting.
    fn n_features(&self) -> usize;
}

/// Distance metric between embedding rows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean distance: `sqrt(sum((x_i - y_i)^2))`
    #[default]
    Euclidean,
    /// Manhattan distance: `sum(|x_i - y_i|)`
    Manhattan,
    /// Minkowski distance with parameter p
    Minkowski(f32),
    /// Cosine distance: `1 - cos(x, y)`; 1.0 when either vector is zero
    Cosine,
}

impl DistanceMetric {
    /// Checks the metric parameters.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::InvalidArgument`] if a Minkowski `p` is not a
    /// finite positive number.
    pub fn validate(&self) -> Result<()> {
        match *self {
            DistanceMetric::Minkowski(p) if !(p.is_finite() && p > 0.0) => {
                Err(LignError::invalid("p", p, "finite p > 0"))
            }
            _ => Ok(()),
        }
    }

    /// Distance between two equally sized rows.
    #[must_use]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        match *self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Minkowski(p) => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y).abs().powf(p))
                .sum::<f32>()
                .powf(1.0 / p),
            DistanceMetric::Cosine => {
                let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let nb = b.iter().map(|y| y * y).sum::<f32>().sqrt();
                if na == 0.0 || nb == 0.0 {
                    1.0
                } else {
                    1.0 - dot / (na * nb)
                }
            }
        }
    }
}

/// Validates a support set before fitting.
fn check_support(x: &Matrix<f32>, y: &[Label]) -> Result<()> {
    if x.n_rows() == 0 {
        return Err(LignError::invalid(
            "support set",
            "0 samples",
            "at least one support example",
        ));
    }
    if y.len() != x.n_rows() {
        return Err(LignError::shape(
            "support labels",
            format!("{} labels", x.n_rows()),
            format!("{} labels", y.len()),
        ));
    }
    Ok(())
}

/// Validates query embeddings against the fitted dimension.
fn check_query(x: &Matrix<f32>, n_features: usize) -> Result<()> {
    if x.n_rows() > 0 && x.n_cols() != n_features {
        return Err(LignError::shape(
            "query embeddings",
            format!("{n_features} columns"),
            format!("{} columns", x.n_cols()),
        ));
    }
    Ok(())
}


#[cfg(test)]
#[path = "tests_prototype_contract.rs"]
mod tests_prototype_contract;

#[cfg(test)]
#[path = "tests_knn_contract.rs"]
mod tests_knn_contract;
