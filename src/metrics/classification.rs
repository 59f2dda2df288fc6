//! Classification metrics for scoring few-shot predictions.
//!
//! Provides accuracy, balanced accuracy, precision, recall, F1-score, and
//! confusion matrix computation for multi-class classification.
//!
//! Labels need not be contiguous: the classes of a computation are the
//! distinct values seen in either `y_pred` or `y_true`, ascending. All scores
//! are fractions in `[0, 1]`; [`MetricRegistry`](super::MetricRegistry)
//! scales them to percentages.

use crate::error::{LignError, Result};
use crate::primitives::Matrix;
use crate::sampling::Label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Averaging strategy for multi-class metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Average {
    /// Calculate metrics for each label, return unweighted mean.
    Macro,
    /// Calculate metrics globally by counting total TP, FP, FN.
    Micro,
    /// Weighted mean by support (number of true instances per label).
    Weighted,
}

/// Checks that predictions and ground truth are non-empty and aligned.
pub(crate) fn check_pair(y_pred: &[Label], y_true: &[Label]) -> Result<()> {
    if y_pred.len() != y_true.len() {
        return Err(LignError::shape(
            "predictions vs ground truth",
            format!("{} predictions", y_true.len()),
            format!("{} predictions", y_pred.len()),
        ));
    }
    if y_true.is_empty() {
        return Err(LignError::invalid(
            "ground truth",
            "0 labels",
            "at least one scored node",
        ));
    }
    Ok(())
}

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Errors
///
/// - [`LignError::ShapeMismatch`] if the slices have different lengths
/// - [`LignError::InvalidArgument`] if they are empty
///
/// # Examples
///
/// ```
/// use lign::metrics::classification::accuracy;
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let acc = accuracy(&y_pred, &y_true).expect("aligned");
/// assert!((acc - 0.333333).abs() < 0.001);
/// ```
pub fn accuracy(y_pred: &[Label], y_true: &[Label]) -> Result<f64> {
    check_pair(y_pred, y_true)?;

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

/// Compute balanced accuracy: mean recall over the classes present in `y_true`.
///
/// Classes that only appear as (wrong) predictions do not dilute the score.
///
/// # Errors
///
/// Same as [`accuracy`].
///
/// # Examples
///
/// ```
/// use lign::metrics::classification::balanced_accuracy;
///
/// // Class 0 recall 1/1, class 1 recall 2/3.
/// let score = balanced_accuracy(&[0, 0, 1, 1], &[0, 1, 1, 1]).expect("aligned");
/// assert!((score - 5.0 / 6.0).abs() < 1e-9);
/// ```
pub fn balanced_accuracy(y_pred: &[Label], y_true: &[Label]) -> Result<f64> {
    check_pair(y_pred, y_true)?;
    let counts = ClassCounts::tally(y_pred, y_true);

    let present: Vec<usize> = (0..counts.classes.len())
        .filter(|&i| counts.support[i] > 0)
        .collect();
    let sum: f64 = present
        .iter()
        .map(|&i| class_recall(counts.tp[i], counts.fn_counts[i]))
        .sum();
    Ok(sum / present.len() as f64)
}

/// Compute precision score.
///
/// precision = TP / (TP + FP)
///
/// # Errors
///
/// Same as [`accuracy`].
///
/// # Examples
///
/// ```
/// use lign::metrics::classification::{precision, Average};
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let prec = precision(&y_pred, &y_true, Average::Macro).expect("aligned");
/// assert!(prec >= 0.0 && prec <= 1.0);
/// ```
pub fn precision(y_pred: &[Label], y_true: &[Label], average: Average) -> Result<f64> {
    check_pair(y_pred, y_true)?;
    let c = ClassCounts::tally(y_pred, y_true);

    Ok(match average {
        Average::Micro => class_precision(c.tp.iter().sum(), c.fp.iter().sum()),
        Average::Macro => c.macro_mean(|i| class_precision(c.tp[i], c.fp[i])),
        Average::Weighted => c.weighted_mean(|i| class_precision(c.tp[i], c.fp[i])),
    })
}

/// Compute recall score.
///
/// recall = TP / (TP + FN)
///
/// # Errors
///
/// Same as [`accuracy`].
///
/// # Examples
///
/// ```
/// use lign::metrics::classification::{recall, Average};
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let rec = recall(&y_pred, &y_true, Average::Macro).expect("aligned");
/// assert!(rec >= 0.0 && rec <= 1.0);
/// ```
pub fn recall(y_pred: &[Label], y_true: &[Label], average: Average) -> Result<f64> {
    check_pair(y_pred, y_true)?;
    let c = ClassCounts::tally(y_pred, y_true);

    Ok(match average {
        Average::Micro => class_recall(c.tp.iter().sum(), c.fn_counts.iter().sum()),
        Average::Macro => c.macro_mean(|i| class_recall(c.tp[i], c.fn_counts[i])),
        Average::Weighted => c.weighted_mean(|i| class_recall(c.tp[i], c.fn_counts[i])),
    })
}

/// Compute F1 score (harmonic mean of precision and recall).
///
/// F1 = 2 * (precision * recall) / (precision + recall)
///
/// # Errors
///
/// Same as [`accuracy`].
///
/// # Examples
///
/// ```
/// use lign::metrics::classification::{f1_score, Average};
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let f1 = f1_score(&y_pred, &y_true, Average::Macro).expect("aligned");
/// assert!(f1 >= 0.0 && f1 <= 1.0);
/// ```
pub fn f1_score(y_pred: &[Label], y_true: &[Label], average: Average) -> Result<f64> {
    check_pair(y_pred, y_true)?;
    let c = ClassCounts::tally(y_pred, y_true);

    Ok(match average {
        Average::Micro => class_f1(
            c.tp.iter().sum(),
            c.fp.iter().sum(),
            c.fn_counts.iter().sum(),
        ),
        Average::Macro => c.macro_mean(|i| class_f1(c.tp[i], c.fp[i], c.fn_counts[i])),
        Average::Weighted => c.weighted_mean(|i| class_f1(c.tp[i], c.fp[i], c.fn_counts[i])),
    })
}

/// Confusion matrix over the classes seen in predictions or ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    classes: Vec<Label>,
    counts: Matrix<usize>,
}

impl ConfusionMatrix {
    /// Row/column labels, ascending.
    #[must_use]
    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// Count matrix; element `[i, j]` counts samples of true class
    /// `classes[i]` predicted as `classes[j]`.
    #[must_use]
    pub fn counts(&self) -> &Matrix<usize> {
        &self.counts
    }

    /// Count for a (true, predicted) label pair; 0 for unseen labels.
    #[must_use]
    pub fn get(&self, truth: Label, predicted: Label) -> usize {
        match (
            self.classes.binary_search(&truth),
            self.classes.binary_search(&predicted),
        ) {
            (Ok(i), Ok(j)) => self.counts.get(i, j),
            _ => 0,
        }
    }
}

/// Compute confusion matrix.
///
/// # Errors
///
/// Same as [`accuracy`].
///
/// # Examples
///
/// ```
/// use lign::metrics::classification::confusion_matrix;
///
/// let y_true = vec![0, 0, 1, 1, 7, 7];
/// let y_pred = vec![0, 1, 1, 1, 7, 0];
/// let cm = confusion_matrix(&y_pred, &y_true).expect("aligned");
/// assert_eq!(cm.classes(), &[0, 1, 7]);
/// assert_eq!(cm.get(7, 0), 1);
/// assert_eq!(cm.get(1, 1), 2);
/// ```
pub fn confusion_matrix(y_pred: &[Label], y_true: &[Label]) -> Result<ConfusionMatrix> {
    check_pair(y_pred, y_true)?;
    let classes = distinct(y_pred, y_true);
    let n = classes.len();

    let mut data = vec![0usize; n * n];
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        data[index_of(&classes, t) * n + index_of(&classes, p)] += 1;
    }

    Ok(ConfusionMatrix {
        counts: Matrix::from_vec(n, n, data)?,
        classes,
    })
}

/// Per-class TP, FP, FN and support, indexed like `classes`.
struct ClassCounts {
    classes: Vec<Label>,
    tp: Vec<usize>,
    fp: Vec<usize>,
    fn_counts: Vec<usize>,
    support: Vec<usize>,
}

impl ClassCounts {
    fn tally(y_pred: &[Label], y_true: &[Label]) -> Self {
        let classes = distinct(y_pred, y_true);
        let n = classes.len();
        let mut counts = Self {
            classes,
            tp: vec![0; n],
            fp: vec![0; n],
            fn_counts: vec![0; n],
            support: vec![0; n],
        };

        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            let ti = index_of(&counts.classes, t);
            counts.support[ti] += 1;
            if t == p {
                counts.tp[ti] += 1;
            } else {
                counts.fp[index_of(&counts.classes, p)] += 1;
                counts.fn_counts[ti] += 1;
            }
        }
        counts
    }

    fn macro_mean(&self, per_class: impl Fn(usize) -> f64) -> f64 {
        let n = self.classes.len();
        (0..n).map(per_class).sum::<f64>() / n as f64
    }

    fn weighted_mean(&self, per_class: impl Fn(usize) -> f64) -> f64 {
        let total: usize = self.support.iter().sum();
        (0..self.classes.len())
            .map(|i| per_class(i) * self.support[i] as f64 / total as f64)
            .sum()
    }
}

fn distinct(y_pred: &[Label], y_true: &[Label]) -> Vec<Label> {
    y_true
        .iter()
        .chain(y_pred.iter())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Position of `label` in a sorted class list built from the same inputs.
fn index_of(classes: &[Label], label: Label) -> usize {
    classes.binary_search(&label).unwrap_or_else(|i| i)
}

/// Compute precision for a class given true positives and false positives.
fn class_precision(tp: usize, fp: usize) -> f64 {
    if tp + fp == 0 {
        0.0
    } else {
        tp as f64 / (tp + fp) as f64
    }
}

/// Compute recall for a class given true positives and false negatives.
fn class_recall(tp: usize, fn_count: usize) -> f64 {
    if tp + fn_count == 0 {
        0.0
    } else {
        tp as f64 / (tp + fn_count) as f64
    }
}

/// Compute F1 score for a single class.
fn class_f1(tp: usize, fp: usize, fn_count: usize) -> f64 {
    let prec = class_precision(tp, fp);
    let rec = class_recall(tp, fn_count);
    if prec + rec == 0.0 {
        0.0
    } else {
        2.0 * prec * rec / (prec + rec)
    }
}
