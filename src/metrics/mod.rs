//! Scoring predictions against ground truth.
//!
//! [`MetricRegistry`] is an open table from metric name to scoring function
//! over `(predictions, ground truth)`. The built-in entries report
//! percentages on a 0-100 scale:
//!
//! | name                | score                                      |
//! |---------------------|--------------------------------------------|
//! | `accuracy`          | `100 * correct / N`                        |
//! | `balanced_accuracy` | mean per-class recall over true classes    |
//! | `macro_precision`   | unweighted mean of per-class precision     |
//! | `macro_recall`      | unweighted mean of per-class recall        |
//! | `macro_f1`          | unweighted mean of per-class F1            |
//! | `weighted_f1`       | per-class F1 weighted by true support      |
//!
//! Fractional helpers live in [`classification`].

pub mod classification;

use crate::error::{LignError, Result};
use crate::sampling::Label;
use classification::Average;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Name of the metric used by [`accuracy`](crate::eval::accuracy).
pub const ACCURACY: &str = "accuracy";

/// Scoring function over `(predictions, ground truth)`.
pub type MetricFn = Arc<dyn Fn(&[Label], &[Label]) -> Result<f64> + Send + Sync>;

/// What to do with requested metric names the registry does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownMetricPolicy {
    /// Omit the name from the result and log a warning.
    #[default]
    Skip,
    /// Fail with [`LignError::UnknownMetric`] before any work is done.
    Reject,
}

/// Metric name to score, in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricResult(BTreeMap<String, f64>);

impl MetricResult {
    /// Empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for `name`, if it was computed.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Records a score, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, score: f64) {
        self.0.insert(name.into(), score);
    }

    /// Number of scores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no metric was computed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, score)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.0
    }
}

impl fmt::Display for MetricResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, score)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {score:.2}")?;
        }
        Ok(())
    }
}

/// Open table of named scoring functions.
///
/// # Example
///
/// ```
/// use lign::metrics::MetricRegistry;
///
/// let mut registry = MetricRegistry::new();
/// registry.register("errors", |pred, truth| {
///     Ok(pred.iter().zip(truth).filter(|(p, t)| p != t).count() as f64)
/// });
///
/// let result = registry
///     .compute(&["accuracy", "errors"], &[0, 0, 1, 1], &[0, 1, 1, 1])
///     .expect("aligned labels");
/// assert_eq!(result.get("accuracy"), Some(75.0));
/// assert_eq!(result.get("errors"), Some(1.0));
/// ```
#[derive(Clone)]
pub struct MetricRegistry {
    metrics: BTreeMap<String, MetricFn>,
    policy: UnknownMetricPolicy,
}

impl MetricRegistry {
    /// Registry holding the built-in metrics, skipping unknown names.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(ACCURACY, |p, t| {
            classification::accuracy(p, t).map(percent)
        });
        registry.register("balanced_accuracy", |p, t| {
            classification::balanced_accuracy(p, t).map(percent)
        });
        registry.register("macro_precision", |p, t| {
            classification::precision(p, t, Average::Macro).map(percent)
        });
        registry.register("macro_recall", |p, t| {
            classification::recall(p, t, Average::Macro).map(percent)
        });
        registry.register("macro_f1", |p, t| {
            classification::f1_score(p, t, Average::Macro).map(percent)
        });
        registry.register("weighted_f1", |p, t| {
            classification::f1_score(p, t, Average::Weighted).map(percent)
        });
        registry
    }

    /// Registry with no metrics.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            metrics: BTreeMap::new(),
            policy: UnknownMetricPolicy::default(),
        }
    }

    /// Sets the unknown-name policy.
    #[must_use]
    pub fn with_policy(mut self, policy: UnknownMetricPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current unknown-name policy.
    #[must_use]
    pub fn policy(&self) -> UnknownMetricPolicy {
        self.policy
    }

    /// Adds or replaces a metric.
    pub fn register<F>(&mut self, name: impl Into<String>, metric: F)
    where
        F: Fn(&[Label], &[Label]) -> Result<f64> + Send + Sync + 'static,
    {
        self.metrics.insert(name.into(), Arc::new(metric));
    }

    /// Looks up a metric by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetricFn> {
        self.metrics.get(name)
    }

    /// True if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.metrics.keys().map(String::as_str)
    }

    /// Applies the unknown-name policy to `names` without scoring anything.
    ///
    /// # Errors
    ///
    /// Under [`UnknownMetricPolicy::Reject`], returns
    /// [`LignError::UnknownMetric`] for the first unregistered name.
    pub fn validate<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        if self.policy == UnknownMetricPolicy::Reject {
            if let Some(unknown) = names.iter().find(|n| !self.contains((*n).as_ref())) {
                return Err(LignError::UnknownMetric(unknown.as_ref().to_string()));
            }
        }
        Ok(())
    }

    /// Scores `predictions` against `truth` for each requested name.
    ///
    /// Unknown names are omitted (with a warning) or rejected, per the policy.
    /// Requesting a name twice yields one entry.
    ///
    /// # Errors
    ///
    /// - [`LignError::UnknownMetric`] under [`UnknownMetricPolicy::Reject`]
    /// - any error returned by a scoring function, e.g.
    ///   [`LignError::ShapeMismatch`] for misaligned inputs
    pub fn compute<S: AsRef<str>>(
        &self,
        names: &[S],
        predictions: &[Label],
        truth: &[Label],
    ) -> Result<MetricResult> {
        self.validate(names)?;

        let mut result = MetricResult::new();
        for name in names {
            let name = name.as_ref();
            match self.metrics.get(name) {
                Some(metric) => result.insert(name, metric(predictions, truth)?),
                None => warn!(metric = name, "skipping unknown metric"),
            }
        }
        Ok(result)
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("metrics", &self.metrics.keys().collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}

fn percent(fraction: f64) -> f64 {
    100.0 * fraction
}


#[cfg(test)]
#[path = "tests_classification_contract.rs"]
mod tests_classification_contract;
