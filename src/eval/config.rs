//! Evaluation settings.

use crate::error::{LignError, Result};
use crate::metrics::{UnknownMetricPolicy, ACCURACY};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Few-shot evaluation settings.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes:
///
/// ```
/// use lign::eval::EvalConfig;
/// use lign::metrics::UnknownMetricPolicy;
///
/// let config = EvalConfig::from_json_str(r#"{ "shots": 5, "unknown_metric": "reject" }"#)
///     .expect("valid config");
/// assert_eq!(config.shots, 5);
/// assert_eq!(config.metrics, vec!["accuracy".to_string()]);
/// assert_eq!(config.unknown_metric, UnknownMetricPolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Support examples drawn per class
    pub shots: usize,
    /// Metrics computed when the caller does not name any
    pub metrics: Vec<String>,
    /// Handling of metric names missing from the registry
    pub unknown_metric: UnknownMetricPolicy,
    /// Fail when a class under evaluation has no support examples
    pub require_all_classes: bool,
    /// Seed for shuffling class groups before sampling; `None` keeps discovery order
    pub random_state: Option<u64>,
}

impl EvalConfig {
    /// Default configuration: 3 shots, accuracy only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shots: 3,
            metrics: vec![ACCURACY.to_string()],
            unknown_metric: UnknownMetricPolicy::Skip,
            require_all_classes: false,
            random_state: None,
        }
    }

    /// Set support examples per class
    #[must_use]
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set default metrics
    #[must_use]
    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    /// Set unknown metric policy
    #[must_use]
    pub fn with_unknown_metric(mut self, policy: UnknownMetricPolicy) -> Self {
        self.unknown_metric = policy;
        self
    }

    /// Fail fast on classes without support examples
    #[must_use]
    pub fn with_require_all_classes(mut self, require: bool) -> Self {
        self.require_all_classes = require;
        self
    }

    /// Set sampling seed
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Parses a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// [`LignError::Config`] for malformed JSON or unknown keys, and
    /// anything [`validate`](Self::validate) reports.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// [`LignError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks field constraints.
    ///
    /// # Errors
    ///
    /// [`LignError::InvalidArgument`] if `shots == 0`.
    pub fn validate(&self) -> Result<()> {
        if self.shots == 0 {
            return Err(LignError::invalid("shots", self.shots, "shots >= 1"));
        }
        Ok(())
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::new()
    }
}
