//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use lign::prelude::*;
//! ```

pub use crate::primitives::Matrix;
pub use crate::graph::{AttributedGraph, GraphView, NodeIndexSet};
pub use crate::sampling::{filter, filter_k, Label, LabelSet, StratifiedSampler, SupportSet};
pub use crate::embed::{EmbeddingModel, GcnEncoder, IdentityEmbedding};
pub use crate::inference::{no_grad, InferenceGuard};
pub use crate::classification::{Classifier, FittedClassifier, KNearestNeighbors, NearestPrototype};
pub use crate::metrics::{MetricRegistry, MetricResult, UnknownMetricPolicy};
pub use crate::eval::{accuracy, evaluate, EvalConfig, Evaluator, FewShotTask};
pub use crate::render::{DiagnosticRenderer, Projection, RenderSpec, SvgScatterRenderer};
pub use crate::error::LignError;
