//! Lign: few-shot evaluation of node embeddings in pure Rust.
//!
//! Lign scores an embedding model the way graph representation papers do:
//! sample a handful of labelled support nodes per class, fit a lightweight
//! classifier on their embeddings, then predict the labels of a separate
//! query population and report metrics.
//!
//! # Quick Start
//!
//! ```
//! use lign::prelude::*;
//!
//! // Two classes on a path graph, two feature columns per node.
//! let x = Matrix::from_vec(6, 2, vec![
//!     0.0, 0.1,
//!     0.2, 0.0,
//!     0.1, 0.2,
//!     5.0, 5.1,
//!     5.2, 5.0,
//!     5.1, 5.2,
//! ]).expect("6x2");
//! let graph = AttributedGraph::from_edges(6, &[(0, 1), (1, 2), (3, 4), (4, 5)])
//!     .expect("valid edges")
//!     .with_features("x", x).expect("one row per node")
//!     .with_labels("y", vec![0, 0, 0, 1, 1, 1]).expect("one label per node");
//!
//! let classes = LabelSet::from(vec![0, 1]);
//! let task = FewShotTask::new(&graph, &graph, "x", "y", &classes);
//!
//! let mut model = GcnEncoder::new(2, 2, 42);
//! let result = Evaluator::new()
//!     .with_config(EvalConfig::new().with_shots(2))
//!     .evaluate(&mut model, &task, &["accuracy", "macro_f1"])
//!     .expect("valid task");
//! assert!(result.get("accuracy").is_some());
//! ```
//!
//! # Modules
//!
//! - [`graph`]: Graph views with node attributes and induced subgraphs
//! - [`sampling`]: Stratified support sampling and query filtering
//! - [`embed`]: Embedding model contract and reference models (identity, GCN)
//! - [`inference`]: Eval-mode and gradient-free execution scopes
//! - [`classification`]: Few-shot classifiers (nearest prototype, kNN)
//! - [`metrics`]: Metric registry and classification metrics
//! - [`eval`]: The evaluator tying it all together
//! - [`render`]: Diagnostic scatter plots of query embeddings
//! - [`primitives`]: Dense matrix type

pub mod classification;
/// Embedding model contract with identity and GCN reference models
pub mod embed;
pub mod error;
pub mod eval;
pub mod graph;
pub mod inference;
pub mod metrics;
pub mod prelude;
pub mod primitives;
/// Diagnostic rendering, isolated from scoring
pub mod render;
pub mod sampling;

pub use error::{LignError, Result};
pub use primitives::Matrix;
