//! Embedding models: functions from a graph view and its input features to
//! one representation row per node.
//!
//! The evaluator treats a model as opaque. It only needs [`EmbeddingModel`]:
//! a mode switch (`train` / `eval`) and a forward pass. Two reference models
//! are provided:
//!
//! - [`IdentityEmbedding`] - returns the input features unchanged
//! - [`GcnEncoder`] - one graph convolution (Kipf & Welling, 2017)
//!
//! # Example
//!
//! ```
//! use lign::embed::{EmbeddingModel, IdentityEmbedding};
//! use lign::graph::AttributedGraph;
//! use lign::primitives::Matrix;
//!
//! let g = AttributedGraph::isolated(2);
//! let x = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]).expect("2x2");
//! let z = IdentityEmbedding::new().embed(&g, &x).expect("shapes agree");
//! assert_eq!(z, x);
//! ```

mod gcn;

pub use gcn::GcnEncoder;

use crate::error::{LignError, Result};
use crate::graph::GraphView;
use crate::primitives::Matrix;

/// A model mapping (graph view, input features) to a representation tensor.
///
/// Implementations must return exactly one row per node of `graph`, in the
/// view's node order. Mode methods follow the usual train/eval convention.
pub trait EmbeddingModel {
    /// Forward pass.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::ShapeMismatch`] when `features` does not fit the
    /// model or the view.
    fn embed<G: GraphView>(&self, graph: &G, features: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Switches to training mode.
    fn train(&mut self);

    /// Switches to inference mode.
    fn eval(&mut self);

    /// True while in training mode.
    fn training(&self) -> bool;
}

/// Checks that `features` has one row per node of `graph`.
pub(crate) fn check_rows<G: GraphView>(graph: &G, features: &Matrix<f32>) -> Result<()> {
    if features.n_rows() == graph.num_nodes() {
        Ok(())
    } else {
        Err(LignError::shape(
            "input features",
            format!("{} rows", graph.num_nodes()),
            format!("{} rows", features.n_rows()),
        ))
    }
}

/// Pass-through model: the embedding of a node is its feature row.
#[derive(Debug, Clone)]
pub struct IdentityEmbedding {
    training: bool,
}

impl IdentityEmbedding {
    /// Creates the model in training mode.
    #[must_use]
    pub fn new() -> Self {
        Self { training: true }
    }
}

impl Default for IdentityEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingModel for IdentityEmbedding {
    fn embed<G: GraphView>(&self, graph: &G, features: &Matrix<f32>) -> Result<Matrix<f32>> {
        check_rows(graph, features)?;
        Ok(features.clone())
    }

    fn train(&mut self) {
        self.training = true;
    }

    fn eval(&mut self) {
        self.training = false;
    }

    fn training(&self) -> bool {
        self.training
    }
}
