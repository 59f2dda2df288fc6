//! Single-layer graph convolutional encoder.

use super::{check_rows, EmbeddingModel};
use crate::error::{LignError, Result};
use crate::graph::GraphView;
use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Graph Convolutional Network encoder (Kipf & Welling, 2017).
///
/// Aggregates neighbor features with symmetric normalization, then applies a
/// dense projection:
///
/// ```text
/// H = σ(D^{-1/2} (A + I) D^{-1/2} X W + b)
/// ```
///
/// where `D` counts each node's neighbors plus its self-loop and `σ` is ReLU
/// (optional).
///
/// # Example
///
/// ```
/// use lign::embed::{EmbeddingModel, GcnEncoder};
/// use lign::graph::AttributedGraph;
/// use lign::primitives::Matrix;
///
/// let g = AttributedGraph::from_edges(3, &[(0, 1), (1, 2)]).expect("valid");
/// let x = Matrix::from_vec(3, 4, vec![1.0; 12]).expect("3x4");
///
/// let gcn = GcnEncoder::new(4, 8, 42);
/// let z = gcn.embed(&g, &x).expect("shapes agree");
/// assert_eq!(z.shape(), (3, 8));
/// ```
#[derive(Debug, Clone)]
pub struct GcnEncoder {
    /// Projection `[in_features, out_features]`
    weight: Matrix<f32>,
    /// Bias `[out_features]`
    bias: Vec<f32>,
    add_self_loops: bool,
    relu: bool,
    training: bool,
}

impl GcnEncoder {
    /// Creates an encoder with Xavier-uniform weights drawn from `seed`.
    #[must_use]
    pub fn new(in_features: usize, out_features: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let limit = (6.0 / (in_features + out_features).max(1) as f32).sqrt();
        let data = (0..in_features * out_features)
            .map(|_| rng.gen_range(-limit..=limit))
            .collect();
        Self {
            weight: Matrix::from_vec(in_features, out_features, data)
                .expect("weight data sized in_features * out_features"),
            bias: vec![0.0; out_features],
            add_self_loops: true,
            relu: true,
            training: true,
        }
    }

    /// Creates an encoder with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::ShapeMismatch`] if `bias` length differs from the
    /// weight's column count.
    pub fn from_weights(weight: Matrix<f32>, bias: Vec<f32>) -> Result<Self> {
        if bias.len() != weight.n_cols() {
            return Err(LignError::shape(
                "gcn bias",
                format!("{} entries", weight.n_cols()),
                format!("{} entries", bias.len()),
            ));
        }
        Ok(Self {
            weight,
            bias,
            add_self_loops: true,
            relu: true,
            training: true,
        })
    }

    /// Disables self-loops in the propagation matrix.
    #[must_use]
    pub fn without_self_loops(mut self) -> Self {
        self.add_self_loops = false;
        self
    }

    /// Disables the ReLU output activation.
    #[must_use]
    pub fn without_activation(mut self) -> Self {
        self.relu = false;
        self
    }

    /// Input feature dimension.
    #[must_use]
    pub fn in_features(&self) -> usize {
        self.weight.n_rows()
    }

    /// Output embedding dimension.
    #[must_use]
    pub fn out_features(&self) -> usize {
        self.weight.n_cols()
    }

    /// Propagates features over the normalized adjacency.
    fn aggregate<G: GraphView>(&self, graph: &G, x: &Matrix<f32>) -> Matrix<f32> {
        let (num_nodes, in_features) = x.shape();

        let self_loop = if self.add_self_loops { 1.0 } else { 0.0 };
        let mut degrees: Vec<f32> = vec![self_loop; num_nodes];
        for &(src, tgt) in graph.edges() {
            degrees[src] += 1.0;
            degrees[tgt] += 1.0;
        }
        let norm: Vec<f32> = degrees
            .iter()
            .map(|&d| 1.0 / d.sqrt().max(1e-6))
            .collect();

        let mut aggregated = Matrix::zeros(num_nodes, in_features);

        if self.add_self_loops {
            for i in 0..num_nodes {
                let norm_ii = norm[i] * norm[i];
                for f in 0..in_features {
                    aggregated.set(i, f, norm_ii * x.get(i, f));
                }
            }
        }

        for &(src, tgt) in graph.edges() {
            let coeff = norm[src] * norm[tgt];
            for f in 0..in_features {
                let to_tgt = aggregated.get(tgt, f) + coeff * x.get(src, f);
                aggregated.set(tgt, f, to_tgt);
                let to_src = aggregated.get(src, f) + coeff * x.get(tgt, f);
                aggregated.set(src, f, to_src);
            }
        }

        aggregated
    }
}

impl EmbeddingModel for GcnEncoder {
    fn embed<G: GraphView>(&self, graph: &G, features: &Matrix<f32>) -> Result<Matrix<f32>> {
        check_rows(graph, features)?;
        if features.n_cols() != self.in_features() {
            return Err(LignError::shape(
                "gcn input",
                format!("{} feature columns", self.in_features()),
                format!("{} feature columns", features.n_cols()),
            ));
        }

        let mut out = self.aggregate(graph, features).matmul(&self.weight)?;
        for i in 0..out.n_rows() {
            for (j, &b) in self.bias.iter().enumerate() {
                let v = out.get(i, j) + b;
                out.set(i, j, if self.relu { v.max(0.0) } else { v });
            }
        }
        Ok(out)
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
