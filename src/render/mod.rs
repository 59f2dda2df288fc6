//! Diagnostic scatter plots of query embeddings.
//!
//! Rendering is a side effect of evaluation and never part of scoring. The
//! [`Evaluator`](crate::eval::Evaluator) logs and discards renderer errors.

mod svg;

pub use svg::SvgScatterRenderer;

use crate::error::Result;
use crate::primitives::Matrix;
use crate::sampling::Label;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of embedding dimensions drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Columns 0 and 1.
    #[default]
    TwoD,
    /// Columns 0, 1 and 2 under an isometric projection.
    ThreeD,
}

impl Projection {
    /// Embedding columns the projection reads.
    #[must_use]
    pub fn dims(self) -> usize {
        match self {
            Projection::TwoD => 2,
            Projection::ThreeD => 3,
        }
    }
}

/// Where and how to draw one diagnostic plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSpec {
    /// Projection of the embedding space.
    pub projection: Projection,
    /// Label value mapped to the top of the colour scale (the bottom is 0).
    pub vmax: f64,
    /// Output file.
    pub output: PathBuf,
}

impl RenderSpec {
    /// Spec writing to an explicit path.
    pub fn new(projection: Projection, vmax: f64, output: impl Into<PathBuf>) -> Self {
        Self {
            projection,
            vmax,
            output: output.into(),
        }
    }

    /// Spec writing `Validate {n_classes}.svg` under `dir`.
    ///
    /// # Example
    ///
    /// ```
    /// use lign::render::{Projection, RenderSpec};
    /// use std::path::Path;
    ///
    /// let spec = RenderSpec::conventional("views", Projection::TwoD, 9.0, 4);
    /// assert_eq!(spec.output, Path::new("views").join("Validate 4.svg"));
    /// ```
    pub fn conventional(
        dir: impl AsRef<Path>,
        projection: Projection,
        vmax: f64,
        n_classes: usize,
    ) -> Self {
        Self::new(
            projection,
            vmax,
            dir.as_ref().join(format!("Validate {n_classes}.svg")),
        )
    }
}

/// Draws query embeddings coloured by ground-truth label.
pub trait DiagnosticRenderer {
    /// Writes one plot of `embeddings` (one row per node) coloured by `labels`.
    ///
    /// # Errors
    ///
    /// Implementation specific; the reference renderer fails with
    /// [`LignError::ShapeMismatch`](crate::error::LignError::ShapeMismatch) for
    /// too few columns or misaligned labels and
    /// [`LignError::Rendering`](crate::error::LignError::Rendering) when the
    /// file cannot be written.
    fn render(&self, embeddings: &Matrix<f32>, labels: &[Label], spec: &RenderSpec) -> Result<()>;
}

#[cfg(test)]
mod tests;
