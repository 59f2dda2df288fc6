//! Core compute primitives.
//!
//! Features and embeddings are dense row-major [`Matrix`] values, one row per
//! node.

mod matrix;

pub use matrix::Matrix;
