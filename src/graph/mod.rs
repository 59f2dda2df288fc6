//! Graph views consumed by the evaluator.
//!
//! The evaluator never builds graphs. It asks a [`GraphView`] for induced
//! subgraphs and for per-node attribute projections (feature matrices and
//! label columns), always in the view's own node order.
//!
//! [`AttributedGraph`] is an in-memory view backed by CSR adjacency and a
//! shared attribute store, so induced subgraphs are cheap: they carry a row
//! mapping into the root store instead of copying attributes.
//!
//! # Examples
//!
//! ```
//! use lign::graph::{AttributedGraph, GraphView, NodeIndexSet};
//! use lign::primitives::Matrix;
//!
//! let g = AttributedGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)])
//!     .expect("edges in range")
//!     .with_labels("class", vec![0, 0, 1, 1])
//!     .expect("one label per node");
//!
//! let sub = g.subgraph(&NodeIndexSet::new(vec![1, 2]).expect("unique")).expect("in range");
//! assert_eq!(sub.num_nodes(), 2);
//! assert_eq!(sub.node_ids(), &[1, 2]);
//! assert_eq!(sub.labels("class").expect("present"), vec![0, 1]);
//! ```

mod attributed;

pub use attributed::AttributedGraph;

use crate::error::{LignError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Node identifier: a position inside the view that produced it.
pub type NodeId = usize;

/// Undirected edge between two view positions.
pub type EdgeIndex = (NodeId, NodeId);

/// Categorical class identifier carried by a label attribute.
pub type Label = usize;

/// Ordered, duplicate-free sequence of node identifiers.
///
/// Produced by the stratified sampler or by population filtering and
/// consumed by [`GraphView::subgraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIndexSet(Vec<NodeId>);

impl NodeIndexSet {
    /// Creates a set, rejecting duplicate identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::InvalidArgument`] on the first duplicate.
    pub fn new(ids: Vec<NodeId>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(ids.len());
        for &id in &ids {
            if !seen.insert(id) {
                return Err(LignError::invalid(
                    "node index set",
                    id,
                    "no duplicate node identifiers",
                ));
            }
        }
        Ok(Self(ids))
    }

    /// Creates a set whose identifiers must all be `< bound`.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::InvalidArgument`] on duplicates or out-of-range ids.
    pub fn within(ids: Vec<NodeId>, bound: usize) -> Result<Self> {
        if let Some(&bad) = ids.iter().find(|&&id| id >= bound) {
            return Err(LignError::invalid(
                "node index set",
                bad,
                format!("node identifiers < {bound}"),
            ));
        }
        Self::new(ids)
    }

    /// Wraps identifiers the caller already knows to be unique.
    pub(crate) fn from_unique(ids: Vec<NodeId>) -> Self {
        debug_assert_eq!(
            ids.iter().collect::<HashSet<_>>().len(),
            ids.len(),
            "duplicate node identifiers"
        );
        Self(ids)
    }

    /// Number of identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identifiers in order.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    /// Iterates identifiers in order.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.0.iter()
    }

    /// Consumes the set, returning the identifiers.
    #[must_use]
    pub fn into_inner(self) -> Vec<NodeId> {
        self.0
    }
}

impl<'a> IntoIterator for &'a NodeIndexSet {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A graph, or an induced view of one, with attribute lookup.
///
/// All per-node results (feature rows, labels, [`node_ids`](Self::node_ids))
/// follow the view's node order, positions `0..num_nodes()`.
pub trait GraphView: Sized {
    /// Number of nodes in the view.
    fn num_nodes(&self) -> usize;

    /// Identifier of each view position in the root graph.
    fn node_ids(&self) -> &[NodeId];

    /// Undirected edges between view positions, each listed once.
    fn edges(&self) -> &[EdgeIndex];

    /// True if `attr` names a feature or label attribute.
    fn has_attribute(&self, attr: &str) -> bool;

    /// Induced subgraph on `nodes`; the result's position `i` is `nodes[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::InvalidArgument`] if an identifier is not in the view.
    fn subgraph(&self, nodes: &NodeIndexSet) -> Result<Self>;

    /// Feature matrix for `attr`, one row per view node.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::UnknownAttribute`] if no feature attribute `attr` exists.
    fn features(&self, attr: &str) -> Result<Matrix<f32>>;

    /// Label column for `attr`, one entry per view node.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::UnknownAttribute`] if no label attribute `attr` exists.
    fn labels(&self, attr: &str) -> Result<Vec<Label>>;
}
