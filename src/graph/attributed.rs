//! In-memory attributed graph with cheap induced views.

use super::{EdgeIndex, GraphView, Label, NodeId, NodeIndexSet};
use crate::error::{LignError, Result};
use crate::primitives::Matrix;
use std::collections::HashMap;
use std::sync::Arc;

/// Attribute columns indexed by root node id.
#[derive(Debug, Clone, Default)]
struct AttributeStore {
    n_nodes: usize,
    features: HashMap<String, Matrix<f32>>,
    labels: HashMap<String, Vec<Label>>,
}

/// Undirected graph with named node attributes.
///
/// Adjacency is stored in CSR form (`row_ptr` / `col_indices`) over view
/// positions. Attributes live in a store shared by every view derived from
/// the same root; a view only records which root rows it covers.
#[derive(Debug, Clone)]
pub struct AttributedGraph {
    row_ptr: Vec<usize>,
    col_indices: Vec<NodeId>,
    edges: Vec<EdgeIndex>,
    root_ids: Vec<NodeId>,
    store: Arc<AttributeStore>,
}

impl AttributedGraph {
    /// Builds a root graph with `n_nodes` nodes and the given undirected edges.
    ///
    /// Duplicate edges (in either orientation) and self-loops are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::InvalidArgument`] if an endpoint is `>= n_nodes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lign::graph::{AttributedGraph, GraphView};
    ///
    /// let g = AttributedGraph::from_edges(3, &[(0, 1), (1, 0), (1, 2), (2, 2)]).expect("valid");
    /// assert_eq!(g.edges(), &[(0, 1), (1, 2)]);
    /// assert_eq!(g.neighbors(1), &[0, 2]);
    /// ```
    pub fn from_edges(n_nodes: usize, edges: &[EdgeIndex]) -> Result<Self> {
        for &(s, t) in edges {
            let bad = s.max(t);
            if bad >= n_nodes {
                return Err(LignError::invalid(
                    "edge endpoint",
                    bad,
                    format!("< {n_nodes}"),
                ));
            }
        }
        let store = AttributeStore {
            n_nodes,
            ..AttributeStore::default()
        };
        Ok(Self::assemble(
            n_nodes,
            edges.to_vec(),
            (0..n_nodes).collect(),
            Arc::new(store),
        ))
    }

    /// Builds a graph with no edges.
    #[must_use]
    pub fn isolated(n_nodes: usize) -> Self {
        let store = AttributeStore {
            n_nodes,
            ..AttributeStore::default()
        };
        Self::assemble(n_nodes, Vec::new(), (0..n_nodes).collect(), Arc::new(store))
    }

    /// Attaches a feature attribute (one row per node).
    ///
    /// Only valid on a root graph; views share their root's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`LignError::ShapeMismatch`] if the row count differs from the
    /// node count, or [`LignError::InvalidArgument`] when called on a view.
    pub fn with_features(mut self, name: impl Into<String>, features: Matrix<f32>) -> Result<Self> {
        self.ensure_root("with_features")?;
        if features.n_rows() != self.num_nodes() {
            return Err(LignError::shape(
                "feature attribute",
                format!("{} rows", self.num_nodes()),
                format!("{} rows", features.n_rows()),
            ));
        }
        Arc::make_mut(&mut self.store)
            .features
            .insert(name.into(), features);
        Ok(self)
    }

    /// Attaches a label attribute (one label per node).
    ///
    /// # Errors
    ///
    /// Returns [`LignError::ShapeMismatch`] if the length differs from the
    /// node count, or [`LignError::InvalidArgument`] when called on a view.
    pub fn with_labels(mut self, name: impl Into<String>, labels: Vec<Label>) -> Result<Self> {
        self.ensure_root("with_labels")?;
        if labels.len() != self.num_nodes() {
            return Err(LignError::shape(
                "label attribute",
                format!("{} labels", self.num_nodes()),
                format!("{} labels", labels.len()),
            ));
        }
        Arc::make_mut(&mut self.store)
            .labels
            .insert(name.into(), labels);
        Ok(self)
    }

    /// Neighbors of view position `v`, sorted ascending.
    #[must_use]
    pub fn neighbors(&self, v: NodeId) -> &[NodeId] {
        if v + 1 >= self.row_ptr.len() {
            return &[];
        }
        &self.col_indices[self.row_ptr[v]..self.row_ptr[v + 1]]
    }

    /// True if this graph is a root (not an induced view).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.root_ids.len() == self.store.n_nodes
            && self.root_ids.iter().enumerate().all(|(i, &id)| i == id)
    }

    fn ensure_root(&self, op: &str) -> Result<()> {
        if self.is_root() {
            Ok(())
        } else {
            Err(LignError::invalid(
                op,
                "induced view",
                "attributes can only be attached to a root graph",
            ))
        }
    }

    /// Normalizes edges and builds CSR adjacency over `n_nodes` positions.
    fn assemble(
        n_nodes: usize,
        edges: Vec<EdgeIndex>,
        root_ids: Vec<NodeId>,
        store: Arc<AttributeStore>,
    ) -> Self {
        let mut edges: Vec<EdgeIndex> = edges
            .into_iter()
            .filter(|&(s, t)| s != t)
            .map(|(s, t)| (s.min(t), s.max(t)))
            .collect();
        edges.sort_unstable();
        edges.dedup();

        let mut adj_list: Vec<Vec<NodeId>> = vec![Vec::new(); n_nodes];
        for &(s, t) in &edges {
            adj_list[s].push(t);
            adj_list[t].push(s);
        }

        let mut row_ptr = Vec::with_capacity(n_nodes + 1);
        let mut col_indices = Vec::with_capacity(edges.len() * 2);
        row_ptr.push(0);
        for neighbors in &mut adj_list {
            neighbors.sort_unstable();
            col_indices.extend_from_slice(neighbors);
            row_ptr.push(col_indices.len());
        }

        Self {
            row_ptr,
            col_indices,
            edges,
            root_ids,
            store,
        }
    }
}

impl GraphView for AttributedGraph {
    fn num_nodes(&self) -> usize {
        self.root_ids.len()
    }

    fn node_ids(&self) -> &[NodeId] {
        &self.root_ids
    }

    fn edges(&self) -> &[EdgeIndex] {
        &self.edges
    }

    fn has_attribute(&self, attr: &str) -> bool {
        self.store.features.contains_key(attr) || self.store.labels.contains_key(attr)
    }

    fn subgraph(&self, nodes: &NodeIndexSet) -> Result<Self> {
        let n = self.num_nodes();
        let mut remap: Vec<Option<NodeId>> = vec![None; n];
        for (new_pos, &old_pos) in nodes.iter().enumerate() {
            if old_pos >= n {
                return Err(LignError::invalid(
                    "subgraph node",
                    old_pos,
                    format!("< {n}"),
                ));
            }
            remap[old_pos] = Some(new_pos);
        }

        let edges: Vec<EdgeIndex> = self
            .edges
            .iter()
            .filter_map(|&(s, t)| Some((remap[s]?, remap[t]?)))
            .collect();
        let root_ids = nodes.iter().map(|&pos| self.root_ids[pos]).collect();

        Ok(Self::assemble(
            nodes.len(),
            edges,
            root_ids,
            Arc::clone(&self.store),
        ))
    }

    fn features(&self, attr: &str) -> Result<Matrix<f32>> {
        self.store
            .features
            .get(attr)
            .ok_or_else(|| LignError::UnknownAttribute(attr.to_string()))?
            .select_rows(&self.root_ids)
    }

    fn labels(&self, attr: &str) -> Result<Vec<Label>> {
        let column = self
            .store
            .labels
            .get(attr)
            .ok_or_else(|| LignError::UnknownAttribute(attr.to_string()))?;
        Ok(self.root_ids.iter().map(|&id| column[id]).collect())
    }
}
