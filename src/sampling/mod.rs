//! Stratified support sampling and query population filtering.
//!
//! [`filter_k`] draws up to `k` labeled nodes per class from a support view;
//! [`filter`] selects every node of a query view whose class is under
//! evaluation. Both read node labels from the view's target attribute and keep
//! only labels present in the caller's [`LabelSet`].
//!
//! Selection is deterministic: nodes are discovered in ascending view
//! position and classes are emitted in ascending label order. A seeded
//! shuffle of each class group is available through
//! [`StratifiedSampler::with_random_state`].
//!
//! # Example
//!
//! ```
//! use lign::graph::{AttributedGraph, GraphView};
//! use lign::sampling::{filter, filter_k, LabelSet};
//!
//! let g = AttributedGraph::isolated(6)
//!     .with_labels("class", vec![1, 0, 1, 0, 1, 2])
//!     .expect("one label per node");
//! let classes: LabelSet = [0, 1].into_iter().collect();
//!
//! let support = filter_k("class", &classes, &g, 2).expect("k > 0");
//! assert_eq!(support.nodes().as_slice(), &[1, 3, 0, 2]);
//! assert_eq!(support.labels(), &[0, 0, 1, 1]);
//!
//! let query = filter("class", &classes, &g).expect("attribute present");
//! assert_eq!(query.as_slice(), &[0, 1, 2, 3, 4]);
//! ```

pub use crate::graph::Label;

use crate::error::{LignError, Result};
use crate::graph::{GraphView, NodeId, NodeIndexSet};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ordered, duplicate-free set of class labels under evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet(BTreeSet<Label>);

impl LabelSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no class is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `label` is under evaluation.
    #[must_use]
    pub fn contains(&self, label: Label) -> bool {
        self.0.contains(&label)
    }

    /// Adds a class; returns false if it was already present.
    pub fn insert(&mut self, label: Label) -> bool {
        self.0.insert(label)
    }

    /// Classes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        self.0.iter().copied()
    }

    /// Largest class label, if any.
    #[must_use]
    pub fn max(&self) -> Option<Label> {
        self.0.last().copied()
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Label>> for LabelSet {
    fn from(labels: Vec<Label>) -> Self {
        labels.into_iter().collect()
    }
}

/// Support nodes with their labels, in matching order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportSet {
    nodes: NodeIndexSet,
    labels: Vec<Label>,
}

impl SupportSet {
    /// Selected node identifiers.
    #[must_use]
    pub fn nodes(&self) -> &NodeIndexSet {
        &self.nodes
    }

    /// Label of each selected node.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of support examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Examples per class.
    #[must_use]
    pub fn class_counts(&self) -> BTreeMap<Label, usize> {
        let mut counts = BTreeMap::new();
        for &label in &self.labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Classes of `classes` with no support example.
    #[must_use]
    pub fn missing_classes(&self, classes: &LabelSet) -> Vec<Label> {
        let present = self.class_counts();
        classes.iter().filter(|c| !present.contains_key(c)).collect()
    }

    /// Splits into `(nodes, labels)`.
    #[must_use]
    pub fn into_parts(self) -> (NodeIndexSet, Vec<Label>) {
        (self.nodes, self.labels)
    }
}

/// Per-class support sampler.
///
/// # Example
///
/// ```
/// use lign::graph::AttributedGraph;
/// use lign::sampling::{LabelSet, StratifiedSampler};
///
/// let g = AttributedGraph::isolated(8)
///     .with_labels("y", vec![0, 0, 0, 0, 1, 1, 1, 1])
///     .expect("one label per node");
/// let classes = LabelSet::from(vec![0, 1]);
///
/// let sampler = StratifiedSampler::new(2).with_random_state(42);
/// let a = sampler.sample("y", &classes, &g).expect("k > 0");
/// let b = sampler.sample("y", &classes, &g).expect("k > 0");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifiedSampler {
    k: usize,
    random_state: Option<u64>,
}

impl StratifiedSampler {
    /// Sampler drawing at most `k` nodes per class, in discovery order.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            random_state: None,
        }
    }

    /// Shuffle each class group with a generator seeded by `seed` before
    /// truncating to `k`.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Examples drawn per class.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Draws the support set from `view`.
    ///
    /// Classes with fewer than `k` members contribute all of them.
    ///
    /// # Errors
    ///
    /// - [`LignError::InvalidArgument`] if `k == 0`
    /// - [`LignError::UnknownAttribute`] if `attr` is not a label attribute of `view`
    pub fn sample<G: GraphView>(
        &self,
        attr: &str,
        classes: &LabelSet,
        view: &G,
    ) -> Result<SupportSet> {
        if self.k == 0 {
            return Err(LignError::invalid("k", self.k, "k >= 1"));
        }

        let mut groups = group_by_class(attr, classes, view)?;

        if let Some(seed) = self.random_state {
            let mut rng = StdRng::seed_from_u64(seed);
            for members in groups.values_mut() {
                members.shuffle(&mut rng);
            }
        }

        let mut nodes = Vec::new();
        let mut labels = Vec::new();
        for (label, members) in groups {
            let take = members.len().min(self.k);
            nodes.extend_from_slice(&members[..take]);
            labels.extend(std::iter::repeat(label).take(take));
        }

        Ok(SupportSet {
            nodes: NodeIndexSet::from_unique(nodes),
            labels,
        })
    }
}

/// Draws at most `k` nodes per class of `classes` from `view`.
///
/// Equivalent to `StratifiedSampler::new(k).sample(attr, classes, view)`.
///
/// # Errors
///
/// See [`StratifiedSampler::sample`].
pub fn filter_k<G: GraphView>(
    attr: &str,
    classes: &LabelSet,
    view: &G,
    k: usize,
) -> Result<SupportSet> {
    StratifiedSampler::new(k).sample(attr, classes, view)
}

/// Selects every node of `view` whose `attr` label is in `classes`, in view order.
///
/// # Errors
///
/// Returns [`LignError::UnknownAttribute`] if `attr` is not a label attribute.
pub fn filter<G: GraphView>(attr: &str, classes: &LabelSet, view: &G) -> Result<NodeIndexSet> {
    let labels = view.labels(attr)?;
    let nodes = labels
        .iter()
        .enumerate()
        .filter(|&(_, &label)| classes.contains(label))
        .map(|(pos, _)| pos)
        .collect();
    Ok(NodeIndexSet::from_unique(nodes))
}

/// Groups view positions by label, keeping only classes under evaluation.
fn group_by_class<G: GraphView>(
    attr: &str,
    classes: &LabelSet,
    view: &G,
) -> Result<BTreeMap<Label, Vec<NodeId>>> {
    let labels = view.labels(attr)?;
    let mut groups: BTreeMap<Label, Vec<NodeId>> = BTreeMap::new();
    for (pos, &label) in labels.iter().enumerate() {
        if classes.contains(label) {
            groups.entry(label).or_default().push(pos);
        }
    }
    Ok(groups)
}


#[cfg(test)]
#[path = "tests_sampler_contract.rs"]
mod tests_sampler_contract;
