// =========================================================================
// FALSIFY-SAMPLER: stratified support sampling properties
//
// For any labeling and any k >= 1:
//   001: no class contributes more than k nodes
//   002: every class contributes exactly min(k, group size)
//   003: the selected node set has no duplicates
//   004: every selected node belongs to the sampled view, with its own label
//   005: the query filter keeps exactly the nodes whose label is selected
// =========================================================================

use super::*;
use crate::graph::AttributedGraph;
use proptest::prelude::*;
use std::collections::HashSet;

fn labeled(labels: Vec<Label>) -> AttributedGraph {
    AttributedGraph::isolated(labels.len())
        .with_labels("y", labels)
        .expect("one label per node")
}

fn labels_and_classes() -> impl Strategy<Value = (Vec<Label>, Vec<Label>)> {
    (
        prop::collection::vec(0_usize..6, 1..80),
        prop::collection::vec(0_usize..6, 0..6),
    )
}

proptest! {
    /// FALSIFY-SAMPLER-001 / 002: per-class counts are min(k, group size).
    #[test]
    fn falsify_sampler_001_002_per_class_counts(
        (labels, classes) in labels_and_classes(),
        k in 1_usize..10,
    ) {
        let g = labeled(labels.clone());
        let classes = LabelSet::from(classes);
        let support = filter_k("y", &classes, &g, k).expect("k > 0");
        let counts = support.class_counts();

        for class in classes.iter() {
            let group = labels.iter().filter(|&&l| l == class).count();
            let got = counts.get(&class).copied().unwrap_or(0);
            prop_assert!(got <= k, "FALSIFIED SAMPLER-001: class {} got {} > k={}", class, got, k);
            prop_assert_eq!(got, group.min(k), "FALSIFIED SAMPLER-002: class {}", class);
        }
        prop_assert!(counts.keys().all(|&c| classes.contains(c)));
    }

    /// FALSIFY-SAMPLER-003 / 004: unique ids drawn from the view, labels match.
    #[test]
    fn falsify_sampler_003_004_unique_members(
        (labels, classes) in labels_and_classes(),
        k in 1_usize..10,
        seed in proptest::option::of(any::<u64>()),
    ) {
        let g = labeled(labels.clone());
        let classes = LabelSet::from(classes);
        let sampler = match seed {
            Some(s) => StratifiedSampler::new(k).with_random_state(s),
            None => StratifiedSampler::new(k),
        };
        let support = sampler.sample("y", &classes, &g).expect("k > 0");

        let unique: HashSet<_> = support.nodes().iter().collect();
        prop_assert_eq!(unique.len(), support.len(), "FALSIFIED SAMPLER-003: duplicates");
        for (&node, &label) in support.nodes().iter().zip(support.labels()) {
            prop_assert!(node < g.num_nodes(), "FALSIFIED SAMPLER-004: node {} outside view", node);
            prop_assert_eq!(labels[node], label);
        }
    }

    /// FALSIFY-SAMPLER-005: query population is exactly the selected classes.
    #[test]
    fn falsify_sampler_005_filter_population((labels, classes) in labels_and_classes()) {
        let g = labeled(labels.clone());
        let classes = LabelSet::from(classes);
        let nodes = filter("y", &classes, &g).expect("attribute present");

        let expected: Vec<NodeId> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| classes.contains(l))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(nodes.as_slice(), expected.as_slice());
    }
}
