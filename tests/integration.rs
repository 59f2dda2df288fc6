//! Integration tests for Lign few-shot evaluation.
//!
//! These tests verify end-to-end workflows combining multiple components.

use lign::prelude::*;
use lign::metrics::classification::confusion_matrix;

/// Two 6-node cliques; class 0 features near (1, 0), class 1 near (0, 1).
fn two_cliques() -> AttributedGraph {
    let mut edges = Vec::new();
    for group in [0..6, 6..12] {
        for a in group.clone() {
            for b in (a + 1)..group.end {
                edges.push((a, b));
            }
        }
    }
    let mut data = Vec::new();
    let mut labels = Vec::new();
    for i in 0..12 {
        let noise = (i % 3) as f32 * 0.05;
        if i < 6 {
            data.extend_from_slice(&[1.0 + noise, noise]);
            labels.push(0);
        } else {
            data.extend_from_slice(&[noise, 1.0 + noise]);
            labels.push(1);
        }
    }
    AttributedGraph::from_edges(12, &edges)
        .expect("valid edges")
        .with_features("feat", Matrix::from_vec(12, 2, data).expect("12x2"))
        .expect("one row per node")
        .with_labels("label", labels)
        .expect("one label per node")
}

fn identity_gcn() -> GcnEncoder {
    GcnEncoder::from_weights(Matrix::eye(2), vec![0.0, 0.0])
        .expect("bias matches weight")
        .without_activation()
}

#[test]
fn test_gcn_few_shot_workflow() {
    let graph = two_cliques();
    let classes = LabelSet::from(vec![0, 1]);
    let task = FewShotTask::new(&graph, &graph, "feat", "label", &classes);

    let mut model = identity_gcn();
    let result = Evaluator::new()
        .with_config(EvalConfig::new().with_shots(2).with_random_state(7))
        .evaluate(&mut model, &task, &["accuracy", "macro_f1", "balanced_accuracy"])
        .expect("valid task");

    assert_eq!(result.get("accuracy"), Some(100.0));
    assert_eq!(result.get("macro_f1"), Some(100.0));
    assert_eq!(result.get("balanced_accuracy"), Some(100.0));
    assert!(model.training(), "model returns to training mode");
}

#[test]
fn test_inductive_split_between_graphs() {
    // Support drawn from one graph, query population from another.
    let train = two_cliques();
    let test = AttributedGraph::from_edges(4, &[(0, 1), (2, 3)])
        .expect("valid edges")
        .with_features(
            "feat",
            Matrix::from_vec(4, 2, vec![0.9, 0.1, 1.1, 0.0, 0.1, 0.9, 0.0, 1.2]).expect("4x2"),
        )
        .expect("one row per node")
        .with_labels("label", vec![0, 0, 1, 1])
        .expect("one label per node");
    let classes = LabelSet::from(vec![0, 1]);
    let task = FewShotTask::new(&test, &train, "feat", "label", &classes);

    let score = accuracy(&mut identity_gcn(), &task).expect("valid task");
    assert_eq!(score, 100.0);
}

#[test]
fn test_random_gcn_scores_are_percentages() {
    let graph = two_cliques();
    let classes = LabelSet::from(vec![0, 1]);
    let task = FewShotTask::new(&graph, &graph, "feat", "label", &classes);

    for seed in 0..5 {
        let mut model = GcnEncoder::new(2, 8, seed);
        let score = accuracy(&mut model, &task).expect("valid task");
        assert!((0.0..=100.0).contains(&score), "seed {seed}: {score}");
    }
}

#[test]
fn test_knn_and_prototype_agree_on_separable_data() {
    let graph = two_cliques();
    let classes = LabelSet::from(vec![0, 1]);
    let task = FewShotTask::new(&graph, &graph, "feat", "label", &classes);
    let config = EvalConfig::new().with_shots(3);

    let proto = Evaluator::new()
        .with_config(config.clone())
        .accuracy(&mut IdentityEmbedding::new(), &task)
        .expect("valid task");
    let knn = Evaluator::new()
        .with_config(config)
        .with_classifier(KNearestNeighbors::new(3))
        .accuracy(&mut IdentityEmbedding::new(), &task)
        .expect("valid task");
    assert_eq!(proto, knn);
}

#[test]
fn test_manual_pipeline_matches_evaluator() {
    let graph = two_cliques();
    let classes = LabelSet::from(vec![0, 1]);

    let support = filter_k("label", &classes, &graph, 2).expect("k > 0");
    let (nodes, labels) = support.into_parts();
    let support_view = graph.subgraph(&nodes).expect("nodes in view");
    let model = IdentityEmbedding::new();
    let z = model
        .embed(&support_view, &support_view.features("feat").expect("attribute"))
        .expect("rows match");
    let fitted = NearestPrototype::new().fit(&z, &labels).expect("non-empty support");

    let query = graph
        .subgraph(&filter("label", &classes, &graph).expect("attribute"))
        .expect("nodes in view");
    let truth = query.labels("label").expect("attribute");
    let predictions = fitted
        .predict(&query.features("feat").expect("attribute"))
        .expect("same dimension");
    let manual = MetricRegistry::new()
        .compute(&["accuracy"], &predictions, &truth)
        .expect("aligned");

    let task = FewShotTask::new(&graph, &graph, "feat", "label", &classes);
    let automatic = Evaluator::new()
        .with_config(EvalConfig::new().with_shots(2))
        .evaluate(&mut IdentityEmbedding::new(), &task, &["accuracy"])
        .expect("valid task");
    assert_eq!(manual, automatic);

    let cm = confusion_matrix(&predictions, &truth).expect("aligned");
    assert_eq!(cm.get(0, 0) + cm.get(1, 1), truth.len());
}

#[test]
fn test_rendered_evaluation_with_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("lign=debug"))
        .with_test_writer()
        .try_init();

    let dir = tempfile::tempdir().expect("temp dir");
    let graph = two_cliques();
    let classes = LabelSet::from(vec![0, 1]);
    let task = FewShotTask::new(&graph, &graph, "feat", "label", &classes);
    let spec = RenderSpec::conventional(dir.path(), Projection::TwoD, 1.0, classes.len());

    let result = Evaluator::new()
        .with_renderer(SvgScatterRenderer::new().with_title("two cliques"), spec.clone())
        .evaluate(&mut identity_gcn(), &task, &["accuracy", "not_a_metric"])
        .expect("valid task");
    assert_eq!(result.len(), 1);

    let svg = std::fs::read_to_string(&spec.output).expect("plot written");
    assert_eq!(svg.matches("<circle").count(), 12);
    assert!(svg.contains("two cliques"));
}

#[test]
fn test_metric_result_serializes_as_report() {
    let graph = two_cliques();
    let classes = LabelSet::from(vec![0, 1]);
    let task = FewShotTask::new(&graph, &graph, "feat", "label", &classes);
    let result = evaluate(&mut IdentityEmbedding::new(), &task, &["accuracy"]).expect("valid task");

    let json = serde_json::to_value(&result).expect("serializable");
    assert_eq!(json["accuracy"], serde_json::json!(100.0));
}
