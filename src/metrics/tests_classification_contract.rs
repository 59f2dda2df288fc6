// =========================================================================
// FALSIFY-MC: classification metrics over few-shot predictions
//
//   001: accuracy is 100 * matches / N
//   002: perfect predictions score 100 on every built-in metric
//   003: every built-in metric lies in [0, 100]
//   004: precision, recall and F1 are fractions in [0, 1]
//   005: confusion matrix entries sum to N
//
// References:
//   - Sokolova & Lapalme (2009) "A systematic analysis of performance measures"
// =========================================================================

use super::classification::*;
use super::*;
use proptest::prelude::*;

/// FALSIFY-MC-001: [A,A,B,B] vs [A,B,B,B] is 75.0
#[test]
fn falsify_mc_001_accuracy_percentage() {
    let result = MetricRegistry::new()
        .compute(&[ACCURACY], &[0, 0, 1, 1], &[0, 1, 1, 1])
        .expect("aligned");
    assert_eq!(
        result.get(ACCURACY),
        Some(75.0),
        "FALSIFIED MC-001: accuracy is not 100 * matches / N"
    );
}

/// FALSIFY-MC-002: Perfect predictions score 100
#[test]
fn falsify_mc_002_perfect_scores() {
    let registry = MetricRegistry::new();
    let names: Vec<String> = registry.names().map(str::to_string).collect();
    let y = vec![4, 1, 2, 4, 1, 2];
    let result = registry.compute(&names, &y, &y).expect("aligned");
    for (name, score) in result.iter() {
        assert!(
            (score - 100.0).abs() < 1e-9,
            "FALSIFIED MC-002: {name}={score} for perfect predictions"
        );
    }
}

fn labels() -> impl Strategy<Value = (Vec<Label>, Vec<Label>)> {
    (1_usize..60).prop_flat_map(|n| {
        (
            prop::collection::vec(0_usize..6, n),
            prop::collection::vec(0_usize..6, n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// FALSIFY-MC-001-prop: accuracy formula
    #[test]
    fn falsify_mc_001_prop_formula((y_pred, y_true) in labels()) {
        let matches = y_pred.iter().zip(&y_true).filter(|(p, t)| p == t).count();
        let expected = 100.0 * (matches as f64 / y_true.len() as f64);
        let result = MetricRegistry::new()
            .compute(&[ACCURACY], &y_pred, &y_true)
            .expect("aligned");
        prop_assert_eq!(result.get(ACCURACY), Some(expected));
    }

    /// FALSIFY-MC-003-prop: built-ins bounded on random labels
    #[test]
    fn falsify_mc_003_prop_bounded((y_pred, y_true) in labels()) {
        let registry = MetricRegistry::new();
        let names: Vec<String> = registry.names().map(str::to_string).collect();
        let result = registry.compute(&names, &y_pred, &y_true).expect("aligned");
        prop_assert_eq!(result.len(), names.len());
        for (name, score) in result.iter() {
            prop_assert!(
                (0.0..=100.0 + 1e-9).contains(&score),
                "FALSIFIED MC-003: {}={} not in [0, 100]", name, score
            );
        }
    }

    /// FALSIFY-MC-004-prop: fractional helpers in [0, 1] for every averaging
    #[test]
    fn falsify_mc_004_prop_fractions((y_pred, y_true) in labels()) {
        for average in [Average::Macro, Average::Micro, Average::Weighted] {
            for score in [
                precision(&y_pred, &y_true, average).expect("aligned"),
                recall(&y_pred, &y_true, average).expect("aligned"),
                f1_score(&y_pred, &y_true, average).expect("aligned"),
            ] {
                prop_assert!((0.0..=1.0 + 1e-9).contains(&score), "FALSIFIED MC-004: {}", score);
            }
        }
    }

    /// FALSIFY-MC-005-prop: confusion matrix mass
    #[test]
    fn falsify_mc_005_prop_confusion_total((y_pred, y_true) in labels()) {
        let cm = confusion_matrix(&y_pred, &y_true).expect("aligned");
        let total: usize = cm.counts().as_slice().iter().sum();
        prop_assert_eq!(total, y_true.len(), "FALSIFIED MC-005");
        let diagonal: usize = cm.classes().iter().map(|&c| cm.get(c, c)).sum();
        let matches = y_pred.iter().zip(&y_true).filter(|(p, t)| p == t).count();
        prop_assert_eq!(diagonal, matches);
    }
}
