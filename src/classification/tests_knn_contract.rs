// =========================================================================
// FALSIFY-KNN: k-nearest-neighbors over support embeddings
//
//   001: every prediction is a label seen during fitting
//   002: one prediction per query row
//   003: well-separated clusters are recovered
//   004: fitting twice yields identical predictions
//   005: k larger than the support set is clamped, not rejected
//
// References:
//   - Cover & Hart (1967) "Nearest Neighbor Pattern Classification"
// =========================================================================

use super::*;
use proptest::prelude::*;

fn clusters() -> (Matrix<f32>, Vec<Label>) {
    let x = Matrix::from_vec(6, 2, vec![
        0.0, 0.0, 0.5, 0.5, 1.0, 0.0,
        5.0, 5.0, 5.5, 5.5, 6.0, 5.0,
    ]).expect("valid");
    (x, vec![4_usize, 4, 4, 9, 9, 9])
}

/// FALSIFY-KNN-001: Predictions in training label set
#[test]
fn falsify_knn_001_predictions_in_label_set() {
    let (x, y) = clusters();
    let knn = KNearestNeighbors::new(3).fit(&x, &y).expect("fit");

    let x_test = Matrix::from_vec(3, 2, vec![0.2, 0.2, 3.0, 3.0, 5.8, 5.8]).expect("valid");
    for (i, &p) in knn.predict(&x_test).expect("predict").iter().enumerate() {
        assert!(
            p == 4 || p == 9,
            "FALSIFIED KNN-001: prediction[{i}] = {p}, not in {{4, 9}}"
        );
    }
}

/// FALSIFY-KNN-002: Prediction count matches input count
#[test]
fn falsify_knn_002_prediction_count() {
    let (x, y) = clusters();
    let knn = KNearestNeighbors::new(3).fit(&x, &y).expect("fit");

    let x_test = Matrix::from_vec(3, 2, vec![0.2, 0.2, 3.0, 3.0, 5.8, 5.8]).expect("valid");
    let preds = knn.predict(&x_test).expect("predict");
    assert_eq!(preds.len(), 3, "FALSIFIED KNN-002: {} predictions for 3 inputs", preds.len());
}

/// FALSIFY-KNN-003: Well-separated clusters classified correctly
#[test]
fn falsify_knn_003_separable_data() {
    let x = Matrix::from_vec(6, 2, vec![
        0.0, 0.0, 0.1, 0.1, 0.2, 0.2,
        100.0, 100.0, 100.1, 100.1, 100.2, 100.2,
    ]).expect("valid");
    let y = vec![0_usize, 0, 0, 1, 1, 1];

    let knn = KNearestNeighbors::new(3).fit(&x, &y).expect("fit");
    assert_eq!(
        knn.predict(&x).expect("predict"), y,
        "FALSIFIED KNN-003: KNN cannot classify well-separated clusters"
    );
}

/// FALSIFY-KNN-004: Deterministic predictions
#[test]
fn falsify_knn_004_deterministic() {
    let (x, y) = clusters();
    let knn = KNearestNeighbors::new(2);
    let a = knn.fit(&x, &y).expect("fit").predict(&x).expect("predict");
    let b = knn.fit(&x, &y).expect("fit").predict(&x).expect("predict");
    assert_eq!(a, b, "FALSIFIED KNN-004: predictions differ between fits");
}

proptest! {
    /// FALSIFY-KNN-005: any k >= 1 is accepted and clamped to the support size.
    #[test]
    fn falsify_knn_005_k_clamped(
        k in 1_usize..64,
        labels in prop::collection::vec(0_usize..4, 1..12),
    ) {
        let n = labels.len();
        let data: Vec<f32> = (0..n * 2).map(|i| i as f32).collect();
        let x = Matrix::from_vec(n, 2, data).expect("valid");

        let fitted = KNearestNeighbors::new(k).fit(&x, &labels).expect("k >= 1");
        prop_assert_eq!(fitted.k(), k.min(n), "FALSIFIED KNN-005");

        let preds = fitted.predict(&x).expect("predict");
        prop_assert!(preds.iter().all(|p| fitted.classes().contains(p)));
    }
}
