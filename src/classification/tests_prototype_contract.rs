// =========================================================================
// FALSIFY-PROTO: nearest-prototype classification
//
//   001: a query nearer to one support cluster gets that cluster's label
//   002: a class with a single support example is a valid prototype
//   003: equidistant prototypes resolve to the lowest label
//   004: every prediction is a fitted class, one per query row
//   005: each prototype lies inside its class's bounding box
// =========================================================================

use super::*;
use proptest::prelude::*;

const A: Label = 0;
const B: Label = 1;

/// FALSIFY-PROTO-001: support A=[0,0], B=[10,10]; query [1,1] is A.
#[test]
fn falsify_proto_001_nearer_cluster_wins() {
    let x = Matrix::from_vec(2, 2, vec![0.0, 0.0, 10.0, 10.0]).expect("valid");
    let fitted = NearestPrototype::new().fit(&x, &[A, B]).expect("fit");

    let query = Matrix::from_vec(1, 2, vec![1.0, 1.0]).expect("valid");
    assert_eq!(
        fitted.predict(&query).expect("predict"),
        vec![A],
        "FALSIFIED PROTO-001: [1,1] not assigned to the class at [0,0]"
    );
}

/// FALSIFY-PROTO-002: single-example classes
#[test]
fn falsify_proto_002_single_example_class() {
    let x = Matrix::from_vec(3, 1, vec![0.0, 0.2, 7.0]).expect("valid");
    let fitted = NearestPrototype::new().fit(&x, &[A, A, B]).expect("fit");

    assert_eq!(fitted.support_counts(), &[2, 1]);
    assert_eq!(fitted.prototype(B), Some(&[7.0][..]));
    let query = Matrix::from_vec(1, 1, vec![6.0]).expect("valid");
    assert_eq!(
        fitted.predict(&query).expect("predict"),
        vec![B],
        "FALSIFIED PROTO-002: single-example class never predicted"
    );
}

/// FALSIFY-PROTO-003: ties resolve to the lowest label, independent of support order.
#[test]
fn falsify_proto_003_tie_lowest_label() {
    let x = Matrix::from_vec(2, 1, vec![2.0, -2.0]).expect("valid");
    let query = Matrix::from_vec(1, 1, vec![0.0]).expect("valid");

    let forward = NearestPrototype::new().fit(&x, &[5, 3]).expect("fit");
    let reverse = NearestPrototype::new().fit(&x, &[3, 5]).expect("fit");
    assert_eq!(forward.predict(&query).expect("predict"), vec![3]);
    assert_eq!(
        reverse.predict(&query).expect("predict"),
        vec![3],
        "FALSIFIED PROTO-003: tie not resolved to the lowest label"
    );
}

fn support() -> impl Strategy<Value = (Vec<Vec<f32>>, Vec<Label>)> {
    (1_usize..20).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::collection::vec(-100.0_f32..100.0, 3), n),
            prop::collection::vec(0_usize..5, n),
        )
    })
}

proptest! {
    /// FALSIFY-PROTO-004: predictions come from the fitted classes, one per row.
    #[test]
    fn falsify_proto_004_prediction_domain(
        (rows, labels) in support(),
        queries in prop::collection::vec(prop::collection::vec(-200.0_f32..200.0, 3), 0..10),
    ) {
        let x = Matrix::from_rows(&rows).expect("rectangular");
        let fitted = NearestPrototype::new().fit(&x, &labels).expect("fit");
        let q = Matrix::from_vec(queries.len(), 3, queries.concat()).expect("rectangular");

        let preds = fitted.predict(&q).expect("predict");
        prop_assert_eq!(preds.len(), queries.len(), "FALSIFIED PROTO-004: count");
        for p in preds {
            prop_assert!(labels.contains(&p), "FALSIFIED PROTO-004: {} never fitted", p);
        }
    }

    /// FALSIFY-PROTO-005: a class mean lies within the bounds of its members.
    #[test]
    fn falsify_proto_005_mean_within_bounds((rows, labels) in support()) {
        let x = Matrix::from_rows(&rows).expect("rectangular");
        let fitted = NearestPrototype::new().fit(&x, &labels).expect("fit");

        for &class in fitted.classes() {
            let proto = fitted.prototype(class).expect("fitted class");
            for (d, &v) in proto.iter().enumerate() {
                let members = rows.iter().zip(&labels).filter(|&(_, &l)| l == class).map(|(r, _)| r[d]);
                let lo = members.clone().fold(f32::INFINITY, f32::min);
                let hi = members.fold(f32::NEG_INFINITY, f32::max);
                prop_assert!(v >= lo - 1e-3 && v <= hi + 1e-3, "FALSIFIED PROTO-005: {} outside [{}, {}]", v, lo, hi);
            }
        }
    }
}
