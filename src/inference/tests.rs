use super::*;
use crate::embed::IdentityEmbedding;

#[test]
fn test_no_grad_context() {
    assert!(is_grad_enabled());

    no_grad(|| {
        assert!(!is_grad_enabled());
    });

    assert!(is_grad_enabled());
}

#[test]
fn test_nested_no_grad() {
    assert!(is_grad_enabled());

    no_grad(|| {
        assert!(!is_grad_enabled());
        no_grad(|| {
            assert!(!is_grad_enabled());
        });
        assert!(!is_grad_enabled());
    });

    assert!(is_grad_enabled());
}

#[test]
fn test_no_grad_restored_after_panic() {
    let result = std::panic::catch_unwind(|| {
        no_grad(|| panic!("embedding blew up"));
    });
    assert!(result.is_err());
    assert!(is_grad_enabled());
}

#[test]
fn test_guard_restores_training_mode() {
    let mut model = IdentityEmbedding::new();
    assert!(model.training());
    {
        let guard = InferenceGuard::enter(&mut model);
        assert!(!guard.training());
        assert!(!is_grad_enabled());
    }
    assert!(model.training());
    assert!(is_grad_enabled());
}

#[test]
fn test_guard_keeps_eval_mode() {
    let mut model = IdentityEmbedding::new();
    model.eval();
    {
        let _guard = InferenceGuard::enter(&mut model);
    }
    assert!(!model.training());
}

#[test]
fn test_guard_restores_on_panic() {
    let mut model = IdentityEmbedding::new();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = InferenceGuard::enter(&mut model);
        panic!("render failed");
    }));
    assert!(result.is_err());
    assert!(model.training());
    assert!(is_grad_enabled());
}
