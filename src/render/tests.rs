//! Tests for diagnostic rendering.

use super::svg::rainbow;
use super::*;
use crate::error::LignError;

fn embeddings() -> Matrix<f32> {
    Matrix::from_vec(4, 3, vec![
        0.0, 0.0, 0.0,
        1.0, 0.0, 0.5,
        0.0, 1.0, 1.0,
        1.0, 1.0, 1.5,
    ])
    .expect("4x3")
}

#[test]
fn test_conventional_file_name() {
    let spec = RenderSpec::conventional("/tmp/views", Projection::ThreeD, 3.0, 7);
    assert_eq!(spec.output, PathBuf::from("/tmp/views/Validate 7.svg"));
    assert_eq!(spec.projection, Projection::ThreeD);
    assert_eq!(spec.vmax, 3.0);
}

#[test]
fn test_projection_dims() {
    assert_eq!(Projection::default(), Projection::TwoD);
    assert_eq!(Projection::TwoD.dims(), 2);
    assert_eq!(Projection::ThreeD.dims(), 3);
}

#[test]
fn test_rainbow_endpoints_and_clamp() {
    assert_eq!(rainbow(0.0), "#FF0000");
    assert_eq!(rainbow(1.0), "#FF00FF");
    assert_eq!(rainbow(-3.0), rainbow(0.0));
    assert_eq!(rainbow(42.0), rainbow(1.0));
    assert_eq!(rainbow(f64::NAN), rainbow(0.0));
    assert_eq!(rainbow(0.4), "#00FF00");
}

#[test]
fn test_svg_has_one_circle_per_node_and_colour_bar() {
    let spec = RenderSpec::new(Projection::TwoD, 3.0, "unused.svg");
    let svg = SvgScatterRenderer::new()
        .to_svg(&embeddings(), &[0, 1, 2, 3], &spec)
        .expect("valid input");

    assert!(svg.starts_with("<?xml"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<circle").count(), 4);
    assert!(svg.contains(">Label</text>"));
    // Label 0 is the bottom of the scale, label 3 == vmax the top.
    assert!(svg.contains("fill=\"#FF0000\" class=\"point\"><title>0</title>"));
    assert!(svg.contains("fill=\"#FF00FF\" class=\"point\"><title>3</title>"));
}

#[test]
fn test_svg_three_d_projection() {
    let spec = RenderSpec::new(Projection::ThreeD, 1.0, "unused.svg");
    let svg = SvgScatterRenderer::new()
        .with_radius(5.0)
        .with_title("a < b")
        .to_svg(&embeddings(), &[0, 0, 1, 1], &spec)
        .expect("three columns available");
    assert_eq!(svg.matches("r=\"5.0\"").count(), 4);
    assert!(svg.contains("a &lt; b"));
}

#[test]
fn test_too_few_columns() {
    let flat = Matrix::from_vec(2, 2, vec![0.0, 1.0, 2.0, 3.0]).expect("2x2");
    let spec = RenderSpec::new(Projection::ThreeD, 1.0, "unused.svg");
    let err = SvgScatterRenderer::new()
        .to_svg(&flat, &[0, 1], &spec)
        .unwrap_err();
    assert!(matches!(err, LignError::ShapeMismatch { .. }));
}

#[test]
fn test_label_count_mismatch() {
    let spec = RenderSpec::new(Projection::TwoD, 1.0, "unused.svg");
    let err = SvgScatterRenderer::new()
        .to_svg(&embeddings(), &[0, 1], &spec)
        .unwrap_err();
    assert!(matches!(err, LignError::ShapeMismatch { .. }));
}

#[test]
fn test_non_finite_embeddings() {
    let bad = Matrix::from_vec(1, 2, vec![f32::NAN, 0.0]).expect("1x2");
    let spec = RenderSpec::new(Projection::TwoD, 1.0, "unused.svg");
    let err = SvgScatterRenderer::new().to_svg(&bad, &[0], &spec).unwrap_err();
    assert!(matches!(err, LignError::Rendering(_)));
}

#[test]
fn test_single_point_is_centred() {
    let one = Matrix::from_vec(1, 2, vec![7.0, -7.0]).expect("1x2");
    let spec = RenderSpec::new(Projection::TwoD, 1.0, "unused.svg");
    let svg = SvgScatterRenderer::new().to_svg(&one, &[0], &spec).expect("valid");
    assert!(svg.contains("cx=\"240.00\" cy=\"240.00\""));
}

#[test]
fn test_render_writes_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let spec = RenderSpec::conventional(dir.path(), Projection::TwoD, 3.0, 4);
    SvgScatterRenderer::new()
        .render(&embeddings(), &[0, 1, 2, 3], &spec)
        .expect("writable directory");

    let written = std::fs::read_to_string(dir.path().join("Validate 4.svg")).expect("file exists");
    assert_eq!(written.matches("<circle").count(), 4);
}

#[test]
fn test_render_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let spec = RenderSpec::conventional(dir.path().join("missing"), Projection::TwoD, 3.0, 4);
    let err = SvgScatterRenderer::new()
        .render(&embeddings(), &[0, 1, 2, 3], &spec)
        .unwrap_err();
    assert!(matches!(err, LignError::Rendering(ref msg) if msg.contains("Validate 4.svg")));
}
