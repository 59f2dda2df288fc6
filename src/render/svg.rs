//! String-built SVG scatter plots.

use super::{DiagnosticRenderer, Projection, RenderSpec};
use crate::error::{LignError, Result};
use crate::primitives::Matrix;
use crate::sampling::Label;
use std::fmt::Write as _;
use tracing::debug;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const PLOT_LEFT: f64 = 40.0;
const PLOT_TOP: f64 = 40.0;
const PLOT_SIZE: f64 = 400.0;
const BAR_X: f64 = 500.0;
const BAR_WIDTH: f64 = 20.0;
const BAR_STEPS: usize = 32;

/// Scatter plot renderer writing a standalone SVG document.
///
/// Each row of the embedding matrix becomes one circle, coloured by a
/// rainbow map of `label / vmax` clamped to `[0, 1]`. A colour bar titled
/// "Label" spans `0..=vmax`.
#[derive(Debug, Clone)]
pub struct SvgScatterRenderer {
    radius: f64,
    title: String,
}

impl SvgScatterRenderer {
    /// Renderer with 3px markers and the default title.
    #[must_use]
    pub fn new() -> Self {
        Self {
            radius: 3.0,
            title: "Query embeddings".to_string(),
        }
    }

    /// Sets the marker radius in pixels.
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the plot title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builds the SVG document without touching the filesystem.
    ///
    /// # Errors
    ///
    /// - [`LignError::ShapeMismatch`] if `labels` and `embeddings` disagree in
    ///   length or the projection needs more columns than exist
    /// - [`LignError::Rendering`] for non-finite coordinates
    pub fn to_svg(
        &self,
        embeddings: &Matrix<f32>,
        labels: &[Label],
        spec: &RenderSpec,
    ) -> Result<String> {
        if labels.len() != embeddings.n_rows() {
            return Err(LignError::shape(
                "rendered labels",
                format!("{} labels", embeddings.n_rows()),
                format!("{} labels", labels.len()),
            ));
        }
        let dims = spec.projection.dims();
        if embeddings.n_cols() < dims {
            return Err(LignError::shape(
                "rendered embeddings",
                format!("at least {dims} columns"),
                format!("{} columns", embeddings.n_cols()),
            ));
        }
        if !embeddings.is_finite() {
            return Err(LignError::Rendering(
                "embeddings contain non-finite values".to_string(),
            ));
        }

        let points: Vec<(f64, f64)> = embeddings
            .rows()
            .map(|row| project(row, spec.projection))
            .collect();
        let (xs, ys) = (
            Bounds::of(points.iter().map(|p| p.0)),
            Bounds::of(points.iter().map(|p| p.1)),
        );

        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\">"
        )
        .expect("write to String is infallible");
        svg.push_str("  <style>\n");
        svg.push_str("    .point { stroke: #333; stroke-width: 0.5; }\n");
        svg.push_str("    .label { font-family: monospace; font-size: 12px; }\n");
        svg.push_str("  </style>\n");
        svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
        writeln!(
            svg,
            "  <text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\" font-weight=\"bold\">{}</text>",
            PLOT_LEFT + PLOT_SIZE / 2.0,
            escape(&self.title)
        )
        .expect("write to String is infallible");
        writeln!(
            svg,
            "  <rect x=\"{PLOT_LEFT}\" y=\"{PLOT_TOP}\" width=\"{PLOT_SIZE}\" height=\"{PLOT_SIZE}\" fill=\"none\" stroke=\"#999\"/>"
        )
        .expect("write to String is infallible");

        for (&(x, y), &label) in points.iter().zip(labels) {
            let cx = PLOT_LEFT + xs.unit(x) * PLOT_SIZE;
            // SVG y grows downward.
            let cy = PLOT_TOP + (1.0 - ys.unit(y)) * PLOT_SIZE;
            writeln!(
                svg,
                "  <circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{:.1}\" fill=\"{}\" class=\"point\"><title>{label}</title></circle>",
                self.radius,
                rainbow(label as f64 / spec.vmax)
            )
            .expect("write to String is infallible");
        }

        colour_bar(&mut svg, spec.vmax);
        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl Default for SvgScatterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRenderer for SvgScatterRenderer {
    fn render(&self, embeddings: &Matrix<f32>, labels: &[Label], spec: &RenderSpec) -> Result<()> {
        let svg = self.to_svg(embeddings, labels, spec)?;
        std::fs::write(&spec.output, &svg).map_err(|e| {
            LignError::Rendering(format!(
                "failed to write scatter plot to {}: {e}",
                spec.output.display()
            ))
        })?;
        debug!(
            path = %spec.output.display(),
            points = labels.len(),
            "scatter plot written"
        );
        Ok(())
    }
}

/// Vertical colour bar spanning `0..=vmax`, titled "Label".
fn colour_bar(svg: &mut String, vmax: f64) {
    let step = PLOT_SIZE / BAR_STEPS as f64;
    for i in 0..BAR_STEPS {
        // Top of the bar is vmax.
        let t = 1.0 - (i as f64 + 0.5) / BAR_STEPS as f64;
        writeln!(
            svg,
            "  <rect x=\"{BAR_X}\" y=\"{:.2}\" width=\"{BAR_WIDTH}\" height=\"{:.2}\" fill=\"{}\"/>",
            PLOT_TOP + i as f64 * step,
            step + 0.5,
            rainbow(t)
        )
        .expect("write to String is infallible");
    }
    writeln!(
        svg,
        "  <text x=\"{:.1}\" y=\"{:.1}\" class=\"label\">{vmax}</text>",
        BAR_X + BAR_WIDTH + 4.0,
        PLOT_TOP + 10.0
    )
    .expect("write to String is infallible");
    writeln!(
        svg,
        "  <text x=\"{:.1}\" y=\"{:.1}\" class=\"label\">0</text>",
        BAR_X + BAR_WIDTH + 4.0,
        PLOT_TOP + PLOT_SIZE
    )
    .expect("write to String is infallible");
    let mid_y = PLOT_TOP + PLOT_SIZE / 2.0;
    let label_x = BAR_X + BAR_WIDTH + 40.0;
    writeln!(
        svg,
        "  <text x=\"{label_x:.1}\" y=\"{mid_y:.1}\" class=\"label\" transform=\"rotate(90 {label_x:.1} {mid_y:.1})\" text-anchor=\"middle\">Label</text>"
    )
    .expect("write to String is infallible");
}

/// Projects an embedding row onto the drawing plane.
fn project(row: &[f32], projection: Projection) -> (f64, f64) {
    let x = f64::from(row[0]);
    let y = f64::from(row[1]);
    match projection {
        Projection::TwoD => (x, y),
        Projection::ThreeD => {
            let z = f64::from(row[2]);
            let (sin, cos) = std::f64::consts::FRAC_PI_6.sin_cos();
            ((x - y) * cos, (x + y) * sin + z)
        }
    }
}

/// Value range along one axis.
struct Bounds {
    min: f64,
    max: f64,
}

impl Bounds {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |b, v| Self {
                min: b.min.min(v),
                max: b.max.max(v),
            },
        )
    }

    /// Maps `v` into `[0, 1]`; a degenerate range maps to the centre.
    fn unit(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            (v - self.min) / span
        } else {
            0.5
        }
    }
}

/// Rainbow colour for `t` clamped to `[0, 1]`: red through yellow, green and
/// blue to magenta.
pub(crate) fn rainbow(t: f64) -> String {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let hue = t * 300.0 / 60.0;
    let sector = hue.floor();
    let f = hue - sector;
    let (r, g, b) = match sector as u8 {
        0 => (1.0, f, 0.0),
        1 => (1.0 - f, 1.0, 0.0),
        2 => (0.0, 1.0, f),
        3 => (0.0, 1.0 - f, 1.0),
        4 => (f, 0.0, 1.0),
        _ => (1.0, 0.0, 1.0),
    };
    format!(
        "#{:02X}{:02X}{:02X}",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
