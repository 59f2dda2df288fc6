//! Few-shot evaluation of node embeddings.
//!
//! One evaluation runs the whole protocol:
//!
//! 1. put the model in inference mode ([`InferenceGuard`]);
//! 2. sample at most `shots` support nodes per class from the support graph;
//! 3. embed the isolated support subgraph and fit the classifier;
//! 4. embed the isolated query population (every query node whose label is
//!    under evaluation) and predict;
//! 5. optionally render the query embeddings;
//! 6. score predictions against the query labels.
//!
//! Support and query embeddings are computed on separate induced subgraphs,
//! so no message passing crosses between the two populations.
//!
//! # Example
//!
//! ```
//! use lign::embed::IdentityEmbedding;
//! use lign::eval::{accuracy, FewShotTask};
//! use lign::graph::AttributedGraph;
//! use lign::primitives::Matrix;
//! use lign::sampling::LabelSet;
//!
//! let features = Matrix::from_vec(4, 2, vec![
//!     0.0, 0.0,
//!     0.1, 0.0,
//!     9.0, 9.0,
//!     9.1, 9.0,
//! ]).expect("4x2");
//! let graph = AttributedGraph::isolated(4)
//!     .with_features("x", features).expect("one row per node")
//!     .with_labels("y", vec![0, 0, 1, 1]).expect("one label per node");
//! let classes = LabelSet::from(vec![0, 1]);
//!
//! let task = FewShotTask::new(&graph, &graph, "x", "y", &classes);
//! let score = accuracy(&mut IdentityEmbedding::new(), &task).expect("valid task");
//! assert_eq!(score, 100.0);
//! ```

mod config;

pub use config::EvalConfig;

use crate::classification::{Classifier, FittedClassifier, NearestPrototype};
use crate::embed::EmbeddingModel;
use crate::error::{LignError, Result};
use crate::graph::GraphView;
use crate::inference::InferenceGuard;
use crate::metrics::{MetricRegistry, MetricResult, ACCURACY};
use crate::primitives::Matrix;
use crate::render::{DiagnosticRenderer, RenderSpec};
use crate::sampling::{filter, LabelSet, StratifiedSampler};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

/// Inputs of one evaluation.
#[derive(Debug)]
pub struct FewShotTask<'a, G: GraphView> {
    /// Graph holding the query population.
    pub query: &'a G,
    /// Graph the support set is drawn from.
    pub support: &'a G,
    /// Feature attribute fed to the model.
    pub input_attr: &'a str,
    /// Label attribute used for sampling and ground truth.
    pub output_attr: &'a str,
    /// Classes under evaluation.
    pub classes: &'a LabelSet,
}

impl<'a, G: GraphView> FewShotTask<'a, G> {
    /// Bundles the inputs of one evaluation.
    pub fn new(
        query: &'a G,
        support: &'a G,
        input_attr: &'a str,
        output_attr: &'a str,
        classes: &'a LabelSet,
    ) -> Self {
        Self {
            query,
            support,
            input_attr,
            output_attr,
            classes,
        }
    }
}

impl<G: GraphView> Clone for FewShotTask<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: GraphView> Copy for FewShotTask<'_, G> {}

/// Runs the few-shot protocol with a configurable classifier.
///
/// The evaluator holds configuration only; each call fits a fresh model, so
/// one evaluator can be reused across calls and threads.
#[derive(Clone)]
pub struct Evaluator<C: Classifier = NearestPrototype> {
    config: EvalConfig,
    classifier: C,
    registry: MetricRegistry,
    renderer: Option<(Arc<dyn DiagnosticRenderer + Send + Sync>, RenderSpec)>,
}

impl Evaluator {
    /// Nearest-prototype evaluator with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_classifier_and_config(NearestPrototype::new(), EvalConfig::default())
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Classifier> Evaluator<C> {
    fn with_classifier_and_config(classifier: C, config: EvalConfig) -> Self {
        let registry = MetricRegistry::new().with_policy(config.unknown_metric);
        Self {
            config,
            classifier,
            registry,
            renderer: None,
        }
    }

    /// Replaces the configuration. The unknown-metric policy carries over to
    /// the registry.
    #[must_use]
    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.registry = self.registry.with_policy(config.unknown_metric);
        self.config = config;
        self
    }

    /// Swaps the classifier, keeping everything else.
    #[must_use]
    pub fn with_classifier<D: Classifier>(self, classifier: D) -> Evaluator<D> {
        Evaluator {
            config: self.config,
            classifier,
            registry: self.registry,
            renderer: self.renderer,
        }
    }

    /// Replaces the metric registry. The configured unknown-metric policy
    /// is applied to it.
    #[must_use]
    pub fn with_registry(mut self, registry: MetricRegistry) -> Self {
        self.registry = registry.with_policy(self.config.unknown_metric);
        self
    }

    /// Renders the query embeddings of every evaluation according to `spec`.
    #[must_use]
    pub fn with_renderer<R>(mut self, renderer: R, spec: RenderSpec) -> Self
    where
        R: DiagnosticRenderer + Send + Sync + 'static,
    {
        self.renderer = Some((Arc::new(renderer), spec));
        self
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Current classifier.
    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Current metric registry.
    #[must_use]
    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Sampler implied by the configuration.
    #[must_use]
    pub fn sampler(&self) -> StratifiedSampler {
        let sampler = StratifiedSampler::new(self.config.shots);
        match self.config.random_state {
            Some(seed) => sampler.with_random_state(seed),
            None => sampler,
        }
    }

    /// Evaluates `model` on `task`, computing each metric in `metrics`.
    ///
    /// The model is in eval mode, without gradient tracking, for the whole
    /// call and returns to its previous mode afterwards, including on error.
    ///
    /// # Errors
    ///
    /// - [`LignError::InvalidArgument`] for `shots == 0`, an empty support
    ///   set or an empty query population
    /// - [`LignError::UnknownAttribute`] for a missing input or output attribute
    /// - [`LignError::UnknownMetric`] under the `Reject` policy
    /// - [`LignError::MissingClasses`] with `require_all_classes`
    /// - [`LignError::ShapeMismatch`] if the model returns the wrong number of rows
    ///
    /// Rendering failures are logged and never returned.
    pub fn evaluate<M, G, S>(
        &self,
        model: &mut M,
        task: &FewShotTask<'_, G>,
        metrics: &[S],
    ) -> Result<MetricResult>
    where
        M: EmbeddingModel,
        G: GraphView,
        S: AsRef<str>,
    {
        let span = info_span!(
            "evaluate",
            shots = self.config.shots,
            classes = task.classes.len(),
            metrics = metrics.len()
        );
        let _enter = span.enter();

        self.config.validate()?;
        self.registry.validate(metrics)?;

        let model = InferenceGuard::enter(model);

        let support = self
            .sampler()
            .sample(task.output_attr, task.classes, task.support)?;
        let missing = support.missing_classes(task.classes);
        if !missing.is_empty() {
            if self.config.require_all_classes {
                return Err(LignError::MissingClasses(missing));
            }
            warn!(?missing, "classes without support examples cannot be predicted");
        }
        debug!(support = support.len(), "support set sampled");

        let (support_nodes, support_labels) = support.into_parts();
        let support_view = task.support.subgraph(&support_nodes)?;
        let support_x = support_view.features(task.input_attr)?;
        let support_z = model.embed(&support_view, &support_x)?;
        check_embedding_rows("support embeddings", &support_z, support_labels.len())?;

        let fitted = self.classifier.fit(&support_z, &support_labels)?;
        debug!(classes = ?fitted.classes(), "classifier fitted");

        let query_nodes = filter(task.output_attr, task.classes, task.query)?;
        if query_nodes.is_empty() {
            return Err(LignError::invalid(
                "query population",
                "0 nodes",
                "at least one query node labelled with a class under evaluation",
            ));
        }
        let query_view = task.query.subgraph(&query_nodes)?;
        let query_x = query_view.features(task.input_attr)?;
        let truth = query_view.labels(task.output_attr)?;
        let query_z = model.embed(&query_view, &query_x)?;
        check_embedding_rows("query embeddings", &query_z, truth.len())?;

        let predictions = fitted.predict(&query_z)?;
        debug!(query = predictions.len(), "query population predicted");

        if let Some((renderer, spec)) = &self.renderer {
            if let Err(err) = renderer.render(&query_z, &truth, spec) {
                warn!(
                    error = %err,
                    path = %spec.output.display(),
                    "diagnostic rendering failed, metrics unaffected"
                );
            }
        }

        let result = self.registry.compute(metrics, &predictions, &truth)?;
        info!(%result, "evaluation finished");
        Ok(result)
    }

    /// Evaluates with the configured default metric list.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub fn evaluate_configured<M, G>(
        &self,
        model: &mut M,
        task: &FewShotTask<'_, G>,
    ) -> Result<MetricResult>
    where
        M: EmbeddingModel,
        G: GraphView,
    {
        self.evaluate(model, task, self.config.metrics.as_slice())
    }

    /// Accuracy of `model` on `task` as a percentage.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate); additionally
    /// [`LignError::UnknownMetric`] if the registry has no `accuracy` entry.
    pub fn accuracy<M, G>(&self, model: &mut M, task: &FewShotTask<'_, G>) -> Result<f64>
    where
        M: EmbeddingModel,
        G: GraphView,
    {
        self.evaluate(model, task, &[ACCURACY])?
            .get(ACCURACY)
            .ok_or_else(|| LignError::UnknownMetric(ACCURACY.to_string()))
    }
}

impl<C: Classifier + fmt::Debug> fmt::Debug for Evaluator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("config", &self.config)
            .field("classifier", &self.classifier)
            .field("registry", &self.registry)
            .field("render", &self.renderer.as_ref().map(|(_, spec)| spec))
            .finish()
    }
}

/// Evaluates with the default nearest-prototype evaluator (3 shots).
///
/// # Errors
///
/// See [`Evaluator::evaluate`].
pub fn evaluate<M, G, S>(
    model: &mut M,
    task: &FewShotTask<'_, G>,
    metrics: &[S],
) -> Result<MetricResult>
where
    M: EmbeddingModel,
    G: GraphView,
    S: AsRef<str>,
{
    Evaluator::new().evaluate(model, task, metrics)
}

/// Accuracy percentage under the default nearest-prototype evaluator.
///
/// # Errors
///
/// See [`Evaluator::accuracy`].
pub fn accuracy<M, G>(model: &mut M, task: &FewShotTask<'_, G>) -> Result<f64>
where
    M: EmbeddingModel,
    G: GraphView,
{
    Evaluator::new().accuracy(model, task)
}

fn check_embedding_rows(context: &str, embeddings: &Matrix<f32>, expected: usize) -> Result<()> {
    if embeddings.n_rows() == expected {
        Ok(())
    } else {
        Err(LignError::shape(
            context,
            format!("{expected} rows"),
            format!("{} rows", embeddings.n_rows()),
        ))
    }
}
