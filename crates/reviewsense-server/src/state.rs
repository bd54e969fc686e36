//! Shared application state

use crate::analyzer::ReviewAnalyzer;
use crate::config::ServerConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use reviewsense_classifiers::{load_classifier, Classifier};
use reviewsense_policy::LengthPolicy;
use std::sync::Arc;
use tracing::info;

/// State shared by every request handler.
///
/// The classifier inside the analyzer is loaded once at startup and is
/// read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub analyzer: Arc<ReviewAnalyzer>,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Load the configured classifier and build the state
    pub async fn new(
        config: ServerConfig,
        metrics_handle: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        let classifier = load_classifier(&config.classifier).await?;
        info!(classifier = classifier.name(), "Classifier ready");

        Ok(Self::with_classifier(config, classifier)?.with_metrics(metrics_handle))
    }

    /// Build the state around an already constructed classifier
    pub fn with_classifier(
        config: ServerConfig,
        classifier: Arc<dyn Classifier>,
    ) -> reviewsense_core::Result<Self> {
        let analyzer = ReviewAnalyzer::new(classifier, LengthPolicy::new(config.max_words))?;

        Ok(Self {
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
            metrics_handle: None,
        })
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics_handle = handle;
        self
    }
}
