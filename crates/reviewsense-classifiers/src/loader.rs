//! Classifier construction from configuration

use crate::classifier::Classifier;
use crate::lexicon::LexiconSentimentClassifier;
use crate::model_config::{ClassifierBackend, ClassifierSettings};
use reviewsense_core::Result;
use std::sync::Arc;
use tracing::info;

/// Build the process-wide classifier described by `settings`.
///
/// Model loading is blocking IO, so it is moved off the async runtime.
pub async fn load_classifier(settings: &ClassifierSettings) -> Result<Arc<dyn Classifier>> {
    info!(
        backend = ?settings.backend,
        model = %settings.model_id(),
        "Loading sentiment classifier"
    );

    match settings.backend {
        ClassifierBackend::Lexicon => Ok(Arc::new(LexiconSentimentClassifier::new()?)),
        ClassifierBackend::Distilbert => load_distilbert(settings).await,
    }
}

#[cfg(feature = "ml-models")]
async fn load_distilbert(settings: &ClassifierSettings) -> Result<Arc<dyn Classifier>> {
    let settings = settings.clone();
    let classifier = tokio::task::spawn_blocking(move || {
        crate::distilbert::DistilBertSentimentClassifier::load(&settings)
    })
    .await
    .map_err(|e| reviewsense_core::Error::internal(format!("Model loading task failed: {}", e)))??;

    Ok(Arc::new(classifier))
}

#[cfg(not(feature = "ml-models"))]
async fn load_distilbert(_settings: &ClassifierSettings) -> Result<Arc<dyn Classifier>> {
    Err(reviewsense_core::Error::config(
        "the distilbert backend requires the `ml-models` feature; use the lexicon backend",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewsense_core::SentimentLabel;

    #[tokio::test]
    async fn test_load_lexicon() {
        let classifier = load_classifier(&ClassifierSettings::lexicon()).await.unwrap();
        assert_eq!(classifier.name(), "sentiment-lexicon");

        let result = classifier.classify("great value, love it").await.unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
    }
}
