//! ReviewSense Classifiers
//!
//! Everything between raw review text and the scores returned to callers:
//! - [`normalizer`]: deterministic cleanup applied before classification
//! - [`classifier`]: the `Classifier` trait the sentiment backends implement
//! - [`distilbert`]: Candle DistilBERT fine-tuned on SST-2 (feature `ml-models`)
//! - [`lexicon`]: word-list fallback used without model weights
//! - [`scoring`]: maps a raw label/score pair into the response fields
//!
//! Classifiers are loaded once at startup through [`loader::load_classifier`]
//! and shared read-only between requests.

pub mod classifier;
#[cfg(feature = "ml-models")]
pub mod distilbert;
pub mod lexicon;
pub mod loader;
pub mod model_config;
pub mod normalizer;
pub mod scoring;

pub use classifier::{ClassificationMetadata, ClassificationResult, Classifier};
#[cfg(feature = "ml-models")]
pub use distilbert::DistilBertSentimentClassifier;
pub use lexicon::LexiconSentimentClassifier;
pub use loader::load_classifier;
pub use model_config::{ClassifierBackend, ClassifierSettings, InferenceConfig, ModelSource};
pub use normalizer::TextNormalizer;
pub use scoring::{map_scores, SentimentScores};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::lexicon::LexiconSentimentClassifier;
    pub use crate::model_config::ClassifierSettings;
    pub use crate::normalizer::TextNormalizer;
    pub use crate::scoring::{map_scores, SentimentScores};
}
