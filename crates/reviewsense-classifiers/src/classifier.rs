//! Classifier trait and common types

use async_trait::async_trait;
use reviewsense_core::{Result, SentimentLabel};

/// Trait for all sentiment classifiers
///
/// Implementations must be safe to share across concurrent requests and
/// must not mutate state after construction.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given (already normalized) text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Winning label
    pub label: SentimentLabel,

    /// Probability of the winning label (0.0-1.0)
    pub score: f32,

    /// Additional metadata
    pub metadata: ClassificationMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(label: SentimentLabel, score: f32) -> Self {
        Self {
            label,
            score,
            metadata: ClassificationMetadata::default(),
            latency_us: 0,
        }
    }

    /// Result used when there is nothing left to classify.
    ///
    /// Maximally uncertain: both labels at 0.5, reported as positive.
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Positive,
            score: 0.5,
            metadata: ClassificationMetadata {
                model: Some("neutral-fallback".to_string()),
                all_scores: None,
            },
            latency_us: 0,
        }
    }
}

/// Metadata about classification
#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Model name or version
    pub model: Option<String>,

    /// All class scores, as reported by the model
    pub all_scores: Option<Vec<(SentimentLabel, f32)>>,
}
