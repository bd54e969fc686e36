//! Lightweight sentiment classifier
//!
//! This is a lexicon-based classifier used when no model weights are loaded.
//! Hit counts are Laplace-smoothed, so text without any hits lands at 0.5.

use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
use aho_corasick::AhoCorasick;
use reviewsense_core::{Result, SentimentLabel};
use std::time::Instant;

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "love",
    "amazing",
    "wonderful",
    "happy",
    "fantastic",
    "awesome",
    "best",
    "perfect",
    "impressed",
    "recommend",
    "exceeded",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "hate",
    "horrible",
    "worst",
    "sad",
    "angry",
    "disappoint",
    "poor",
    "regret",
    "waste",
    "broke",
    "rude",
];

pub struct LexiconSentimentClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconSentimentClassifier {
    pub fn new() -> Result<Self> {
        Self::with_name("sentiment-lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(POSITIVE_WORDS)
            .map_err(|e| {
                reviewsense_core::Error::classifier(format!(
                    "Failed to build positive sentiment matcher: {e}"
                ))
            })?;

        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(NEGATIVE_WORDS)
            .map_err(|e| {
                reviewsense_core::Error::classifier(format!(
                    "Failed to build negative sentiment matcher: {e}"
                ))
            })?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
        })
    }
}

#[async_trait::async_trait]
impl Classifier for LexiconSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let positive_hits = self.positive.find_iter(text).count() as f32;
        let negative_hits = self.negative.find_iter(text).count() as f32;

        let positive_prob = (positive_hits + 1.0) / (positive_hits + negative_hits + 2.0);
        let (label, score) = if positive_prob >= 0.5 {
            (SentimentLabel::Positive, positive_prob)
        } else {
            (SentimentLabel::Negative, 1.0 - positive_prob)
        };

        Ok(ClassificationResult {
            label,
            score,
            metadata: ClassificationMetadata {
                model: Some(self.name.clone()),
                all_scores: Some(vec![
                    (SentimentLabel::Negative, 1.0 - positive_prob),
                    (SentimentLabel::Positive, positive_prob),
                ]),
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
