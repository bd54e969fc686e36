//! Review analysis orchestration
//!
//! Each review moves through normalize -> length check -> classify -> map
//! -> assemble. A length-policy rejection stops the review before the
//! classifier is called. Batches are all-or-nothing: every review is length
//! checked before any inference runs, then reviews are classified one at a
//! time in input order.

use reviewsense_classifiers::{map_scores, ClassificationResult, Classifier, TextNormalizer};
use reviewsense_core::{
    BatchRequest, BatchSentimentResponse, Error, Result, ReviewRequest, SentimentResponse,
};
use reviewsense_policy::{ItemRef, LengthPolicy};
use std::sync::Arc;
use tracing::{debug, warn};

/// Review text ready for the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedReview {
    pub text: String,
    pub truncated: bool,
}

/// Sequences normalization, the length policy, the classifier and score
/// mapping for single and batch requests.
pub struct ReviewAnalyzer {
    classifier: Arc<dyn Classifier>,
    normalizer: TextNormalizer,
    policy: LengthPolicy,
}

impl ReviewAnalyzer {
    pub fn new(classifier: Arc<dyn Classifier>, policy: LengthPolicy) -> Result<Self> {
        Ok(Self {
            classifier,
            normalizer: TextNormalizer::new()?,
            policy,
        })
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn policy(&self) -> &LengthPolicy {
        &self.policy
    }

    /// Normalize and length-check one review without classifying it
    pub fn prepare(&self, review: &ReviewRequest, item: ItemRef<'_>) -> Result<PreparedReview> {
        let raw_over_limit = self
            .policy
            .precheck(&review.text, review.truncate, item)
            .map_err(|e| record_rejection("raw_length", e))?;

        let cleaned = self.normalizer.normalize(&review.text);

        let bounded = self
            .policy
            .enforce(cleaned, review.truncate, item)
            .map_err(|e| record_rejection("normalized_length", e))?;

        let truncated = raw_over_limit || bounded.truncated;
        if truncated {
            metrics::counter!("reviewsense_truncated_total").increment(1);
            debug!(%item, "review truncated to {} words", self.policy.max_words());
        }

        Ok(PreparedReview {
            text: bounded.text,
            truncated,
        })
    }

    /// Analyze a single review
    pub async fn analyze(&self, review: &ReviewRequest) -> Result<SentimentResponse> {
        let prepared = self.prepare(review, ItemRef::Single)?;
        let result = self.classify(&prepared.text).await?;
        Ok(assemble(review, &prepared, &result))
    }

    /// Analyze a batch. The first rejected review fails the whole batch.
    pub async fn analyze_batch(&self, batch: &BatchRequest) -> Result<BatchSentimentResponse> {
        let prepared = batch
            .reviews
            .iter()
            .enumerate()
            .map(|(index, review)| {
                let item = ItemRef::Batch {
                    index,
                    review_id: review.review_id.as_deref(),
                };
                self.prepare(review, item)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut results = Vec::with_capacity(prepared.len());
        for (review, prepared) in batch.reviews.iter().zip(&prepared) {
            let result = self.classify(&prepared.text).await?;
            results.push(assemble(review, prepared, &result));
        }

        Ok(BatchSentimentResponse { results })
    }

    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        metrics::counter!("reviewsense_reviews_total").increment(1);

        // Nothing survived normalization; never hand the model an empty string
        if text.is_empty() {
            debug!("empty text after normalization, using neutral result");
            return Ok(ClassificationResult::neutral());
        }

        let result = self.classifier.classify(text).await.map_err(|e| {
            warn!(classifier = self.classifier.name(), "classification failed: {}", e);
            e
        })?;

        metrics::histogram!("reviewsense_inference_latency_us").record(result.latency_us as f64);
        debug!(
            model = result.metadata.model.as_deref().unwrap_or(self.classifier.name()),
            label = %result.label,
            score = result.score,
            all_scores = ?result.metadata.all_scores,
            latency_us = result.latency_us,
            "review classified"
        );

        Ok(result)
    }
}

fn assemble(
    review: &ReviewRequest,
    prepared: &PreparedReview,
    result: &ClassificationResult,
) -> SentimentResponse {
    let scores = map_scores(result);

    SentimentResponse {
        sentiment: scores.sentiment,
        confidence: scores.confidence,
        normalized_score: scores.normalized_score,
        detailed_scores: scores.detailed_scores,
        review_id: review.review_id.clone(),
        source: review.source.clone(),
        truncated: prepared.truncated,
    }
}

fn record_rejection(gate: &'static str, err: Error) -> Error {
    metrics::counter!("reviewsense_rejections_total", "gate" => gate).increment(1);
    err
}
