//! Mapping from raw classifier output to response scores
//!
//! The detailed scores assume a binary classifier whose two class
//! probabilities sum to 1: the winning label gets `score`, the other label
//! gets `1 - score`. This does not generalize beyond two classes.

use crate::classifier::ClassificationResult;
use reviewsense_core::{DetailedScores, Sentiment, SentimentLabel};

/// Score fields of a sentiment response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScores {
    pub sentiment: Sentiment,
    pub confidence: f32,
    /// `confidence` for positive, `-confidence` for negative
    pub normalized_score: f32,
    pub detailed_scores: DetailedScores,
}

/// Convert a label/score pair into the response score fields
pub fn map_scores(result: &ClassificationResult) -> SentimentScores {
    let score = if result.score.is_nan() {
        0.5
    } else {
        result.score.clamp(0.0, 1.0)
    };

    let sentiment = Sentiment::from(result.label);
    let normalized_score = match sentiment {
        Sentiment::Positive => score,
        Sentiment::Negative => -score,
    };

    let detailed_scores = match result.label {
        SentimentLabel::Positive => DetailedScores {
            positive: score,
            negative: 1.0 - score,
        },
        SentimentLabel::Negative => DetailedScores {
            positive: 1.0 - score,
            negative: score,
        },
    };

    SentimentScores {
        sentiment,
        confidence: score,
        normalized_score,
        detailed_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_mapping() {
        let scores = map_scores(&ClassificationResult::new(SentimentLabel::Positive, 0.9));
        assert_eq!(scores.sentiment, Sentiment::Positive);
        assert_eq!(scores.confidence, 0.9);
        assert_eq!(scores.normalized_score, 0.9);
        assert_eq!(scores.detailed_scores.positive, 0.9);
        assert!((scores.detailed_scores.negative - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_negative_mapping() {
        let scores = map_scores(&ClassificationResult::new(SentimentLabel::Negative, 0.8));
        assert_eq!(scores.sentiment, Sentiment::Negative);
        assert_eq!(scores.confidence, 0.8);
        assert_eq!(scores.normalized_score, -0.8);
        assert_eq!(scores.detailed_scores.negative, 0.8);
        assert!((scores.detailed_scores.positive - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_detailed_scores_sum_to_one() {
        for label in [SentimentLabel::Positive, SentimentLabel::Negative] {
            for step in 0..=20 {
                let score = step as f32 / 20.0;
                let scores = map_scores(&ClassificationResult::new(label, score));
                let sum = scores.detailed_scores.positive + scores.detailed_scores.negative;
                assert!((sum - 1.0).abs() < 1e-6, "sum was {sum} for {label} {score}");
                assert!((-1.0..=1.0).contains(&scores.normalized_score));
            }
        }
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let scores = map_scores(&ClassificationResult::new(SentimentLabel::Positive, 1.3));
        assert_eq!(scores.confidence, 1.0);
        assert_eq!(scores.detailed_scores.negative, 0.0);

        let scores = map_scores(&ClassificationResult::new(SentimentLabel::Negative, f32::NAN));
        assert_eq!(scores.confidence, 0.5);
        assert_eq!(scores.normalized_score, -0.5);
    }

    #[test]
    fn test_neutral_fallback() {
        let scores = map_scores(&ClassificationResult::neutral());
        assert_eq!(scores.sentiment, Sentiment::Positive);
        assert_eq!(scores.normalized_score, 0.5);
        assert_eq!(scores.detailed_scores.positive, 0.5);
        assert_eq!(scores.detailed_scores.negative, 0.5);
    }
}
