//! Core types for ReviewSense

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Maximum number of reviews accepted in one batch request
pub const MAX_BATCH_SIZE: usize = 100;

/// A single review submitted for analysis.
///
/// `truncate` is always concrete once parsed: a standalone review defaults it
/// to `true`, a review inside a batch inherits the batch-level flag when it
/// did not set its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReviewWire")]
pub struct ReviewRequest {
    /// The review text to analyze
    pub text: String,

    /// Optional review identifier, echoed back in the response
    pub review_id: Option<String>,

    /// Source of the review (website, app, social media, ...)
    pub source: Option<String>,

    /// Whether to truncate text that exceeds the model's length limit
    pub truncate: bool,
}

impl ReviewRequest {
    /// Create a new review with truncation enabled
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            review_id: None,
            source: None,
            truncate: true,
        }
    }

    pub fn with_id(mut self, review_id: impl Into<String>) -> Self {
        self.review_id = Some(review_id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }
}

/// Review as it appears on the wire, before defaults are resolved
#[derive(Debug, Deserialize)]
struct ReviewWire {
    text: String,
    #[serde(default)]
    review_id: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    truncate: Option<bool>,
}

impl ReviewWire {
    fn resolve(self, default_truncate: bool) -> Result<ReviewRequest, Error> {
        if self.text.is_empty() {
            return Err(Error::validation("text must contain at least 1 character"));
        }

        Ok(ReviewRequest {
            text: self.text,
            review_id: self.review_id,
            source: self.source,
            truncate: self.truncate.unwrap_or(default_truncate),
        })
    }
}

impl TryFrom<ReviewWire> for ReviewRequest {
    type Error = Error;

    fn try_from(wire: ReviewWire) -> Result<Self, Self::Error> {
        wire.resolve(true)
    }
}

/// A batch of reviews analyzed in one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BatchWire")]
pub struct BatchRequest {
    /// Reviews to analyze, in order (1..=100)
    pub reviews: Vec<ReviewRequest>,

    /// Batch-level truncation flag, already applied to every review that
    /// did not carry its own
    pub truncate: bool,
}

impl BatchRequest {
    pub fn new(reviews: Vec<ReviewRequest>) -> Self {
        Self {
            reviews,
            truncate: true,
        }
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct BatchWire {
    reviews: Vec<ReviewWire>,
    #[serde(default = "default_true")]
    truncate: bool,
}

impl TryFrom<BatchWire> for BatchRequest {
    type Error = Error;

    fn try_from(wire: BatchWire) -> Result<Self, Self::Error> {
        if wire.reviews.is_empty() {
            return Err(Error::validation("reviews must contain at least 1 item"));
        }
        if wire.reviews.len() > MAX_BATCH_SIZE {
            return Err(Error::validation(format!(
                "reviews must contain at most {} items, got {}",
                MAX_BATCH_SIZE,
                wire.reviews.len()
            )));
        }

        let truncate = wire.truncate;
        let reviews = wire
            .reviews
            .into_iter()
            .enumerate()
            .map(|(idx, review)| {
                review
                    .resolve(truncate)
                    .map_err(|e| Error::validation(format!("reviews[{}]: {}", idx, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { reviews, truncate })
    }
}

fn default_true() -> bool {
    true
}

/// Raw label produced by a binary sentiment classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
        }
    }

    /// Parse a model `id2label` entry (`POSITIVE`, `negative`, `LABEL_1`, ...)
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "positive" | "pos" | "label_1" => Some(Self::Positive),
            "negative" | "neg" | "label_0" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall sentiment reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl From<SentimentLabel> for Sentiment {
    fn from(label: SentimentLabel) -> Self {
        match label {
            SentimentLabel::Positive => Self::Positive,
            SentimentLabel::Negative => Self::Negative,
        }
    }
}

/// Per-label scores of the binary classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetailedScores {
    #[serde(rename = "POSITIVE")]
    pub positive: f32,

    #[serde(rename = "NEGATIVE")]
    pub negative: f32,
}

/// Analysis result for one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResponse {
    /// Overall sentiment (positive/negative)
    pub sentiment: Sentiment,

    /// Confidence score (0-1)
    pub confidence: f32,

    /// Polarity from -1 (very negative) to 1 (very positive)
    pub normalized_score: f32,

    /// Detailed sentiment scores keyed by label
    pub detailed_scores: DetailedScores,

    pub review_id: Option<String>,

    pub source: Option<String>,

    /// Whether the input text was truncated before analysis
    #[serde(default)]
    pub truncated: bool,
}

/// Results of a batch request, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSentimentResponse {
    pub results: Vec<SentimentResponse>,
}
