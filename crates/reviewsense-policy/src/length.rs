//! Word-count length policy

use reviewsense_core::{Error, Result};
use std::fmt;
use tracing::debug;

/// Word budget that keeps typical English reviews under 512 subword tokens
pub const DEFAULT_MAX_WORDS: usize = 250;

/// Subword token limit of the sentiment model, quoted in rejection messages
pub const MODEL_TOKEN_LIMIT: usize = 512;

/// Count whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep the first `max_words` words, joined by single spaces
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Which review a decision is about, for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef<'a> {
    /// The only review of a single-item request
    Single,
    /// A review inside a batch
    Batch {
        index: usize,
        review_id: Option<&'a str>,
    },
}

impl fmt::Display for ItemRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("Text"),
            Self::Batch {
                review_id: Some(id),
                ..
            } => write!(f, "Review {}", id),
            Self::Batch { index, .. } => write!(f, "Review #{}", index),
        }
    }
}

/// Text that passed the policy, possibly shortened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedText {
    pub text: String,
    /// Whether words were dropped
    pub truncated: bool,
}

/// Length policy shared by the single and batch paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPolicy {
    max_words: usize,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS)
    }
}

impl LengthPolicy {
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words: max_words.max(1),
        }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    pub fn exceeds(&self, text: &str) -> bool {
        word_count(text) > self.max_words
    }

    /// First gate, on the raw text, before any normalization or inference.
    ///
    /// Returns whether the raw text is over the limit (and will therefore be
    /// reported as truncated). Fails if it is over and truncation is disabled.
    pub fn precheck(&self, raw: &str, truncate: bool, item: ItemRef<'_>) -> Result<bool> {
        let over = self.exceeds(raw);
        if over && !truncate {
            debug!(%item, max_words = self.max_words, "rejecting overlong raw text");
            return Err(Error::length_policy(format!(
                "{} exceeds model's token limit (>{} words / ~{} tokens) and truncation is disabled",
                item, self.max_words, MODEL_TOKEN_LIMIT
            )));
        }
        Ok(over)
    }

    /// Second gate, on the normalized text.
    ///
    /// Truncates when allowed, rejects otherwise. The rejection message is
    /// the same for single and batch items. Normalization does not add words
    /// today, so this only fires if that ever changes.
    pub fn enforce(
        &self,
        cleaned: String,
        truncate: bool,
        item: ItemRef<'_>,
    ) -> Result<BoundedText> {
        if !self.exceeds(&cleaned) {
            return Ok(BoundedText {
                text: cleaned,
                truncated: false,
            });
        }

        if !truncate {
            debug!(%item, max_words = self.max_words, "rejecting overlong normalized text");
            return Err(Error::length_policy(
                "Text is too long after preprocessing and truncation is disabled",
            ));
        }

        Ok(BoundedText {
            text: truncate_words(&cleaned, self.max_words),
            truncated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count(" one  two\tthree\n"), 3);
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("a b  c d", 2), "a b");
        assert_eq!(truncate_words("a b", 5), "a b");
        assert_eq!(truncate_words("", 5), "");
    }

    #[test]
    fn test_at_limit_passes() {
        let policy = LengthPolicy::default();
        let text = words(DEFAULT_MAX_WORDS);

        assert!(!policy.precheck(&text, false, ItemRef::Single).unwrap());
        let bounded = policy.enforce(text.clone(), false, ItemRef::Single).unwrap();
        assert_eq!(bounded.text, text);
        assert!(!bounded.truncated);
    }

    #[test]
    fn test_over_limit_without_truncation_rejected() {
        let policy = LengthPolicy::default();
        let err = policy
            .precheck(&words(251), false, ItemRef::Single)
            .unwrap_err();

        assert_eq!(err.kind(), reviewsense_core::ErrorKind::LengthPolicy);
        assert_eq!(
            err.to_string(),
            "Text exceeds model's token limit (>250 words / ~512 tokens) and truncation is disabled"
        );
    }

    #[test]
    fn test_over_limit_with_truncation() {
        let policy = LengthPolicy::default();
        let text = words(1000);

        assert!(policy.precheck(&text, true, ItemRef::Single).unwrap());
        let bounded = policy.enforce(text, true, ItemRef::Single).unwrap();
        assert!(bounded.truncated);
        assert_eq!(word_count(&bounded.text), DEFAULT_MAX_WORDS);
    }

    #[test]
    fn test_second_gate_rejects() {
        let policy = LengthPolicy::new(3);
        let err = policy
            .enforce("a b c d".to_string(), false, ItemRef::Single)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Text is too long after preprocessing and truncation is disabled"
        );

        let err = policy
            .enforce(
                "a b c d".to_string(),
                false,
                ItemRef::Batch {
                    index: 0,
                    review_id: Some("r-1"),
                },
            )
            .unwrap_err();
        assert!(err.to_string().starts_with("Text is too long"));
    }

    #[test]
    fn test_batch_messages_identify_item() {
        let policy = LengthPolicy::new(2);

        let err = policy
            .precheck(
                "a b c",
                false,
                ItemRef::Batch {
                    index: 4,
                    review_id: Some("r-42"),
                },
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Review r-42 exceeds model's token limit (>2 words / ~512 tokens) and truncation is disabled"
        );

        let err = policy
            .precheck(
                "a b c",
                false,
                ItemRef::Batch {
                    index: 4,
                    review_id: None,
                },
            )
            .unwrap_err();
        assert!(err.to_string().starts_with("Review #4 exceeds"));
    }

    #[test]
    fn test_zero_limit_clamped() {
        assert_eq!(LengthPolicy::new(0).max_words(), 1);
    }
}
