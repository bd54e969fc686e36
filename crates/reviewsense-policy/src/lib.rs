//! ReviewSense Length Policy
//!
//! Decides, per review, whether text fits the classifier's input budget.
//! Length is measured in whitespace-separated words as an approximation of
//! the model's 512 subword-token limit, calibrated at 250 words.
//!
//! Text over the limit is either truncated to its first `max_words` words
//! or rejected, depending on the review's effective `truncate` flag.

pub mod length;

pub use length::{
    truncate_words, word_count, BoundedText, ItemRef, LengthPolicy, DEFAULT_MAX_WORDS,
    MODEL_TOKEN_LIMIT,
};
