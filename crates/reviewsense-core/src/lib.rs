//! ReviewSense Core
//!
//! Core types and error handling shared across ReviewSense components.
//!
//! This crate provides:
//! - Review request types with schema validation applied at parse time
//! - The response shape returned for single and batch analysis
//! - The tagged error type used to tell validation, length-policy and
//!   classifier failures apart

pub mod error;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use types::{
    BatchRequest, BatchSentimentResponse, DetailedScores, ReviewRequest, Sentiment, SentimentLabel,
    SentimentResponse, MAX_BATCH_SIZE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::types::{
        BatchRequest, BatchSentimentResponse, ReviewRequest, Sentiment, SentimentLabel,
        SentimentResponse,
    };
}
