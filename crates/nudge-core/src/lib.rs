//! Nudge Core
//!
//! Core types and utilities shared across the Nudge suggestion engine.
//!
//! This crate provides:
//! - The token vocabulary (`Token`, `Bigram`) produced by the tokenizer
//! - Sentiment buckets and the mappings from slider signals and corpus labels
//! - The tokenizer used identically at training and query time
//! - Error types and result handling

pub mod error;
pub mod sentiment;
pub mod tokenizer;
pub mod types;

pub use error::{Error, Result};
pub use sentiment::SentimentBucket;
pub use tokenizer::Tokenizer;
pub use types::{Bigram, Token};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::sentiment::SentimentBucket;
    pub use crate::tokenizer::Tokenizer;
    pub use crate::types::{Bigram, Token};
}
