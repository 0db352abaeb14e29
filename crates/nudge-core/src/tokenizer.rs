//! Text normalization shared by training and prediction
//!
//! Text is lower-cased, then split into maximal runs of word characters
//! (Unicode letters, digits, underscore) and apostrophes, plus single
//! punctuation marks from `. , ! ? ;`. Everything else is dropped.

use crate::types::Token;
use crate::Result;
use regex::Regex;

const TOKEN_PATTERN: &str = r"[\w']+|[.,!?;]";

/// Regex-backed tokenizer
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    /// Create a new tokenizer
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(TOKEN_PATTERN).map_err(|e| {
                crate::Error::internal(format!("Failed to compile token regex: {}", e))
            })?,
        })
    }

    /// Tokenize `text` into a vector
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| Token::new(m.as_str()))
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new().expect("Failed to create tokenizer")
    }
}
