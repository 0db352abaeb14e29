//! Configuration for corpus ingestion and prediction

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Labeled corpus to train from at startup
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,

    /// Column holding the free-text message
    #[serde(default = "default_message_column")]
    pub message_column: String,

    /// Column holding the sentiment label
    #[serde(default = "default_label_column")]
    pub label_column: String,

    /// Prediction settings
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl ModelConfig {
    /// Corpus column names
    pub fn columns(&self) -> CorpusColumns {
        CorpusColumns {
            message: self.message_column.clone(),
            label: self.label_column.clone(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            message_column: default_message_column(),
            label_column: default_label_column(),
            predictor: PredictorConfig::default(),
        }
    }
}

/// Names of the two required corpus columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusColumns {
    pub message: String,
    pub label: String,
}

impl Default for CorpusColumns {
    fn default() -> Self {
        Self {
            message: default_message_column(),
            label: default_label_column(),
        }
    }
}

/// Prediction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Fallback try budget
    #[serde(default = "default_max_tries")]
    pub max_tries: usize,

    /// Fallback pool cap is `max_tries * fallback_multiplier`
    #[serde(default = "default_fallback_multiplier")]
    pub fallback_multiplier: usize,
}

impl PredictorConfig {
    /// Maximum fallback pool size before the scan stops
    pub fn fallback_cap(&self) -> usize {
        self.max_tries.saturating_mul(self.fallback_multiplier)
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            max_tries: default_max_tries(),
            fallback_multiplier: default_fallback_multiplier(),
        }
    }
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("data/feelings.csv")
}

fn default_message_column() -> String {
    "message".to_string()
}

fn default_label_column() -> String {
    "sentiment".to_string()
}

fn default_max_tries() -> usize {
    3
}

fn default_fallback_multiplier() -> usize {
    5
}
