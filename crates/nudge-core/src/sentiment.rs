//! Sentiment buckets
//!
//! The model is partitioned into three independent sub-models. Queries pick a
//! bucket with the slider signal; corpus rows pick one with their label. Both
//! mappings are total: anything unrecognized lands in `Neutral`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three fixed sentiment partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBucket {
    Positive,
    Negative,
    Neutral,
}

impl SentimentBucket {
    /// Every bucket, in table order
    pub const ALL: [SentimentBucket; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Map a slider signal to a bucket.
    ///
    /// `0` is positive and `2` is negative. Every other value, including
    /// out-of-range ones, silently resolves to neutral.
    pub fn from_signal(signal: i64) -> Self {
        match signal {
            0 => Self::Positive,
            2 => Self::Negative,
            _ => Self::Neutral,
        }
    }

    /// Classify a corpus label by prefix after trimming and case-folding
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.starts_with("pos") {
            Self::Positive
        } else if label.starts_with("neg") {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Position of this bucket in [`Self::ALL`]
    pub fn index(self) -> usize {
        match self {
            Self::Positive => 0,
            Self::Negative => 1,
            Self::Neutral => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentBucket {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(crate::Error::config(format!(
                "unknown sentiment bucket '{}'",
                other
            ))),
        }
    }
}
