//! Corpus ingestion and model building
//!
//! Every usable row is tokenized and a window of three tokens is slid across
//! it: the first two tokens form the key, the third is recorded as one
//! observed continuation in the row's bucket. The model is built from
//! scratch each time, so callers can publish it in one swap.

use crate::corpus::CorpusReader;
use crate::model::Model;
use nudge_core::{Bigram, Result, SentimentBucket, Tokenizer};
use serde::Serialize;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Minimum tokens needed to produce one training example
const WINDOW: usize = 3;

/// Builds models from labeled corpora
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    tokenizer: Tokenizer,
}

impl Trainer {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Build a fresh model from every usable row of `corpus`.
    ///
    /// Rows that fail to parse are logged and skipped; only corpus-level
    /// failures, already caught when the reader was opened, are errors.
    pub fn build<R: Read>(&self, mut corpus: CorpusReader<R>) -> Result<(Model, TrainingReport)> {
        let start = Instant::now();
        let mut model = Model::empty();
        let mut report = TrainingReport::default();

        for record in corpus.records() {
            report.rows_read += 1;

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping malformed corpus row: {}", e);
                    report.rows_failed += 1;
                    continue;
                }
            };

            let Some((message, label)) = record.labeled() else {
                debug!("Dropping corpus line {}: missing message or label", record.line);
                report.rows_missing_fields += 1;
                continue;
            };

            let bucket = SentimentBucket::from_label(label);
            let added = self.train_row(&mut model, bucket, message);
            if added == 0 {
                report.rows_too_short += 1;
                continue;
            }

            report.examples += added;
            report.rows_by_bucket.add(bucket);
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            "Built model from {} rows ({} examples, {} dropped, {} too short, {} failed) in {}ms",
            report.rows_read,
            report.examples,
            report.rows_missing_fields,
            report.rows_too_short,
            report.rows_failed,
            report.elapsed_ms
        );

        Ok((model, report))
    }

    /// Add one message's trigram windows to `bucket`. Returns the number of
    /// examples recorded, zero when the message has fewer than three tokens.
    pub fn train_row(&self, model: &mut Model, bucket: SentimentBucket, message: &str) -> usize {
        let tokens = self.tokenizer.tokenize(message);
        if tokens.len() < WINDOW {
            return 0;
        }

        let table = model.bucket_mut(bucket);
        for window in tokens.windows(WINDOW) {
            let key = Bigram::new(window[0].clone(), window[1].clone());
            table.observe(key, window[2].clone());
        }
        tokens.len() - (WINDOW - 1)
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

/// Outcome of a training pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrainingReport {
    /// Data rows encountered, including bad ones
    pub rows_read: usize,

    /// Rows dropped for a missing message or label
    pub rows_missing_fields: usize,

    /// Rows with fewer than three tokens
    pub rows_too_short: usize,

    /// Rows that could not be parsed
    pub rows_failed: usize,

    /// Continuations recorded across all buckets
    pub examples: usize,

    /// Rows that contributed examples, per bucket
    pub rows_by_bucket: BucketCounts,

    pub elapsed_ms: u64,
}

/// Count per sentiment bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl BucketCounts {
    pub fn add(&mut self, bucket: SentimentBucket) {
        *self.slot(bucket) += 1;
    }

    pub fn get(&self, bucket: SentimentBucket) -> usize {
        match bucket {
            SentimentBucket::Positive => self.positive,
            SentimentBucket::Negative => self.negative,
            SentimentBucket::Neutral => self.neutral,
        }
    }

    fn slot(&mut self, bucket: SentimentBucket) -> &mut usize {
        match bucket {
            SentimentBucket::Positive => &mut self.positive,
            SentimentBucket::Negative => &mut self.negative,
            SentimentBucket::Neutral => &mut self.neutral,
        }
    }
}
