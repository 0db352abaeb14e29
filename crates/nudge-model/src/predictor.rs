//! Next-token prediction
//!
//! Lookup runs in two tiers. An exact match on the last two context tokens
//! samples from that bigram's continuation list. Without one, the match is
//! relaxed to any bigram ending in the last token, pooling their lists up to
//! a fixed cap. Sampling is uniform over the list, and because repeats are
//! stored, that is proportional to observed frequency.

use crate::config::PredictorConfig;
use crate::model::Model;
use crate::state::ModelHandle;
use nudge_core::{Bigram, SentimentBucket, Token, Tokenizer};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

/// Which retrieval tier produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Exact,
    Fallback,
}

impl MatchSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fallback => "fallback",
        }
    }
}

/// A suggested next token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub token: Token,
    pub source: MatchSource,
    pub bucket: SentimentBucket,
}

/// Answers next-token queries against the live model
pub struct Predictor {
    handle: Arc<ModelHandle>,
    tokenizer: Tokenizer,
    config: PredictorConfig,
}

impl Predictor {
    pub fn new(handle: Arc<ModelHandle>, config: PredictorConfig) -> Self {
        let tokenizer = handle.trainer().tokenizer().clone();
        Self {
            handle,
            tokenizer,
            config,
        }
    }

    /// Suggest one token to follow `text`, or `None` if there is nothing to offer
    pub fn suggest(&self, text: &str, signal: i64) -> Option<String> {
        self.predict(text, signal).map(|p| p.token.into())
    }

    /// Predict using the thread-local RNG
    pub fn predict(&self, text: &str, signal: i64) -> Option<Prediction> {
        self.predict_with_rng(text, signal, &mut rand::thread_rng())
    }

    /// Predict with a caller-supplied RNG
    pub fn predict_with_rng<R: Rng + ?Sized>(
        &self,
        text: &str,
        signal: i64,
        rng: &mut R,
    ) -> Option<Prediction> {
        let tokens = self.tokenizer.tokenize(text);
        let context = Bigram::trailing(&tokens)?;
        let bucket = SentimentBucket::from_signal(signal);

        let model = self.handle.snapshot();
        sample(&model, bucket, &context, self.config.fallback_cap(), rng)
    }
}

/// Two-tier lookup against one bucket of `model`
pub fn sample<R: Rng + ?Sized>(
    model: &Model,
    bucket: SentimentBucket,
    context: &Bigram,
    fallback_cap: usize,
    rng: &mut R,
) -> Option<Prediction> {
    let table = model.bucket(bucket);
    if table.is_empty() {
        trace!("Bucket {} is empty", bucket);
        return None;
    }

    if let Some(choices) = table.continuations(context) {
        return choices.choose(rng).map(|token| Prediction {
            token: token.clone(),
            source: MatchSource::Exact,
            bucket,
        });
    }

    let candidates = table.fallback_candidates(&context.second, fallback_cap);
    trace!(
        "No exact match for {} in {}, {} fallback candidates",
        context,
        bucket,
        candidates.len()
    );

    candidates.choose(rng).map(|token| Prediction {
        token: token.clone(),
        source: MatchSource::Fallback,
        bucket,
    })
}
