//! Nudge Model
//!
//! Sentiment-conditioned bigram continuation model behind "next word"
//! suggestions.
//!
//! The model keeps one table per sentiment bucket, mapping each pair of
//! consecutive tokens to every token observed after it. It is built once from
//! a labeled corpus, published behind a [`ModelHandle`], and read
//! concurrently by any number of [`Predictor`]s.

pub mod config;
pub mod corpus;
pub mod model;
pub mod predictor;
pub mod state;
pub mod trainer;

pub use config::{CorpusColumns, ModelConfig, PredictorConfig};
pub use corpus::{CorpusReader, CorpusRecord};
pub use model::{BucketStats, BucketTable, FallbackPool, Model, ModelStats};
pub use predictor::{MatchSource, Prediction, Predictor};
pub use state::ModelHandle;
pub use trainer::{BucketCounts, Trainer, TrainingReport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ModelConfig, PredictorConfig};
    pub use crate::predictor::{MatchSource, Prediction, Predictor};
    pub use crate::state::ModelHandle;
    pub use crate::trainer::{Trainer, TrainingReport};
    pub use nudge_core::prelude::*;
}
