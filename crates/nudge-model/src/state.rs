//! Shared model state
//!
//! The live model sits behind an `Arc` that is swapped wholesale on retrain.
//! Readers hold the lock only long enough to clone the pointer; a training
//! pass builds its model with no lock held and publishes it in one swap, so
//! a reader sees either the old tables or the new ones, never a mix.

use crate::config::CorpusColumns;
use crate::corpus::CorpusReader;
use crate::model::{Model, ModelStats};
use crate::trainer::{Trainer, TrainingReport};
use nudge_core::{Error, Result};
use parking_lot::{Mutex, RwLock};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Owner of the live model
pub struct ModelHandle {
    current: RwLock<Arc<Model>>,

    /// Serialises training passes
    training: Mutex<()>,

    trainer: Trainer,
    columns: CorpusColumns,
}

impl ModelHandle {
    /// A handle holding an empty model
    pub fn new(trainer: Trainer, columns: CorpusColumns) -> Self {
        Self {
            current: RwLock::new(Arc::new(Model::empty())),
            training: Mutex::new(()),
            trainer,
            columns,
        }
    }

    /// The model as of now. Later swaps do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<Model> {
        Arc::clone(&self.current.read())
    }

    /// Publish `model`, replacing the current one
    pub fn replace(&self, model: Model) {
        let model = Arc::new(model);
        *self.current.write() = model;
    }

    /// Train from a corpus file and swap the result in.
    ///
    /// Returns `None`, logging why, when the corpus cannot be used; the
    /// previous model stays live in that case.
    pub fn train_from_path(&self, path: impl AsRef<Path>) -> Option<TrainingReport> {
        let _guard = self.training.lock();
        self.train_locked(path.as_ref())
    }

    /// Like [`ModelHandle::train_from_path`], but fails at once with
    /// [`Error::TrainingInProgress`] instead of queueing behind a running pass.
    pub fn try_train_from_path(&self, path: impl AsRef<Path>) -> Result<Option<TrainingReport>> {
        let Some(_guard) = self.training.try_lock() else {
            return Err(Error::TrainingInProgress);
        };
        Ok(self.train_locked(path.as_ref()))
    }

    fn train_locked(&self, path: &Path) -> Option<TrainingReport> {
        info!("Training model from {}", path.display());
        let outcome = CorpusReader::open(path, &self.columns)
            .and_then(|corpus| self.trainer.build(corpus));
        self.publish(outcome)
    }

    /// Train from an already-open corpus source and swap the result in
    pub fn train_from_reader<R: Read>(&self, source: R) -> Option<TrainingReport> {
        let _guard = self.training.lock();

        let outcome = CorpusReader::from_reader(source, &self.columns)
            .and_then(|corpus| self.trainer.build(corpus));
        self.publish(outcome)
    }

    fn publish(&self, outcome: Result<(Model, TrainingReport)>) -> Option<TrainingReport> {
        match outcome {
            Ok((model, report)) => {
                self.replace(model);
                info!("Model published ({} examples)", report.examples);
                Some(report)
            }
            Err(e) => {
                warn!("Training skipped, keeping current model: {}", e);
                None
            }
        }
    }

    pub fn stats(&self) -> ModelStats {
        self.snapshot().stats()
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }
}

impl Default for ModelHandle {
    fn default() -> Self {
        Self::new(Trainer::default(), CorpusColumns::default())
    }
}
