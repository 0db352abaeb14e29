//! Shared application state

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use nudge_core::Tokenizer;
use nudge_model::{ModelHandle, Predictor, Trainer, TrainingReport};
use std::sync::Arc;
use tracing::info;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Owner of the live model
    pub model: Arc<ModelHandle>,

    /// Reads the live model to answer suggestion requests
    pub predictor: Arc<Predictor>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Build state around an empty model. Call [`AppState::train`] to fill it.
    pub fn new(config: ServerConfig, metrics_handle: PrometheusHandle) -> anyhow::Result<Self> {
        let trainer = Trainer::new(Tokenizer::new()?);
        let model = Arc::new(ModelHandle::new(trainer, config.model.columns()));
        let predictor = Arc::new(Predictor::new(
            Arc::clone(&model),
            config.model.predictor,
        ));

        Ok(Self {
            config: Arc::new(config),
            model,
            predictor,
            metrics_handle,
        })
    }

    /// Train from the configured corpus off the async runtime, then publish.
    ///
    /// A corpus that cannot be used leaves the current model in place and
    /// returns `Ok(None)`; only a panicked training task is an error.
    pub async fn train(&self) -> Result<Option<TrainingReport>, tokio::task::JoinError> {
        let model = Arc::clone(&self.model);
        let path = self.config.model.corpus_path.clone();

        let report = tokio::task::spawn_blocking(move || model.train_from_path(path)).await?;
        self.finish_training(&report);
        Ok(report)
    }

    /// Retrain on request. Refuses with a conflict, without queueing, when a
    /// pass is already running.
    pub async fn retrain(&self) -> Result<Option<TrainingReport>, AppError> {
        let model = Arc::clone(&self.model);
        let path = self.config.model.corpus_path.clone();

        let outcome = tokio::task::spawn_blocking(move || model.try_train_from_path(path)).await?;
        match outcome {
            Ok(report) => {
                self.finish_training(&report);
                Ok(report)
            }
            Err(nudge_core::Error::TrainingInProgress) => {
                telemetry::record_training_busy();
                Err(AppError::Conflict("a retrain is already running".to_string()))
            }
            Err(e) => Err(AppError::Internal(e.to_string())),
        }
    }

    fn finish_training(&self, report: &Option<TrainingReport>) {
        telemetry::record_training(report.as_ref());

        if let Some(report) = report {
            info!(
                "Suggestions ready: {} bigrams from {} examples",
                self.model.stats().total_bigrams(),
                report.examples
            );
        }
    }
}
