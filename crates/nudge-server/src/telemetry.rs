//! Logging and metrics setup

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use nudge_core::SentimentBucket;
use nudge_model::{MatchSource, TrainingReport};
use std::time::Duration;

/// Initialize tracing/logging
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("nudge_core=debug,nudge_model=debug,nudge_server=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("nudge_core=info,nudge_model=info,nudge_server=info,tower_http=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the Prometheus recorder and return a handle for rendering
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "nudge_suggestions_total",
        "Suggestion requests by outcome (exact, fallback, none)"
    );
    metrics::describe_histogram!(
        "nudge_suggest_latency_us",
        metrics::Unit::Microseconds,
        "Time spent producing a suggestion"
    );
    metrics::describe_counter!(
        "nudge_training_runs_total",
        "Training passes by outcome (published, skipped, busy)"
    );
    metrics::describe_gauge!(
        "nudge_training_rows",
        "Rows that contributed examples to the live model, per sentiment bucket"
    );

    tracing::info!("Metrics exporter initialized");
    Ok(handle)
}

/// Record one suggestion request
pub fn record_suggestion(source: Option<MatchSource>, elapsed: Duration) {
    let outcome = source.map_or("none", MatchSource::as_str);
    metrics::counter!("nudge_suggestions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("nudge_suggest_latency_us").record(elapsed.as_micros() as f64);
}

/// Record one training pass; a published report also updates the row gauges
pub fn record_training(report: Option<&TrainingReport>) {
    let Some(report) = report else {
        metrics::counter!("nudge_training_runs_total", "outcome" => "skipped").increment(1);
        return;
    };

    metrics::counter!("nudge_training_runs_total", "outcome" => "published").increment(1);
    for bucket in SentimentBucket::ALL {
        metrics::gauge!("nudge_training_rows", "bucket" => bucket.as_str())
            .set(report.rows_by_bucket.get(bucket) as f64);
    }
}

/// Record a retrain refused because another pass was running
pub fn record_training_busy() {
    metrics::counter!("nudge_training_runs_total", "outcome" => "busy").increment(1);
}
