use anyhow::Result;
use clap::Parser;
use nudge_core::Tokenizer;
use nudge_model::{ModelHandle, Predictor, Trainer};
use nudge_server::cli::{Cli, Commands, ServeArgs, SuggestArgs};
use nudge_server::{create_router, telemetry, AppState, ServerConfig};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Suggest(args) => suggest(args),
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    telemetry::init_tracing(args.verbose);

    info!("Starting Nudge server");

    let config = ServerConfig::from_args(&args)?;
    info!("Configuration loaded successfully");
    info!("Corpus: {}", config.model.corpus_path.display());
    info!("Fallback cap: {}", config.model.predictor.fallback_cap());

    let metrics_handle = telemetry::init_metrics()?;
    let addr = config.socket_addr()?;

    let state = AppState::new(config, metrics_handle)?;
    if state.train().await?.is_none() {
        warn!("Model is empty; suggestions will be unavailable until a retrain succeeds");
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn suggest(args: SuggestArgs) -> Result<()> {
    telemetry::init_tracing(args.verbose);

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(corpus) = &args.corpus {
        config.model.corpus_path = corpus.clone();
    }
    let model = config.model;

    let trainer = Trainer::new(Tokenizer::new()?);
    let handle = Arc::new(ModelHandle::new(trainer, model.columns()));
    if handle.train_from_path(&model.corpus_path).is_none() {
        warn!("Could not train from {}", model.corpus_path.display());
    }

    let predictor = Predictor::new(handle, model.predictor);
    match predictor.suggest(&args.text(), args.signal) {
        Some(token) => println!("{}", token),
        None => println!("(no suggestion)"),
    }
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
