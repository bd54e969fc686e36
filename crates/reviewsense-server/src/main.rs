//! ReviewSense
//!
//! Sentiment analysis API for customer reviews.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{info, warn};

use reviewsense_server::cli::{Cli, Commands, ModelArgs, ServeArgs};
use reviewsense_server::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Serve(args)) => serve(&cli.config, &args).await,
        Some(Commands::DownloadModel(args)) => download_model(&cli.config, &args).await,
        None => serve(&cli.config, &ServeArgs::default()).await,
    }
}

async fn serve(config_path: &str, args: &ServeArgs) -> Result<()> {
    info!("Starting ReviewSense API");

    let config = ServerConfig::load(config_path, args)?;
    info!("Configuration loaded successfully");
    info!("Classifier: {}", config.classifier.model_id());
    info!("Word limit: {}", config.max_words);

    let metrics_handle = init_metrics()?;

    // Loads the model once; every request shares it
    info!("Initializing application state...");
    let state = AppState::new(config, Some(metrics_handle)).await?;
    info!("Application state initialized successfully");

    let addr = state.config.listen_addr()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(feature = "ml-models")]
async fn download_model(config_path: &str, args: &ModelArgs) -> Result<()> {
    use reviewsense_classifiers::{Classifier, ClassifierBackend, DistilBertSentimentClassifier};

    let mut config = ServerConfig::from_file(config_path)?;
    config.apply_model_args(args);

    let mut settings = config.classifier;
    settings.backend = ClassifierBackend::Distilbert;
    info!("Downloading model {}", settings.model_id());

    let classifier = tokio::task::spawn_blocking(move || {
        DistilBertSentimentClassifier::load(&settings)
    })
    .await??;

    let sample = "This product is perfect.";
    let result = classifier.classify(sample).await?;
    info!(
        label = %result.label,
        score = result.score,
        all_scores = ?result.metadata.all_scores,
        "Model ready, smoke test on {:?}",
        sample
    );

    Ok(())
}

#[cfg(not(feature = "ml-models"))]
async fn download_model(_config_path: &str, _args: &ModelArgs) -> Result<()> {
    anyhow::bail!("model download requires the `ml-models` feature")
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("reviewsense=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reviewsense=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "reviewsense_requests_total",
        "Total number of analysis requests by endpoint"
    );
    metrics::describe_counter!(
        "reviewsense_reviews_total",
        "Total number of reviews that reached classification"
    );
    metrics::describe_counter!(
        "reviewsense_truncated_total",
        "Reviews shortened to the word limit"
    );
    metrics::describe_counter!(
        "reviewsense_rejections_total",
        "Reviews rejected by the length policy, by gate"
    );
    metrics::describe_histogram!(
        "reviewsense_inference_latency_us",
        metrics::Unit::Microseconds,
        "Classifier inference latency in microseconds"
    );
    metrics::describe_counter!("reviewsense_errors_total", "Total number of errors by type");

    info!("Metrics exporter initialized");
    Ok(handle)
}
