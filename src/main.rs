//! Folio OCR Server
//!
//! HTTP front end for hybrid text-layer / OCR page extraction.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_ocr::config::Config;
use folio_ocr::document::{DocumentLoader, PageRasterizer};
use folio_ocr::formats::pdf::{PdfLoader, PdfRasterizer};
use folio_ocr::ocr::OcrWorkerPool;
use folio_ocr::pipeline::HybridExtractor;
use folio_ocr::routes;
use folio_ocr::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "folio_ocr=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Starting Folio OCR Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "OCR engine: {} x{} (language: {}, models: {})",
        config.ocr.engine,
        config.ocr.concurrency,
        config.ocr.language,
        config.ocr.model_path.display()
    );

    let pool = Arc::new(OcrWorkerPool::new(config.ocr.engine_factory()));
    let extractor = Arc::new(HybridExtractor::new(
        Arc::new(PdfLoader::new()) as Arc<dyn DocumentLoader>,
        Arc::new(PdfRasterizer::new()) as Arc<dyn PageRasterizer>,
        pool,
        config.extraction.options(),
    ));

    extractor
        .initialize(config.ocr.pool_config())
        .await
        .context("Failed to initialize OCR pool")?;

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid SERVER_HOST '{}'", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);

    let app = routes::app(AppState::new(config, Arc::clone(&extractor)));

    // Start server with graceful shutdown
    tracing::info!("Folio OCR Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    extractor.terminate().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
