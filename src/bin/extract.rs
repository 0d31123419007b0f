//! Folio Extract
//!
//! Prints the text of every page of each file or URL given on the command line.
//!
//! ```text
//! folio-extract scan.pdf https://example.com/report.pdf
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_ocr::cli;
use folio_ocr::config::Config;
use folio_ocr::document::{DocumentLoader, PageRasterizer};
use folio_ocr::formats::pdf::{PdfLoader, PdfRasterizer};
use folio_ocr::ocr::OcrWorkerPool;
use folio_ocr::pipeline::HybridExtractor;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "folio_ocr=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let inputs: Vec<String> = std::env::args().skip(1).collect();

    let extractor = HybridExtractor::new(
        Arc::new(PdfLoader::new()) as Arc<dyn DocumentLoader>,
        Arc::new(PdfRasterizer::new()) as Arc<dyn PageRasterizer>,
        Arc::new(OcrWorkerPool::new(config.ocr.engine_factory())),
        config.extraction.options(),
    );

    let code = cli::run(
        &extractor,
        config.ocr.pool_config(),
        &inputs,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await?;
    Ok(ExitCode::from(code))
}
