//! `folio-extract` command driver
//!
//! Kept in the library so the binary is only argument and logging setup.

use std::io::Write;
use std::time::Instant;

use anyhow::Context;

use crate::ocr::PoolConfig;
use crate::pipeline::HybridExtractor;
use crate::source;

pub const USAGE: &str = "Usage: folio-extract <file|url>...";

/// Exit code when no inputs were given
pub const EXIT_USAGE: u8 = 1;

/// Exit code when at least one input failed
pub const EXIT_FAILED: u8 = 2;

/// Initialize the pool, extract every input, terminate the pool
///
/// Returns the process exit code. Fails only if the pool cannot be
/// initialized.
pub async fn run<W: Write, E: Write>(
    extractor: &HybridExtractor,
    pool_config: PoolConfig,
    inputs: &[String],
    out: &mut W,
    err: &mut E,
) -> anyhow::Result<u8> {
    if inputs.is_empty() {
        writeln!(err, "{}", USAGE)?;
        return Ok(EXIT_USAGE);
    }

    extractor
        .initialize(pool_config)
        .await
        .context("Failed to initialize OCR pool")?;

    let failures = extract_all(extractor, inputs, out).await;
    extractor.terminate().await;

    Ok(if failures == 0 { 0 } else { EXIT_FAILED })
}

/// Print the pages of each input in turn; returns the number of failed inputs
pub async fn extract_all<W: Write>(extractor: &HybridExtractor, inputs: &[String], out: &mut W) -> usize {
    let mut failures = 0;
    for input in inputs {
        if let Err(e) = extract_one(extractor, input, out).await {
            failures += 1;
            tracing::error!("Error processing {}: {:#}", input, e);
        }
    }
    failures
}

async fn extract_one<W: Write>(extractor: &HybridExtractor, input: &str, out: &mut W) -> anyhow::Result<()> {
    tracing::info!("Processing file: {}", input);
    let started = Instant::now();

    let data = source::read_document(input).await?;
    let document = extractor.process(data).await?;

    for page in &document.pages {
        writeln!(out, "--- Page {} ---", page.index)?;
        writeln!(out, "{}", page.text)?;
    }
    writeln!(out, "Processing completed in {} ms", started.elapsed().as_millis())?;
    Ok(())
}
