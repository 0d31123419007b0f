//! Hybrid extractor
//!
//! Entry point tying the document backend, the OCR pool and the two phases
//! together.

use std::sync::Arc;
use std::time::Instant;

use super::error::ProcessError;
use super::extraction::{extract_text_layer, TextLayerPass};
use super::scheduler::{run_ocr_queue, OcrTaskContext};
use super::types::{ExtractedDocument, ExtractionOptions, PageOrigin};
use crate::document::{DocumentLoader, PageRasterizer};
use crate::ocr::{OcrWorkerPool, PoolConfig, PoolError, PoolStats};

/// Text-layer-first page extractor with pooled OCR fallback
///
/// The pool is injected so that one pool can serve many extractors (or many
/// `process` calls) and tests can run independent pools side by side.
pub struct HybridExtractor {
    loader: Arc<dyn DocumentLoader>,
    rasterizer: Arc<dyn PageRasterizer>,
    pool: Arc<OcrWorkerPool>,
    options: ExtractionOptions,
}

impl HybridExtractor {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        rasterizer: Arc<dyn PageRasterizer>,
        pool: Arc<OcrWorkerPool>,
        options: ExtractionOptions,
    ) -> Self {
        Self {
            loader,
            rasterizer,
            pool,
            options,
        }
    }

    /// Create the pool's engines. Must succeed before the first `process`.
    pub async fn initialize(&self, config: PoolConfig) -> Result<(), PoolError> {
        self.pool.initialize(config).await
    }

    /// Release the pool's engines. `process` fails until re-initialized.
    pub async fn terminate(&self) {
        self.pool.terminate().await
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Extract one text entry per page, in page order
    ///
    /// Fails only with `PoolNotInitialized` (before any work) or
    /// `DocumentParse`; every other failure is contained to its page.
    pub async fn process(&self, data: impl Into<Arc<[u8]>>) -> Result<ExtractedDocument, ProcessError> {
        let started = Instant::now();
        let pool = self.pool.ready()?;

        let data: Arc<[u8]> = data.into();
        let document = self
            .loader
            .load(Arc::clone(&data))
            .await
            .map_err(ProcessError::DocumentParse)?;
        let page_count = document.page_count();

        tracing::info!("Processing document: {} pages, {} bytes", page_count, data.len());

        let TextLayerPass {
            mut results,
            ocr_queue,
        } = extract_text_layer(
            document.as_ref(),
            &self.options.sufficiency(),
            self.options.ocr_on_extraction_failure,
        )
        .await;

        if !ocr_queue.is_empty() {
            tracing::info!(
                "Running OCR on {} of {} pages with {} engines: {:?}",
                ocr_queue.len(),
                page_count,
                pool.size(),
                ocr_queue
            );

            let ctx = OcrTaskContext {
                pool,
                rasterizer: Arc::clone(&self.rasterizer),
                data,
                raster: self.options.raster,
                recognition: self.options.recognition,
            };
            let stats = run_ocr_queue(&ocr_queue, ctx, &mut results).await;

            tracing::debug!(
                "OCR batch: {} launched, {} succeeded, {} failed, peak {} in flight",
                stats.launched,
                stats.succeeded,
                stats.failed,
                stats.peak_running
            );
        }

        let extracted = ExtractedDocument {
            pages: results.finish(),
            ocr_pages: ocr_queue,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Processed {} pages in {:?} ({} extracted, {} ocr, {} empty)",
            extracted.page_count(),
            extracted.elapsed,
            extracted.count_origin(PageOrigin::Extracted),
            extracted.count_origin(PageOrigin::Ocr),
            extracted.count_origin(PageOrigin::Empty)
        );

        Ok(extracted)
    }
}
