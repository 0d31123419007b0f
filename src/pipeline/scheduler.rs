//! Bounded OCR scheduler
//!
//! Fans the OCR queue out as tasks on a `JoinSet`, keeping at most
//! `pool.size()` of them in flight. Every task is joined before the batch
//! returns, so none outlives the `process` call.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinSet;

use super::assembler::PageResults;
use super::error::PageError;
use super::types::PageResult;
use crate::document::{PageRasterizer, RasterOptions};
use crate::ocr::{OcrError, ReadyPool, RecognitionConfig};

/// Everything an OCR task needs, shared by all tasks of one batch
pub struct OcrTaskContext {
    pub pool: Arc<ReadyPool>,
    pub rasterizer: Arc<dyn PageRasterizer>,
    /// Source document bytes; each task rasterizes from its own copy
    pub data: Arc<[u8]>,
    pub raster: RasterOptions,
    pub recognition: RecognitionConfig,
}

/// Counters from one scheduler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub launched: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Highest number of tasks in flight at once
    pub peak_running: usize,
}

/// Cursor into the queue plus in-flight count
#[derive(Debug, Default)]
struct SchedulerState {
    running: usize,
    cursor: usize,
}

impl SchedulerState {
    fn can_launch(&self, limit: usize, queue_len: usize) -> bool {
        self.running < limit && self.cursor < queue_len
    }

    fn is_done(&self, queue_len: usize) -> bool {
        self.cursor == queue_len && self.running == 0
    }
}

/// OCR every queued page and record the outcome in `results`
///
/// A task's failure (rasterization, recognition, even a panic) only empties
/// its own page.
pub async fn run_ocr_queue(
    queue: &[usize],
    ctx: OcrTaskContext,
    results: &mut PageResults,
) -> SchedulerStats {
    let limit = ctx.pool.size().max(1);
    let ctx = Arc::new(ctx);
    let mut state = SchedulerState::default();
    let mut stats = SchedulerStats::default();
    let mut in_flight = JoinSet::new();

    loop {
        while state.can_launch(limit, queue.len()) {
            let page = queue[state.cursor];
            state.cursor += 1;
            state.running += 1;
            stats.launched += 1;
            stats.peak_running = stats.peak_running.max(state.running);

            let ctx = Arc::clone(&ctx);
            in_flight.spawn(async move {
                let result = match AssertUnwindSafe(ocr_page(&ctx, page)).catch_unwind().await {
                    Ok(result) => result,
                    Err(_) => Err(PageError::Panicked { page }),
                };
                result.map(|text| (page, text)).map_err(|e| (page, e))
            });
        }

        let Some(joined) = in_flight.join_next().await else {
            break;
        };
        state.running -= 1;

        match joined {
            Ok(Ok((page, text))) => {
                stats.succeeded += 1;
                tracing::debug!("Page {}: OCR complete ({} chars)", page, text.chars().count());
                results.record(PageResult::ocr(page, &text));
            }
            Ok(Err((page, err))) => {
                stats.failed += 1;
                tracing::warn!("{}", err);
                results.record(PageResult::empty(page));
            }
            Err(join_err) => {
                // The page's slot stays unrecorded and finishes as empty
                stats.failed += 1;
                tracing::warn!("OCR task did not complete: {}", join_err);
            }
        }
    }

    debug_assert!(state.is_done(queue.len()));
    stats
}

/// Rasterize one page and recognize it with a checked-out engine
async fn ocr_page(ctx: &OcrTaskContext, page: usize) -> Result<String, PageError> {
    let image = ctx
        .rasterizer
        .rasterize(ctx.data.to_vec(), page, &ctx.raster)
        .await
        .map_err(|source| PageError::Rasterization { page, source })?;

    // Released back to the pool when dropped, on every path out of here
    let mut engine = ctx.pool.acquire().await.map_err(|e| PageError::Recognition {
        page,
        source: OcrError::EngineNotAvailable(e.to_string()),
    })?;
    tracing::debug!("Page {}: recognizing on engine {}", page, engine.id());

    engine
        .recognize(&image, &ctx.recognition)
        .await
        .map_err(|source| PageError::Recognition { page, source })
}
