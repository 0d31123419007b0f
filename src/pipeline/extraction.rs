//! Text-layer phase
//!
//! Walks the pages in order, keeps sufficient text layers and queues the rest
//! for OCR.

use std::time::Instant;

use super::assembler::PageResults;
use super::error::PageError;
use super::policy::{join_fragments, text_len, TextSufficiency};
use super::types::PageResult;
use crate::document::LoadedDocument;

/// Outcome of the text-layer phase
#[derive(Debug)]
pub struct TextLayerPass {
    /// Slots filled so far (extracted pages, plus empty pages when failures
    /// are not routed to OCR)
    pub results: PageResults,
    /// Pages needing OCR, ascending
    pub ocr_queue: Vec<usize>,
}

/// Run text extraction over every page, sequentially
///
/// A failed extraction never aborts the document: the page is either queued
/// for OCR (`ocr_on_failure`) or recorded as empty.
pub async fn extract_text_layer(
    document: &dyn LoadedDocument,
    policy: &TextSufficiency,
    ocr_on_failure: bool,
) -> TextLayerPass {
    let started = Instant::now();
    let page_count = document.page_count();
    let mut results = PageResults::new(page_count);
    let mut ocr_queue = Vec::new();

    for page in 1..=page_count {
        match document.text_fragments(page).await {
            Ok(fragments) => {
                let text = join_fragments(&fragments);
                if policy.is_sufficient(&text) {
                    tracing::debug!("Page {}: text layer accepted (length {})", page, text_len(&text));
                    results.record(PageResult::extracted(page, text));
                } else {
                    tracing::debug!(
                        "Page {}: text layer too short ({} < {}), queued for OCR",
                        page,
                        text_len(&text),
                        policy.min_chars()
                    );
                    ocr_queue.push(page);
                }
            }
            Err(source) => {
                let err = PageError::Extraction { page, source };
                if ocr_on_failure {
                    tracing::warn!("{}, queued for OCR", err);
                    ocr_queue.push(page);
                } else {
                    tracing::warn!("{}", err);
                    results.record(PageResult::empty(page));
                }
            }
        }
    }

    tracing::debug!(
        "Text layer pass: {} pages in {:?}, {} need OCR",
        page_count,
        started.elapsed(),
        ocr_queue.len()
    );

    TextLayerPass { results, ocr_queue }
}
