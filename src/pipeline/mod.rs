//! Hybrid extraction pipeline
//!
//! Turns a document into one text entry per page:
//!
//! ```text
//!  bytes ──load──▶ LoadedDocument
//!                      │
//!   Phase 1 (sequential, page order)
//!                      │ text_fragments(page) → join → trim
//!                      ├── len >= min_text_chars ──▶ PageResults[page] = extracted
//!                      └── otherwise ─────────────▶ OCR queue (ascending)
//!                                                        │
//!   Phase 2 (at most N tasks in flight, N = pool size)   │
//!          rasterize(copy of bytes) → acquire engine → recognize → release
//!                                                        │
//!                                      PageResults[page] = ocr | empty
//!                      │
//!                      ▼
//!             Vec<PageResult> in page order
//! ```
//!
//! Only a missing pool or unparseable bytes fail `process`. Every per-page
//! failure is logged and the page comes back empty.

mod assembler;
mod error;
mod extraction;
mod extractor;
mod policy;
mod scheduler;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use assembler::PageResults;
pub use error::{PageError, ProcessError};
pub use extraction::{extract_text_layer, TextLayerPass};
pub use extractor::HybridExtractor;
pub use policy::{join_fragments, text_len, TextSufficiency, DEFAULT_MIN_TEXT_CHARS};
pub use scheduler::{run_ocr_queue, OcrTaskContext, SchedulerStats};
pub use types::{ExtractedDocument, ExtractionOptions, PageOrigin, PageResult};
