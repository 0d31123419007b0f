//! Pipeline types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::policy::{TextSufficiency, DEFAULT_MIN_TEXT_CHARS};
use crate::document::RasterOptions;
use crate::ocr::RecognitionConfig;

/// Where a page's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrigin {
    /// Embedded text layer
    Extracted,
    /// OCR of the rendered page
    Ocr,
    /// Fallback after a per-page failure
    Empty,
}

/// Final text for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Page number (1-indexed)
    #[serde(rename = "page")]
    pub index: usize,
    pub text: String,
    pub origin: PageOrigin,
}

impl PageResult {
    pub fn extracted(index: usize, text: String) -> Self {
        Self {
            index,
            text,
            origin: PageOrigin::Extracted,
        }
    }

    /// OCR output is trimmed before it is stored
    pub fn ocr(index: usize, text: &str) -> Self {
        Self {
            index,
            text: text.trim().to_string(),
            origin: PageOrigin::Ocr,
        }
    }

    pub fn empty(index: usize) -> Self {
        Self {
            index,
            text: String::new(),
            origin: PageOrigin::Empty,
        }
    }
}

/// Tunables for a `HybridExtractor`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    /// Trimmed text-layer length at which OCR is skipped
    pub min_text_chars: usize,
    /// Rendering of pages sent to OCR
    pub raster: RasterOptions,
    /// Engine settings for every recognition call
    pub recognition: RecognitionConfig,
    /// Queue pages whose text extraction fails for OCR instead of leaving
    /// them empty. Off by default.
    pub ocr_on_extraction_failure: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            raster: RasterOptions::default(),
            recognition: RecognitionConfig::default(),
            ocr_on_extraction_failure: false,
        }
    }
}

impl ExtractionOptions {
    pub fn sufficiency(&self) -> TextSufficiency {
        TextSufficiency::new(self.min_text_chars)
    }
}

/// Output of `HybridExtractor::process`
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// One entry per page, in page order
    pub pages: Vec<PageResult>,
    /// Pages that were sent to OCR, in the order they were queued
    pub ocr_pages: Vec<usize>,
    pub elapsed: Duration,
}

impl ExtractedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page texts in page order
    pub fn texts(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.text.as_str()).collect()
    }

    pub fn into_texts(self) -> Vec<String> {
        self.pages.into_iter().map(|p| p.text).collect()
    }

    /// Number of pages with the given origin
    pub fn count_origin(&self, origin: PageOrigin) -> usize {
        self.pages.iter().filter(|p| p.origin == origin).count()
    }
}
