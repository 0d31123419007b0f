//! Pipeline error types

use thiserror::Error;

use crate::document::DocumentError;
use crate::ocr::{OcrError, PoolError};

/// Errors that abort a whole `process` call
#[derive(Debug, Error)]
pub enum ProcessError {
    /// `process` was called before `initialize` (or after `terminate`)
    #[error("OCR pool is not initialized; call initialize() first")]
    PoolNotInitialized,

    /// The bytes could not be parsed into pages
    #[error("Failed to parse document: {0}")]
    DocumentParse(#[source] DocumentError),
}

impl From<PoolError> for ProcessError {
    fn from(_: PoolError) -> Self {
        ProcessError::PoolNotInitialized
    }
}

/// Failures contained to a single page
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Failed to extract text from page {page}: {source}")]
    Extraction {
        page: usize,
        #[source]
        source: DocumentError,
    },

    #[error("Failed to rasterize page {page}: {source}")]
    Rasterization {
        page: usize,
        #[source]
        source: DocumentError,
    },

    #[error("Failed OCR on page {page}: {source}")]
    Recognition {
        page: usize,
        #[source]
        source: OcrError,
    },

    #[error("OCR task for page {page} panicked")]
    Panicked { page: usize },
}

impl PageError {
    /// Page number (1-indexed) the failure belongs to
    pub fn page(&self) -> usize {
        match self {
            Self::Extraction { page, .. }
            | Self::Rasterization { page, .. }
            | Self::Recognition { page, .. }
            | Self::Panicked { page } => *page,
        }
    }
}
