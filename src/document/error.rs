//! Document error types

use thiserror::Error;

/// Errors raised by document collaborators (parser, text layer, rasterizer)
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Bytes could not be parsed into pages
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Page number outside 1..=page_count
    #[error("Page {page} not found (document has {page_count} pages)")]
    PageNotFound { page: usize, page_count: usize },

    /// Text layer could not be read
    #[error("Text extraction error: {0}")]
    TextExtractionError(String),

    /// Failed to render a page
    #[error("Render error: {0}")]
    RenderError(String),

    /// Image encoding failed
    #[error("Image error: {0}")]
    ImageError(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// MuPDF context error
    #[error("MuPDF context error: {0}")]
    ContextError(String),

    /// Blocking worker failed to complete
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Alias for Result
pub type DocumentResult<T> = Result<T>;

impl DocumentError {
    /// Text layer of a page could not be built
    pub fn text_extraction(err: impl std::fmt::Display) -> Self {
        DocumentError::TextExtractionError(err.to_string())
    }

    /// Page could not be rendered to a pixmap
    pub fn render(err: impl std::fmt::Display) -> Self {
        DocumentError::RenderError(err.to_string())
    }
}

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::ContextError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DocumentError {
    fn from(err: tokio::task::JoinError) -> Self {
        DocumentError::ThreadPoolError(format!("Task join error: {}", err))
    }
}
