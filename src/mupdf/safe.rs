//! Thread-safe document wrapper for MuPDF
//!
//! MuPDF documents are not thread-safe. This wrapper:
//!
//! 1. Stores the document bytes behind an `Arc`
//! 2. Opens a fresh document for each operation
//! 3. Uses `parking_lot::Mutex` to serialize access

use std::sync::Arc;

use mupdf::{Document, Page};
use parking_lot::Mutex;

use crate::document::{DocumentError, DocumentResult};

const PDF_MIME: &str = "application/pdf";

/// Thread-safe PDF document wrapper
///
/// The document is opened fresh for each operation to avoid stale state.
pub struct SafeDocument {
    /// Document source bytes
    data: Arc<[u8]>,
    /// Cached page count
    page_count: usize,
    /// Mutex for serializing access
    _lock: Mutex<()>,
}

impl SafeDocument {
    /// Validate the bytes as a PDF and cache its page count
    pub fn from_bytes(data: Arc<[u8]>) -> DocumentResult<Self> {
        if !is_pdf(&data) {
            return Err(DocumentError::UnsupportedFormat(
                "missing %PDF header".into(),
            ));
        }

        let doc = Document::from_bytes(&data, PDF_MIME)
            .map_err(|e| DocumentError::ParseError(e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| DocumentError::ParseError(e.to_string()))?;

        if page_count <= 0 {
            return Err(DocumentError::ParseError("document has no pages".into()));
        }

        Ok(Self {
            data,
            page_count: page_count as usize,
            _lock: Mutex::new(()),
        })
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Execute a closure with access to a freshly opened document
    pub fn with_doc<F, R>(&self, f: F) -> DocumentResult<R>
    where
        F: FnOnce(&Document) -> DocumentResult<R>,
    {
        let _guard = self._lock.lock();
        let doc = Document::from_bytes(&self.data, PDF_MIME)?;
        f(&doc)
    }

    /// Execute a closure with access to page `page` (1-indexed)
    pub fn with_page<F, R>(&self, page: usize, f: F) -> DocumentResult<R>
    where
        F: FnOnce(&Page) -> DocumentResult<R>,
    {
        self.validate_page(page)?;
        self.with_doc(|doc| {
            let loaded = doc.load_page((page - 1) as i32)?;
            f(&loaded)
        })
    }

    fn validate_page(&self, page: usize) -> DocumentResult<()> {
        if page == 0 || page > self.page_count {
            return Err(DocumentError::PageNotFound {
                page,
                page_count: self.page_count,
            });
        }
        Ok(())
    }
}

/// Check for the PDF magic bytes
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && bytes.starts_with(b"%PDF")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(b"%PDF-1.7\n"));
        assert!(!is_pdf(b"PK\x03\x04"));
        assert!(!is_pdf(b"%PD"));
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let result = SafeDocument::from_bytes(Arc::from(&b"definitely not a pdf"[..]));
        assert!(matches!(result, Err(DocumentError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_minimal_pdf_page_count() {
        let doc = SafeDocument::from_bytes(fixtures::minimal_pdf().into()).unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_page_out_of_range() {
        let doc = SafeDocument::from_bytes(fixtures::minimal_pdf().into()).unwrap();
        let result = doc.with_page(2, |_| Ok(()));
        assert!(matches!(
            result,
            Err(DocumentError::PageNotFound { page: 2, page_count: 1 })
        ));
        assert!(doc.with_page(0, |_| Ok(())).is_err());
    }
}
