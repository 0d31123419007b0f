//! PDF DocumentLoader implementation

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::{DocumentLoader, DocumentResult, LoadedDocument};
use crate::mupdf::{line_fragments, SafeDocument};

/// Parses PDF bytes with MuPDF
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load(&self, data: Arc<[u8]>) -> DocumentResult<Box<dyn LoadedDocument>> {
        let doc = tokio::task::spawn_blocking(move || SafeDocument::from_bytes(data)).await??;
        Ok(Box::new(PdfDocument { doc: Arc::new(doc) }))
    }
}

/// Parsed PDF with text-layer access
pub struct PdfDocument {
    doc: Arc<SafeDocument>,
}

#[async_trait]
impl LoadedDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    async fn text_fragments(&self, page: usize) -> DocumentResult<Vec<String>> {
        let doc = Arc::clone(&self.doc);
        tokio::task::spawn_blocking(move || doc.with_page(page, line_fragments)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentError;
    use crate::mupdf::fixtures::minimal_pdf;

    #[tokio::test]
    async fn test_load_minimal_pdf() {
        let doc = PdfLoader::new().load(minimal_pdf().into()).await.unwrap();
        assert_eq!(doc.page_count(), 1);

        let fragments = doc.text_fragments(1).await.unwrap();
        assert!(fragments.is_empty());
    }

    #[tokio::test]
    async fn test_load_rejects_garbage() {
        let result = PdfLoader::new().load(Arc::from(&b"hello world"[..])).await;
        assert!(matches!(result, Err(DocumentError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_text_fragments_out_of_range() {
        let doc = PdfLoader::new().load(minimal_pdf().into()).await.unwrap();
        assert!(matches!(
            doc.text_fragments(5).await,
            Err(DocumentError::PageNotFound { .. })
        ));
    }
}
