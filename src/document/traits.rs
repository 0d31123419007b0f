//! Document traits
//!
//! Seams between the pipeline and the document-format backend.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::Result;
use super::types::{RasterImage, RasterOptions};

/// Parses raw bytes into a page-addressable document
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Parse the bytes. Fails with `DocumentError::ParseError` (or
    /// `UnsupportedFormat`) when the bytes are not a valid document.
    async fn load(&self, data: Arc<[u8]>) -> Result<Box<dyn LoadedDocument>>;
}

/// A parsed document, owned by a single `process` call
#[async_trait]
pub trait LoadedDocument: Send + Sync {
    /// Number of pages (always >= 1 for a successfully loaded document)
    fn page_count(&self) -> usize;

    /// Text fragments of the embedded text layer for `page` (1-indexed)
    async fn text_fragments(&self, page: usize) -> Result<Vec<String>>;
}

/// Renders a single page to an image
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Rasterize `page` (1-indexed).
    ///
    /// `data` is an independent copy of the document bytes; implementations
    /// are free to consume or mutate it.
    async fn rasterize(
        &self,
        data: Vec<u8>,
        page: usize,
        options: &RasterOptions,
    ) -> Result<RasterImage>;
}
