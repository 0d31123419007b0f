//! OCR engine seam
//!
//! An engine instance is stateful and expensive to create, so the pool builds
//! a fixed set up front through an `OcrEngineFactory` and hands each one to a
//! single task at a time.

use std::path::PathBuf;

use async_trait::async_trait;

use super::types::{OcrEngineKind, OcrError, RecognitionConfig};
use crate::document::RasterImage;

/// Settings shared by every engine in a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Language configuration (e.g. "lit+eng")
    pub language: String,
    /// Directory holding the language models
    pub model_path: PathBuf,
}

/// A single OCR engine instance
#[async_trait]
pub trait OcrEngine: Send {
    /// Recognize the text in `image`
    async fn recognize(
        &mut self,
        image: &RasterImage,
        config: &RecognitionConfig,
    ) -> Result<String, OcrError>;

    /// Release engine resources. Called once when the pool terminates.
    async fn shutdown(&mut self) -> Result<(), OcrError> {
        Ok(())
    }
}

/// Creates identically configured engine instances
#[async_trait]
pub trait OcrEngineFactory: Send + Sync {
    /// Backend type
    fn kind(&self) -> OcrEngineKind;

    /// Create and initialize one engine
    async fn create(&self, settings: &EngineSettings) -> Result<Box<dyn OcrEngine>, OcrError>;
}
