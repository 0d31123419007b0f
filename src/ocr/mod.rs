//! OCR Module
//!
//! Pooled OCR engines for pages without a usable text layer.
//!
//! Supports multiple backends:
//! - Tesseract (local CLI, requires installation plus traineddata)
//! - Ollama vision models (local LLM)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_ocr::ocr::{OcrWorkerPool, PoolConfig, TesseractFactory};
//!
//! let pool = OcrWorkerPool::new(Arc::new(TesseractFactory::default()));
//! pool.initialize(PoolConfig::new(4, "lit+eng", "./tessdata")).await?;
//!
//! let ready = pool.ready()?;
//! let mut engine = ready.acquire().await?;
//! let text = engine.recognize(&image, &RecognitionConfig::default()).await?;
//! drop(engine); // back to the pool
//!
//! pool.terminate().await;
//! ```

mod engine;
mod ollama;
mod pool;
mod tesseract;
mod types;

pub use engine::{EngineSettings, OcrEngine, OcrEngineFactory};
pub use ollama::{OllamaEngine, OllamaFactory};
pub use pool::{OcrWorkerPool, DEFAULT_CONCURRENCY, PoolConfig, PoolError, PoolLifecycle, PoolStats, PooledEngine, ReadyPool};
pub use tesseract::{TesseractEngine, TesseractFactory};
pub use types::{EngineMode, OcrEngineKind, OcrError, PageSegMode, RecognitionConfig};
