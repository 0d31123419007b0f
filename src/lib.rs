//! Folio OCR Library
//!
//! Per-page text extraction that reads a document's embedded text layer and
//! falls back to pooled OCR for pages where that layer is missing or too thin.
//!
//! # Modules
//!
//! - `document`: Format-agnostic collaborator traits and raster types
//! - `formats`: MuPDF-backed PDF loader and rasterizer
//! - `ocr`: OCR engines and the fixed-size engine pool
//! - `pipeline`: Text-layer phase, bounded OCR scheduler, result assembly
//! - `source`: Reading document bytes from disk or HTTP
//! - `cli`: Driver behind the `folio-extract` binary
//! - `routes`, `state`, `error`, `config`: HTTP server shell

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod formats;
pub mod ocr;
pub mod pipeline;
pub mod routes;
pub mod source;
pub mod state;

// MuPDF wrapper used by formats::pdf
mod mupdf;

pub use pipeline::{ExtractedDocument, HybridExtractor, PageOrigin, PageResult, ProcessError};
