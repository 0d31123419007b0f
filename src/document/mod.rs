//! Document collaborators
//!
//! Format-agnostic interfaces the extraction pipeline consumes: a loader that
//! turns raw bytes into a page-addressable document, per-page text-layer
//! extraction, and page rasterization.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  load(bytes)   ┌──────────────────┐
//! │  DocumentLoader  │ ─────────────▶ │  LoadedDocument  │
//! └──────────────────┘                │  page_count()    │
//!                                     │  text_fragments()│
//!                                     └──────────────────┘
//! ┌──────────────────┐
//! │  PageRasterizer  │  rasterize(bytes copy, page, options) → RasterImage
//! └──────────────────┘
//! ```
//!
//! The MuPDF-backed implementations live in `formats::pdf`.

mod error;
mod traits;
mod types;

pub use error::{DocumentError, DocumentResult, Result};
pub use traits::{DocumentLoader, LoadedDocument, PageRasterizer};
pub use types::{ImageFormat, RasterImage, RasterOptions, DEFAULT_RASTER_QUALITY, DEFAULT_RASTER_SCALE};
