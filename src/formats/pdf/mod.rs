//! PDF backend
//!
//! MuPDF-backed implementations of the document collaborator traits.

mod loader;
mod rasterizer;

pub use loader::{PdfDocument, PdfLoader};
pub use rasterizer::PdfRasterizer;
