//! Low-level MuPDF Wrapper
//!
//! Thread-aware access to MuPDF for the PDF backend.
//!
//! # Thread Safety
//!
//! MuPDF's `fz_context` is **NOT thread-safe**. This module addresses this via:
//!
//! 1. **SafeDocument**: Keeps the source bytes and opens a fresh document per operation
//! 2. **Operation Serialization**: Mutex guard around each operation
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::mupdf::SafeDocument;
//!
//! let doc = SafeDocument::from_bytes(pdf_bytes.into())?;
//! let fragments = doc.with_page(1, |page| stext::line_fragments(page))?;
//! ```

mod safe;
pub mod stext;

pub use safe::SafeDocument;
pub use stext::line_fragments;

#[cfg(test)]
pub(crate) use safe::fixtures;
