//! Structured Text Helpers
//!
//! Text-layer fragments from MuPDF pages.

use mupdf::{Page, TextPageOptions};

use crate::document::{DocumentError, Result};

/// Text of every non-empty line on the page, in reading order
///
/// Lines are the closest MuPDF equivalent of text-content items; callers join
/// them with single spaces.
pub fn line_fragments(page: &Page) -> Result<Vec<String>> {
    let text_page = page
        .to_text_page(TextPageOptions::empty())
        .map_err(DocumentError::text_extraction)?;
    let mut fragments = Vec::new();

    for block in text_page.blocks() {
        for line in block.lines() {
            let mut line_text = String::new();
            for ch in line.chars() {
                if let Some(c) = ch.char() {
                    line_text.push(c);
                }
            }
            if !line_text.is_empty() {
                fragments.push(line_text);
            }
        }
    }

    Ok(fragments)
}
