//! Text sufficiency policy
//!
//! Decides whether a page's text layer is good enough to skip OCR.

/// Minimum trimmed text length (in UTF-16 code units) for a text layer to count
pub const DEFAULT_MIN_TEXT_CHARS: usize = 32;

/// Threshold check applied to each page's joined, trimmed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSufficiency {
    min_chars: usize,
}

impl TextSufficiency {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    pub fn is_sufficient(&self, text: &str) -> bool {
        text_len(text) >= self.min_chars
    }
}

impl Default for TextSufficiency {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TEXT_CHARS)
    }
}

/// Length of `text` in UTF-16 code units
///
/// Characters outside the Basic Multilingual Plane (most emoji) count as two,
/// so the threshold agrees with JavaScript `String.length` based tooling.
pub fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Join text fragments with single spaces and trim the result
pub fn join_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (i, fragment) in fragments.into_iter().enumerate() {
        if i > 0 {
            joined.push(' ');
        }
        joined.push_str(fragment.as_ref());
    }
    joined.trim().to_string()
}
