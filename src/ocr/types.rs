//! OCR Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// OCR engine backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// Tesseract OCR (local)
    #[default]
    Tesseract,
    /// Ollama vision model (local LLM)
    Ollama,
}

impl FromStr for OcrEngineKind {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tesseract" => Ok(Self::Tesseract),
            "ollama" => Ok(Self::Ollama),
            other => Err(OcrError::EngineNotAvailable(format!(
                "unknown OCR engine '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OcrEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tesseract => f.write_str("tesseract"),
            Self::Ollama => f.write_str("ollama"),
        }
    }
}

/// Page segmentation mode (Tesseract `--psm` numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSegMode {
    /// Fully automatic page segmentation
    Auto,
    /// Single column of text of variable sizes
    SingleColumn,
    /// Single uniform block of text
    SingleBlock,
    /// Single text line
    SingleLine,
    /// As much text as possible, in no particular order
    SparseText,
}

impl PageSegMode {
    pub fn as_psm(&self) -> u8 {
        match self {
            Self::Auto => 3,
            Self::SingleColumn => 4,
            Self::SingleBlock => 6,
            Self::SingleLine => 7,
            Self::SparseText => 11,
        }
    }
}

/// Recognition engine mode (Tesseract `--oem` numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Legacy engine only (fastest)
    Legacy,
    /// Neural net LSTM only
    Lstm,
    /// Legacy + LSTM
    LegacyLstm,
    /// Whatever the installed traineddata supports
    Default,
}

impl EngineMode {
    pub fn as_oem(&self) -> u8 {
        match self {
            Self::Legacy => 0,
            Self::Lstm => 1,
            Self::LegacyLstm => 2,
            Self::Default => 3,
        }
    }
}

/// Per-call recognition settings
///
/// The pipeline uses the default for every page: single text block,
/// legacy (fast) engine, no color inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    pub page_seg_mode: PageSegMode,
    pub engine_mode: EngineMode,
    pub invert: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            page_seg_mode: PageSegMode::SingleBlock,
            engine_mode: EngineMode::Legacy,
            invert: false,
        }
    }
}

impl RecognitionConfig {
    /// Engine variables as a configuration map
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("tessedit_pageseg_mode", self.page_seg_mode.as_psm().to_string()),
            ("tessedit_ocr_engine_mode", self.engine_mode.as_oem().to_string()),
            ("tessedit_do_invert", u8::from(self.invert).to_string()),
        ]
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineNotAvailable(String),

    #[error("OCR engine initialization failed: {0}")]
    InitializationError(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("API error: {0}")]
    ApiError(String),
}
