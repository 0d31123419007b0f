//! Configuration management for Folio OCR

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::document::{ImageFormat, RasterOptions, DEFAULT_RASTER_QUALITY, DEFAULT_RASTER_SCALE};
use crate::ocr::{OcrEngineFactory, OcrEngineKind, OllamaFactory, PoolConfig, RecognitionConfig, TesseractFactory};
use crate::pipeline::{ExtractionOptions, DEFAULT_MIN_TEXT_CHARS};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub engine: OcrEngineKind,
    /// Number of pooled engines
    pub concurrency: usize,
    pub language: String,
    pub model_path: PathBuf,
    pub tesseract_bin: PathBuf,
    pub ollama_url: String,
    pub ollama_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    pub min_text_chars: usize,
    pub raster_scale: f32,
    pub raster_quality: u8,
    pub ocr_on_extraction_failure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_upload_bytes: 100 * 1024 * 1024,
            },
            ocr: OcrConfig {
                engine: OcrEngineKind::Tesseract,
                concurrency: crate::ocr::DEFAULT_CONCURRENCY,
                language: "lit+eng".to_string(),
                model_path: PathBuf::from("./tessdata"),
                tesseract_bin: PathBuf::from("tesseract"),
                ollama_url: "http://localhost:11434".to_string(),
                ollama_model: "llava".to_string(),
            },
            extraction: ExtractionConfig {
                min_text_chars: DEFAULT_MIN_TEXT_CHARS,
                raster_scale: DEFAULT_RASTER_SCALE,
                raster_quality: DEFAULT_RASTER_QUALITY,
                ocr_on_extraction_failure: false,
            },
        }
    }
}

impl Config {
    /// Read the configuration from the process environment
    ///
    /// Unset variables take their defaults; malformed ones are logged and
    /// replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Config::default();
        let var = |key: &str, default: String| lookup(key).unwrap_or(default);

        Config {
            server: ServerConfig {
                host: var("SERVER_HOST", d.server.host),
                port: parse_or(&lookup, "SERVER_PORT", d.server.port),
                max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", d.server.max_upload_bytes),
            },
            ocr: OcrConfig {
                engine: parse_or(&lookup, "OCR_ENGINE", d.ocr.engine),
                concurrency: parse_or(&lookup, "OCR_CONCURRENCY", d.ocr.concurrency),
                language: var("OCR_LANGUAGE", d.ocr.language),
                model_path: lookup("OCR_MODEL_PATH").map(PathBuf::from).unwrap_or(d.ocr.model_path),
                tesseract_bin: lookup("TESSERACT_BIN").map(PathBuf::from).unwrap_or(d.ocr.tesseract_bin),
                ollama_url: var("OLLAMA_URL", d.ocr.ollama_url),
                ollama_model: var("OLLAMA_MODEL", d.ocr.ollama_model),
            },
            extraction: ExtractionConfig {
                min_text_chars: parse_or(&lookup, "MIN_TEXT_CHARS", d.extraction.min_text_chars),
                raster_scale: parse_or(&lookup, "RASTER_SCALE", d.extraction.raster_scale),
                raster_quality: parse_or(&lookup, "RASTER_QUALITY", d.extraction.raster_quality),
                ocr_on_extraction_failure: lookup("OCR_ON_EXTRACTION_FAILURE")
                    .map(|raw| parse_flag("OCR_ON_EXTRACTION_FAILURE", &raw, d.extraction.ocr_on_extraction_failure))
                    .unwrap_or(d.extraction.ocr_on_extraction_failure),
            },
        }
    }
}

impl OcrConfig {
    /// Engine factory for the configured backend
    pub fn engine_factory(&self) -> Arc<dyn OcrEngineFactory> {
        match self.engine {
            OcrEngineKind::Tesseract => Arc::new(TesseractFactory::new(&self.tesseract_bin)),
            OcrEngineKind::Ollama => Arc::new(OllamaFactory::new(&self.ollama_url, &self.ollama_model)),
        }
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.concurrency, &self.language, &self.model_path)
    }
}

impl ExtractionConfig {
    pub fn options(&self) -> ExtractionOptions {
        ExtractionOptions {
            min_text_chars: self.min_text_chars,
            raster: RasterOptions {
                scale: self.raster_scale,
                quality: self.raster_quality,
                format: ImageFormat::Png,
            },
            recognition: RecognitionConfig::default(),
            ocr_on_extraction_failure: self.ocr_on_extraction_failure,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {}='{}' ({}), using default {}", key, raw, e, default);
            default
        }),
    }
}

fn parse_flag(key: &str, raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!("Invalid {}='{}', using default {}", key, raw, default);
            default
        }
    }
}
