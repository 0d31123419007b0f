//! Tesseract OCR engine
//!
//! Drives the `tesseract` command-line tool. Each engine owns its own scratch
//! file names, so pooled engines never share temporary state.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::engine::{EngineSettings, OcrEngine, OcrEngineFactory};
use super::types::{OcrEngineKind, OcrError, RecognitionConfig};
use crate::document::RasterImage;

/// Creates Tesseract engines after checking the binary and model directory
#[derive(Debug, Clone)]
pub struct TesseractFactory {
    binary: PathBuf,
}

impl TesseractFactory {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for TesseractFactory {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl OcrEngineFactory for TesseractFactory {
    fn kind(&self) -> OcrEngineKind {
        OcrEngineKind::Tesseract
    }

    async fn create(&self, settings: &EngineSettings) -> Result<Box<dyn OcrEngine>, OcrError> {
        let version = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map_err(|e| {
                OcrError::EngineNotAvailable(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;
        if !version.status.success() {
            return Err(OcrError::EngineNotAvailable(format!(
                "{} --version exited with {}",
                self.binary.display(),
                version.status
            )));
        }

        let is_dir = tokio::fs::metadata(&settings.model_path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(OcrError::InitializationError(format!(
                "model directory {} does not exist",
                settings.model_path.display()
            )));
        }

        Ok(Box::new(TesseractEngine {
            binary: self.binary.clone(),
            language: settings.language.clone(),
            model_path: settings.model_path.clone(),
            scratch_dir: std::env::temp_dir(),
        }))
    }
}

/// One Tesseract engine instance
#[derive(Debug)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
    model_path: PathBuf,
    scratch_dir: PathBuf,
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(
        &mut self,
        image: &RasterImage,
        config: &RecognitionConfig,
    ) -> Result<String, OcrError> {
        let input_path = self.scratch_dir.join(format!(
            "ocr_input_{}.{}",
            uuid::Uuid::new_v4(),
            image.format.extension()
        ));

        tokio::fs::write(&input_path, &image.data)
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

        let output = Command::new(&self.binary)
            .args(recognition_args(
                &input_path,
                &self.language,
                &self.model_path,
                config,
            ))
            .output()
            .await;

        // Clean up input file
        let _ = tokio::fs::remove_file(&input_path).await;

        let output = output
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Command-line arguments for one recognition call, writing text to stdout
fn recognition_args(
    input: &Path,
    language: &str,
    model_path: &Path,
    config: &RecognitionConfig,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        input.into(),
        "stdout".into(),
        "--tessdata-dir".into(),
        model_path.into(),
        "-l".into(),
        language.into(),
        "--psm".into(),
        config.page_seg_mode.as_psm().to_string().into(),
        "--oem".into(),
        config.engine_mode.as_oem().to_string().into(),
    ];
    args.push("-c".into());
    args.push(format!("tessedit_do_invert={}", u8::from(config.invert)).into());
    args
}
