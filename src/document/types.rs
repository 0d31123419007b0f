//! Raster types shared by rasterizers and OCR engines

use serde::{Deserialize, Serialize};

/// Default render scale for OCR input
pub const DEFAULT_RASTER_SCALE: f32 = 2.0;

/// Default encoder quality (0-100)
pub const DEFAULT_RASTER_QUALITY: u8 = 100;

/// Image output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// Rasterization settings for OCR input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterOptions {
    /// Scale factor relative to the page's native size
    pub scale: f32,
    /// Encoder quality (0-100). Only lossy formats use it.
    pub quality: u8,
    /// Output format
    pub format: ImageFormat,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_RASTER_SCALE,
            quality: DEFAULT_RASTER_QUALITY,
            format: ImageFormat::Png,
        }
    }
}

/// Rendered page image
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Encoded image bytes
    pub data: Vec<u8>,
    /// Encoding of `data`
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl RasterImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}
