//! PDF PageRasterizer implementation
//!
//! Renders pages with MuPDF and encodes them with the `image` crate.

use std::io::Cursor;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use mupdf::{Colorspace, Matrix, Pixmap};

use crate::document::{
    DocumentError, DocumentResult, ImageFormat, PageRasterizer, RasterImage, RasterOptions,
};
use crate::mupdf::SafeDocument;

/// Rasterizes PDF pages for OCR
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRasterizer;

impl PdfRasterizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PageRasterizer for PdfRasterizer {
    async fn rasterize(
        &self,
        data: Vec<u8>,
        page: usize,
        options: &RasterOptions,
    ) -> DocumentResult<RasterImage> {
        let options = *options;

        tokio::task::spawn_blocking(move || {
            let doc = SafeDocument::from_bytes(data.into())?;
            doc.with_page(page, |mupdf_page| {
                // Clamp scale to prevent runaway allocations (0.1 to 4.0)
                let scale = options.scale.clamp(0.1, 4.0);
                let matrix = Matrix::new_scale(scale, scale);

                // OCR input needs no alpha channel
                let colorspace = Colorspace::device_rgb();
                let pixmap = mupdf_page
                    .to_pixmap(&matrix, &colorspace, false, true)
                    .map_err(DocumentError::render)?;

                encode_pixmap(&pixmap, options.format, options.quality)
            })
        })
        .await?
    }
}

/// Encode a MuPDF pixmap to image bytes
fn encode_pixmap(pixmap: &Pixmap, format: ImageFormat, quality: u8) -> DocumentResult<RasterImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize; // components per pixel

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for pixel in 0..(width as usize * height as usize) {
        let offset = pixel * n;
        let r = samples.get(offset).copied().unwrap_or(255);
        let g = samples.get(offset + 1).copied().unwrap_or(r);
        let b = samples.get(offset + 2).copied().unwrap_or(r);
        rgb_buffer.extend_from_slice(&[r, g, b]);
    }

    let img = image::RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| DocumentError::ImageError("Failed to create image buffer".to_string()))?;
    let data = encode_image(DynamicImage::ImageRgb8(img), format, quality)?;

    Ok(RasterImage {
        data,
        format,
        width,
        height,
    })
}

fn encode_image(img: DynamicImage, format: ImageFormat, quality: u8) -> DocumentResult<Vec<u8>> {
    let mut output = Vec::new();

    match format {
        ImageFormat::Png => {
            img.write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
                .map_err(|e| DocumentError::ImageError(e.to_string()))?;
        }
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100));
            img.write_with_encoder(encoder)
                .map_err(|e| DocumentError::ImageError(e.to_string()))?;
        }
    }

    Ok(output)
}
