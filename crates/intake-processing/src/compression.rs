use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_MAX_HEIGHT: u32 = 1080;
/// Files below this size are relayed untouched.
pub const DEFAULT_MIN_BYTES: usize = 500_000;
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Shrinks large raster images to fit a bounding box before they are relayed.
#[derive(Debug, Clone)]
pub struct ImageDownsizer {
    max_width: u32,
    max_height: u32,
    min_bytes: usize,
    jpeg_quality: u8,
}

impl Default for ImageDownsizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_WIDTH,
            DEFAULT_MAX_HEIGHT,
            DEFAULT_MIN_BYTES,
            DEFAULT_JPEG_QUALITY,
        )
    }
}

impl ImageDownsizer {
    pub fn new(max_width: u32, max_height: u32, min_bytes: usize, jpeg_quality: u8) -> Self {
        Self {
            max_width,
            max_height,
            min_bytes,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// Whether `downsize` would try to re-encode a file of this type and size.
    pub fn applies_to(&self, content_type: &str, size: usize) -> bool {
        size >= self.min_bytes && raster_format(content_type).is_some()
    }

    /// Resize to fit the bounding box (aspect ratio kept) and re-encode in the same format.
    pub fn downsize(&self, data: &[u8], content_type: &str) -> Result<Vec<u8>, ProcessingError> {
        let format = raster_format(content_type)
            .ok_or_else(|| ProcessingError::UnsupportedType(content_type.to_string()))?;

        let img =
            image::load_from_memory_with_format(data, format).map_err(ProcessingError::Decode)?;
        let (width, height) = img.dimensions();

        let img = if width > self.max_width || height > self.max_height {
            img.resize(self.max_width, self.max_height, FilterType::Triangle)
        } else {
            img
        };

        self.encode(&img, format)
    }

    /// Downsize when applicable, keeping the original bytes on failure or when the
    /// re-encoded image is not smaller.
    pub fn downsize_or_original(&self, data: Bytes, content_type: &str) -> Bytes {
        if !self.applies_to(content_type, data.len()) {
            return data;
        }

        match self.downsize(&data, content_type) {
            Ok(encoded) if encoded.len() < data.len() => {
                tracing::debug!(
                    original = data.len(),
                    downsized = encoded.len(),
                    content_type = %content_type,
                    "Image downsized"
                );
                Bytes::from(encoded)
            }
            Ok(_) => data,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    content_type = %content_type,
                    "Image downsizing failed, keeping original"
                );
                data
            }
        }
    }

    fn encode(&self, img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ProcessingError> {
        let mut output = Cursor::new(Vec::new());

        match format {
            ImageFormat::Jpeg => {
                let rgb = img.to_rgb8();
                let encoder = JpegEncoder::new_with_quality(&mut output, self.jpeg_quality);
                rgb.write_with_encoder(encoder)
                    .map_err(ProcessingError::Encode)?;
            }
            _ => {
                let encoder = PngEncoder::new_with_quality(
                    &mut output,
                    CompressionType::Best,
                    PngFilter::Adaptive,
                );
                img.write_with_encoder(encoder)
                    .map_err(ProcessingError::Encode)?;
            }
        }

        Ok(output.into_inner())
    }
}

fn raster_format(content_type: &str) -> Option<ImageFormat> {
    match content_type.trim().to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/png" => Some(ImageFormat::Png),
        _ => None,
    }
}
