//! Ordered decoder chain for source and target images
//!
//! Each decoder handles one container format. The chain asks every decoder
//! whether it recognises the leading bytes and returns the first successful
//! decode, so a file with a misleading extension still decodes.

use crate::io::error::{DecodeError, DecodeErrorKind};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::path::Path;

/// A single format-specific decoder
pub trait ImageDecoder: Send + Sync {
    /// Human-readable decoder name used in diagnostics
    fn name(&self) -> &'static str;

    /// Whether the data looks like this decoder's format
    fn recognizes(&self, bytes: &[u8]) -> bool;

    /// Decode the data
    ///
    /// # Errors
    ///
    /// Returns the underlying image error when the data is malformed
    fn decode(&self, bytes: &[u8]) -> image::ImageResult<DynamicImage>;
}

/// Decoder backed by one of the `image` crate's built-in formats
#[derive(Debug, Clone, Copy)]
pub struct FormatDecoder {
    format: ImageFormat,
}

impl FormatDecoder {
    /// Wrap a built-in format
    pub const fn new(format: ImageFormat) -> Self {
        Self { format }
    }
}

impl ImageDecoder for FormatDecoder {
    fn name(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("unknown")
    }

    fn recognizes(&self, bytes: &[u8]) -> bool {
        image::guess_format(bytes).is_ok_and(|format| format == self.format)
    }

    fn decode(&self, bytes: &[u8]) -> image::ImageResult<DynamicImage> {
        image::load_from_memory_with_format(bytes, self.format)
    }
}

/// Ordered list of decoders; the first successful decode wins
pub struct DecoderChain {
    decoders: Vec<Box<dyn ImageDecoder>>,
}

impl Default for DecoderChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(FormatDecoder::new(ImageFormat::Jpeg)),
            Box::new(FormatDecoder::new(ImageFormat::Png)),
            Box::new(FormatDecoder::new(ImageFormat::Gif)),
            Box::new(FormatDecoder::new(ImageFormat::Bmp)),
            Box::new(FormatDecoder::new(ImageFormat::WebP)),
            Box::new(FormatDecoder::new(ImageFormat::Tiff)),
        ])
    }
}

impl DecoderChain {
    /// Build a chain from decoders in priority order
    pub fn new(decoders: Vec<Box<dyn ImageDecoder>>) -> Self {
        Self { decoders }
    }

    /// Number of decoders in the chain
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether the chain has no decoders
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode in-memory image data to RGB
    ///
    /// # Errors
    ///
    /// Returns `Unrecognized` when no decoder claims the data, or `Malformed`
    /// with the last decoder's error when every claiming decoder failed
    pub fn decode(&self, bytes: &[u8]) -> Result<RgbImage, DecodeError> {
        let mut last_error = None;

        for decoder in self.decoders.iter().filter(|d| d.recognizes(bytes)) {
            match decoder.decode(bytes) {
                Ok(image) => return Ok(image.to_rgb8()),
                Err(error) => {
                    tracing::debug!(decoder = decoder.name(), %error, "decoder rejected data");
                    last_error = Some(error);
                }
            }
        }

        let kind = last_error.map_or(DecodeErrorKind::Unrecognized, DecodeErrorKind::Malformed);
        Err(DecodeError::new("<memory>", kind))
    }

    /// Read and decode an image file
    ///
    /// # Errors
    ///
    /// Returns a decode error naming the path when the file cannot be read
    /// or decoded
    pub fn decode_file(&self, path: &Path) -> Result<RgbImage, DecodeError> {
        let bytes = std::fs::read(path)
            .map_err(|source| DecodeError::new(path, DecodeErrorKind::Io(source)))?;
        self.decode(&bytes).map_err(|error| error.with_origin(path))
    }
}
