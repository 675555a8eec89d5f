//! Tile sources and tile preparation

use crate::color::profile::center_square;
use crate::io::configuration::RESAMPLE_FILTER;
use crate::io::decode::DecoderChain;
use crate::io::error::{DecodeError, DecodeErrorKind};
use image::{Rgb, RgbImage, imageops};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves catalog identifiers to decoded source images
pub trait TileSource: Sync {
    /// Load the source image for an identifier
    ///
    /// # Errors
    ///
    /// Returns a decode error if the image is missing or undecodable
    fn load(&self, identifier: &str) -> Result<RgbImage, DecodeError>;
}

/// Source images stored as files in one directory
pub struct DirectorySource {
    root: PathBuf,
    decoders: DecoderChain,
}

impl DirectorySource {
    /// Source reading from `root` with the default decoder chain
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_decoders(root, DecoderChain::default())
    }

    /// Source reading from `root` with a custom decoder chain
    pub fn with_decoders(root: impl Into<PathBuf>, decoders: DecoderChain) -> Self {
        Self {
            root: root.into(),
            decoders,
        }
    }

    /// Directory the identifiers resolve against
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TileSource for DirectorySource {
    fn load(&self, identifier: &str) -> Result<RgbImage, DecodeError> {
        self.decoders.decode_file(&self.root.join(identifier))
    }
}

/// Already decoded source images keyed by identifier
#[derive(Default)]
pub struct MemorySource {
    images: HashMap<String, RgbImage>,
}

impl MemorySource {
    /// Empty in-memory source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an image
    pub fn insert(&mut self, identifier: impl Into<String>, image: RgbImage) {
        self.images.insert(identifier.into(), image);
    }

    /// Remove an image, returning it if present
    pub fn remove(&mut self, identifier: &str) -> Option<RgbImage> {
        self.images.remove(identifier)
    }
}

impl TileSource for MemorySource {
    fn load(&self, identifier: &str) -> Result<RgbImage, DecodeError> {
        self.images.get(identifier).cloned().ok_or_else(|| {
            DecodeError::new(
                identifier,
                DecodeErrorKind::Io(std::io::Error::from(std::io::ErrorKind::NotFound)),
            )
        })
    }
}

/// A prepared tile and whether it stands in for an unreadable source
#[derive(Debug, Clone)]
pub struct PreparedTile {
    /// `tile_size x tile_size` pixels
    pub image: RgbImage,
    /// True when the source failed to decode and black was substituted
    pub substituted: bool,
}

/// Center-crop and resize a source image to a square tile
pub fn fit_tile(source: &RgbImage, tile_size: u32) -> RgbImage {
    let square = center_square(source);
    if square.width() == tile_size && square.height() == tile_size {
        return square;
    }
    imageops::resize(&square, tile_size, tile_size, RESAMPLE_FILTER)
}

/// Solid black tile
pub fn black_tile(tile_size: u32) -> RgbImage {
    RgbImage::from_pixel(tile_size, tile_size, Rgb([0, 0, 0]))
}

/// Load and fit one tile, substituting black if the source is unreadable
pub fn prepare_tile(source: &impl TileSource, identifier: &str, tile_size: u32) -> PreparedTile {
    match source.load(identifier) {
        Ok(image) if image.width() > 0 && image.height() > 0 => PreparedTile {
            image: fit_tile(&image, tile_size),
            substituted: false,
        },
        Ok(_) => {
            tracing::warn!(identifier, "source image is empty, substituting black tile");
            PreparedTile {
                image: black_tile(tile_size),
                substituted: true,
            }
        }
        Err(error) => {
            tracing::warn!(identifier, %error, "substituting black tile");
            PreparedTile {
                image: black_tile(tile_size),
                substituted: true,
            }
        }
    }
}
