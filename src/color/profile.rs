//! Center-square cropping and average color extraction

use image::{Rgb, RgbImage, imageops};

/// Representative color of one source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorProfile {
    /// Identifier the catalog uses to resolve the source image (its file name)
    pub identifier: String,
    /// Average color of the center square crop
    pub rgb: Rgb<u8>,
}

impl ColorProfile {
    /// Create a profile from an identifier and color
    pub fn new(identifier: impl Into<String>, rgb: Rgb<u8>) -> Self {
        Self {
            identifier: identifier.into(),
            rgb,
        }
    }

    /// Profile an already decoded image
    pub fn of_image(identifier: impl Into<String>, image: &RgbImage) -> Self {
        Self::new(identifier, average_color(image, CenterCrop::of(image)))
    }
}

/// Largest centered square region of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterCrop {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Side length, equal to the shorter image dimension
    pub size: u32,
}

impl CenterCrop {
    /// Compute the crop for the given dimensions
    ///
    /// Offsets use floor division, so odd margins leave the extra pixel on
    /// the bottom or right.
    pub const fn from_dimensions(width: u32, height: u32) -> Self {
        let size = if width < height { width } else { height };
        Self {
            x: (width - size) / 2,
            y: (height - size) / 2,
            size,
        }
    }

    /// Compute the crop for an image
    pub fn of(image: &RgbImage) -> Self {
        Self::from_dimensions(image.width(), image.height())
    }

    /// Row range covered by the crop, half-open
    pub const fn rows(&self) -> std::ops::Range<u32> {
        self.y..self.y + self.size
    }

    /// Column range covered by the crop, half-open
    pub const fn cols(&self) -> std::ops::Range<u32> {
        self.x..self.x + self.size
    }
}

/// Mean of each channel over the crop, rounded to the nearest integer
///
/// An empty crop (zero-sized image) averages to black.
pub fn average_color(image: &RgbImage, crop: CenterCrop) -> Rgb<u8> {
    let mut sums = [0u64; 3];
    let mut count = 0u64;

    for y in crop.rows() {
        for x in crop.cols() {
            let Some(pixel) = image.get_pixel_checked(x, y) else {
                continue;
            };
            for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                *sum += u64::from(channel);
            }
            count += 1;
        }
    }

    if count == 0 {
        return Rgb([0, 0, 0]);
    }

    // Each rounded mean is at most 255
    Rgb(sums.map(|sum| ((sum + count / 2) / count) as u8))
}

/// Copy out the center square of an image
pub fn center_square(image: &RgbImage) -> RgbImage {
    let crop = CenterCrop::of(image);
    imageops::crop_imm(image, crop.x, crop.y, crop.size, crop.size).to_image()
}
