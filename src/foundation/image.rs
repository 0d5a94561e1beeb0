use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{CorruptError, CorruptResult};

/// Channel layout of an [`Image`] at the engine boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// Single channel, shape `(H, W)`.
    Gray,
    /// Three interleaved channels, shape `(H, W, 3)`.
    Rgb,
}

impl ChannelLayout {
    /// Number of interleaved samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }
}

/// Row-major u8 image of shape `(H, W)` or `(H, W, 3)`.
///
/// Operators never mutate an `Image` they are given; they always return a new one with the same
/// shape and layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl Image {
    /// Wrap raw interleaved bytes, validating that `data` matches `width * height * channels`.
    pub fn new(width: u32, height: u32, layout: ChannelLayout, data: Vec<u8>) -> CorruptResult<Self> {
        if width == 0 || height == 0 {
            return Err(CorruptError::invalid_argument(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(layout.channels()))
            .ok_or_else(|| CorruptError::invalid_argument("image buffer size overflow"))?;
        if data.len() != expected {
            return Err(CorruptError::invalid_argument(format!(
                "image buffer has {} bytes, expected {expected} for {width}x{height}x{}",
                data.len(),
                layout.channels()
            )));
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Build an image filled with a single value.
    pub fn filled(width: u32, height: u32, layout: ChannelLayout, value: u8) -> CorruptResult<Self> {
        let len = (width as usize) * (height as usize) * layout.channels();
        Self::new(width, height, layout, vec![value; len])
    }

    /// Take ownership of an RGB buffer.
    pub fn from_rgb(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: ChannelLayout::Rgb,
            data: img.into_raw(),
        }
    }

    /// Take ownership of a single-channel buffer.
    pub fn from_gray(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: ChannelLayout::Gray,
            data: img.into_raw(),
        }
    }

    /// Convert a decoded image. Luma images stay single-channel, everything else becomes RGB.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(g) => Self::from_gray(g),
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma16(_) => {
                Self::from_gray(img.to_luma8())
            }
            other => Self::from_rgb(other.to_rgb8()),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Array shape: `[H, W]` or `[H, W, 3]`.
    pub fn shape(&self) -> Vec<usize> {
        match self.layout {
            ChannelLayout::Gray => vec![self.height as usize, self.width as usize],
            ChannelLayout::Rgb => vec![self.height as usize, self.width as usize, 3],
        }
    }

    /// Interleaved row-major bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// `true` when the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mean sample value over all channels.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.data.iter().map(|&v| u64::from(v)).sum();
        sum as f64 / self.data.len() as f64
    }

    /// Expand to an owned RGB buffer; gray samples are replicated across channels.
    pub fn to_rgb(&self) -> RgbImage {
        let data = match self.layout {
            ChannelLayout::Rgb => self.data.clone(),
            ChannelLayout::Gray => self.data.iter().flat_map(|&v| [v, v, v]).collect(),
        };
        // Length is guaranteed by construction.
        RgbImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    /// Reduce to a single channel using ITU-R 601-2 luma weights.
    pub fn to_luma(&self) -> Image {
        match self.layout {
            ChannelLayout::Gray => self.clone(),
            ChannelLayout::Rgb => Self {
                width: self.width,
                height: self.height,
                layout: ChannelLayout::Gray,
                data: self
                    .data
                    .chunks_exact(3)
                    .map(|px| luma_601(px[0], px[1], px[2]))
                    .collect(),
            },
        }
    }

    /// Re-express an RGB result in `layout`, reducing to luma when the source was single-channel.
    pub(crate) fn from_rgb_as(rgb: RgbImage, layout: ChannelLayout) -> Image {
        let img = Self::from_rgb(rgb);
        match layout {
            ChannelLayout::Rgb => img,
            ChannelLayout::Gray => img.to_luma(),
        }
    }
}

/// Integer luma with 16-bit fixed-point weights (299/587/114 per mille).
pub(crate) fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    let l = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000;
    (l >> 16) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/image.rs"]
mod tests;
