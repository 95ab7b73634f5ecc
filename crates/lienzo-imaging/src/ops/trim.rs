// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content trimmer — strips transparent, near-white, and near-black borders
// from an image by cropping to the bounding box of its content pixels.

use image::{Rgba, imageops};
use lienzo_core::error::Result;
use lienzo_core::{BoundingBox, OutputFormat, SourceImage};
use tracing::{debug, info, instrument};

use crate::raster::PixelBuffer;
use crate::raster::pixels;

/// Alpha below this counts as transparent.
const ALPHA_THRESHOLD: u8 = 10;
/// Near-white: channel sum above 3 x 245 and every channel above 240.
const WHITE_SUM_THRESHOLD: u32 = 3 * 245;
const WHITE_CHANNEL_THRESHOLD: u8 = 240;
/// Near-black: channel sum below 3 x 10 and every channel below 15.
const BLACK_SUM_THRESHOLD: u32 = 3 * 10;
const BLACK_CHANNEL_THRESHOLD: u8 = 15;

/// Outcome of a trim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trimmed {
    /// Content was found; `buffer` is the strict crop to `bounds`.
    Cropped {
        buffer: PixelBuffer,
        bounds: BoundingBox,
    },
    /// The image is background all over. The caller keeps the original.
    Unchanged,
}

impl Trimmed {
    /// The cropped buffer, or `original` when nothing was trimmed.
    pub fn or_original(self, original: PixelBuffer) -> PixelBuffer {
        match self {
            Self::Cropped { buffer, .. } => buffer,
            Self::Unchanged => original,
        }
    }
}

/// Whether a pixel belongs to the border that trimming removes.
pub fn is_background(pixel: Rgba<u8>) -> bool {
    let [r, g, b, a] = pixel.0;
    if a < ALPHA_THRESHOLD {
        return true;
    }
    let sum = r as u32 + g as u32 + b as u32;
    let near_white = sum > WHITE_SUM_THRESHOLD
        && r > WHITE_CHANNEL_THRESHOLD
        && g > WHITE_CHANNEL_THRESHOLD
        && b > WHITE_CHANNEL_THRESHOLD;
    let near_black = sum < BLACK_SUM_THRESHOLD
        && r < BLACK_CHANNEL_THRESHOLD
        && g < BLACK_CHANNEL_THRESHOLD
        && b < BLACK_CHANNEL_THRESHOLD;
    near_white || near_black
}

/// Bounding box of every non-background pixel, scanned row-major.
///
/// Returns the empty box when the whole image is background.
pub fn content_bounds(buffer: &PixelBuffer) -> BoundingBox {
    let (width, height) = buffer.dimensions();
    let mut bounds = BoundingBox::empty(width, height);
    for (x, y, pixel) in buffer.as_rgba().enumerate_pixels() {
        if !is_background(*pixel) {
            bounds.include(x, y);
        }
    }
    bounds
}

/// Crop `buffer` to its content. Pixel values inside the box are untouched.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn trim(buffer: &PixelBuffer) -> Trimmed {
    let bounds = content_bounds(buffer);
    if bounds.is_empty() {
        debug!("No content pixels found; keeping the original image");
        return Trimmed::Unchanged;
    }

    let cropped = imageops::crop_imm(
        buffer.as_rgba(),
        bounds.min_x,
        bounds.min_y,
        bounds.width(),
        bounds.height(),
    )
    .to_image();
    info!(
        min_x = bounds.min_x,
        min_y = bounds.min_y,
        new_w = cropped.width(),
        new_h = cropped.height(),
        "Trimmed to content"
    );
    Trimmed::Cropped {
        buffer: PixelBuffer::from_rgba(cropped),
        bounds,
    }
}

/// Decode, trim, and re-encode a source image.
///
/// An all-background image comes back as the original bytes.
#[instrument(skip(source), fields(name = %source.display_name))]
pub fn trim_to_content(source: &SourceImage, format: OutputFormat) -> Result<Vec<u8>> {
    let decoded = pixels::decode(source)?;
    match trim(&decoded) {
        Trimmed::Cropped { buffer, .. } => pixels::encode(&buffer, format),
        Trimmed::Unchanged => Ok(source.content.to_vec()),
    }
}
