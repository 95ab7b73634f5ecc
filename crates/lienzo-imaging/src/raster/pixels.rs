// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer accessor — decodes encoded uploads into RGBA8 rasters and
// encodes finished canvases back to PNG/JPEG bytes or data URLs.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use lienzo_core::error::{LienzoError, Result};
use lienzo_core::{OutputFormat, SourceImage, encode_data_url};
use tracing::{debug, instrument};

/// A decoded RGBA raster: `width * height * 4` bytes, row-major.
///
/// Each buffer belongs to the single operation processing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Wrap raw RGBA bytes. Fails unless `bytes.len() == width * height * 4`.
    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let len = bytes.len();
        RgbaImage::from_raw(width, height, bytes)
            .filter(|_| (width as usize) * (height as usize) * 4 == len)
            .map(Self::from_rgba)
            .ok_or_else(|| {
                LienzoError::Decode(format!(
                    "buffer of {} bytes does not match {}x{} RGBA",
                    len, width, height
                ))
            })
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Raw RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    // -- Output ---------------------------------------------------------------

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }
}

/// Decode an uploaded image.
pub fn decode(source: &SourceImage) -> Result<PixelBuffer> {
    decode_bytes(&source.content)
}

/// Decode encoded bytes (any format the `image` crate recognises) to RGBA8.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_bytes(data: &[u8]) -> Result<PixelBuffer> {
    if data.is_empty() {
        return Err(LienzoError::Decode("empty input".into()));
    }
    let image = image::load_from_memory(data)
        .map_err(|err| LienzoError::Decode(format!("failed to decode image: {}", err)))?;
    debug!(
        width = image.width(),
        height = image.height(),
        "Image decoded from bytes"
    );
    Ok(PixelBuffer::from_rgba(image.into_rgba8()))
}

/// Read width and height from the image header without decoding pixels.
pub fn probe_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|err| LienzoError::Decode(format!("cannot identify image format: {}", err)))?
        .into_dimensions()
        .map_err(|err| LienzoError::Decode(format!("cannot read image dimensions: {}", err)))
}

/// Encode a buffer in the requested output format.
pub fn encode(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            buffer
                .as_rgba()
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|err| LienzoError::Encode(format!("PNG encoding failed: {}", err)))?;
        }
        OutputFormat::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(buffer.as_rgba().clone()).into_rgb8();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|err| LienzoError::Encode(format!("JPEG encoding failed: {}", err)))?;
        }
    }
    Ok(bytes)
}

/// Encode a buffer and wrap it in a `data:` URL.
pub fn encode_to_data_url(buffer: &PixelBuffer, format: OutputFormat) -> Result<String> {
    let bytes = encode(buffer, format)?;
    Ok(encode_data_url(format.mime_type(), &bytes))
}
