// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Lienzo image pipeline.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::config::OutputFormat;
use crate::error::{LienzoError, Result};

/// Suffix appended to the stem of every fitted-canvas output.
pub const CANVAS_SUFFIX: &str = "Lienzo";

/// An uploaded image, never mutated after creation.
///
/// The display name only feeds output naming; it has no bearing on
/// processing. Cloning is cheap, so a source can be handed to worker tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Encoded image bytes (PNG, JPEG, WebP, ...).
    pub content: Arc<[u8]>,
    /// Original filename as supplied by the uploader.
    pub display_name: String,
}

impl SourceImage {
    pub fn from_bytes(content: impl Into<Arc<[u8]>>, display_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            display_name: display_name.into(),
        }
    }

    /// Build a source from a base64 `data:` URL as produced by browser file readers.
    pub fn from_data_url(data_url: &str, display_name: impl Into<String>) -> Result<Self> {
        let content = decode_data_url(data_url)?;
        Ok(Self::from_bytes(content, display_name))
    }

    /// Display name with its final extension removed.
    pub fn stem(&self) -> &str {
        file_stem(&self.display_name)
    }
}

/// A watermark stamp. Read-only and shared by every composition that uses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Label used in output filenames, e.g. `"Logo1"`.
    pub label: String,
    /// Encoded image bytes.
    pub content: Arc<[u8]>,
}

impl Overlay {
    pub fn new(label: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
        }
    }
}

/// Inclusive pixel rectangle covering the content of an image.
///
/// Starts out in an empty state (`min_x > max_x`) and grows through
/// [`BoundingBox::include`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// The "nothing found yet" state for a `width` x `height` scan.
    ///
    /// The minimums start at the far edge (at least 1, so a zero-sized scan
    /// still reads as empty) and the maximums at 0.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            min_x: width.max(1),
            min_y: height.max(1),
            max_x: 0,
            max_y: 0,
        }
    }

    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Width of the box in pixels (0 when empty).
    pub fn width(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.max_x - self.min_x + 1
        }
    }

    /// Height of the box in pixels (0 when empty).
    pub fn height(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.max_y - self.min_y + 1
        }
    }
}

/// Which dimension of the safe area constrained the fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitAxis {
    Width,
    Height,
}

/// Placement of an image inside the target canvas, in canvas pixels.
///
/// Recomputed for every image; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitGeometry {
    pub margin_x: f64,
    pub margin_y: f64,
    pub safe_width: f64,
    pub safe_height: f64,
    pub axis: FitAxis,
    pub draw_width: f64,
    pub draw_height: f64,
    pub draw_x: f64,
    pub draw_y: f64,
}

/// An encoded output paired with the filename it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Strip the last extension from a filename. Names without a dot are kept whole.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// `<stem>-Lienzo.png` (or `.jpg` for JPEG output).
pub fn canvas_output_name(display_name: &str, format: OutputFormat) -> String {
    format!(
        "{}-{}.{}",
        file_stem(display_name),
        CANVAS_SUFFIX,
        format.extension()
    )
}

/// `<stem>-<label>.png` (or `.jpg` for JPEG output).
pub fn watermark_output_name(display_name: &str, overlay_label: &str, format: OutputFormat) -> String {
    format!(
        "{}-{}.{}",
        file_stem(display_name),
        overlay_label,
        format.extension()
    )
}

/// Decode the payload of a base64 `data:` URL.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| LienzoError::InvalidDataUrl("missing `data:` scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| LienzoError::InvalidDataUrl("missing `,` separator".into()))?;
    if !header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(LienzoError::InvalidDataUrl(
            "only base64-encoded data URLs are supported".into(),
        ));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|err| LienzoError::InvalidDataUrl(format!("bad base64 payload: {}", err)))
}

/// Wrap encoded bytes in a base64 `data:` URL.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_tracks_extremes() {
        let mut bbox = BoundingBox::empty(10, 8);
        assert!(bbox.is_empty());
        assert_eq!(bbox.width(), 0);

        bbox.include(3, 5);
        bbox.include(7, 2);
        assert!(!bbox.is_empty());
        assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (3, 2, 7, 5));
        assert_eq!(bbox.width(), 5);
        assert_eq!(bbox.height(), 4);
    }

    #[test]
    fn single_pixel_box_at_origin_is_not_empty() {
        let mut bbox = BoundingBox::empty(4, 4);
        bbox.include(0, 0);
        assert!(!bbox.is_empty());
        assert_eq!((bbox.width(), bbox.height()), (1, 1));
    }

    #[test]
    fn zero_sized_scan_is_empty() {
        assert!(BoundingBox::empty(0, 0).is_empty());
        assert!(BoundingBox::empty(0, 5).is_empty());
    }

    #[test]
    fn output_names() {
        let png = OutputFormat::Png;
        assert_eq!(canvas_output_name("ABC123-1.jpg", png), "ABC123-1-Lienzo.png");
        assert_eq!(canvas_output_name("photo.final.png", png), "photo.final-Lienzo.png");
        assert_eq!(canvas_output_name("noext", png), "noext-Lienzo.png");
        assert_eq!(watermark_output_name("ABC123.webp", "Logo2", png), "ABC123-Logo2.png");
        assert_eq!(
            canvas_output_name("ABC123-1.png", OutputFormat::Jpeg { quality: 80 }),
            "ABC123-1-Lienzo.jpg"
        );
        assert_eq!(file_stem(".hidden"), ".hidden");
    }

    #[test]
    fn data_url_round_trip() {
        let url = encode_data_url("image/png", &[1, 2, 3, 250]);
        assert!(url.starts_with("data:image/png;base64,"));
        let source = SourceImage::from_data_url(&url, "a.png").unwrap();
        assert_eq!(&*source.content, &[1, 2, 3, 250]);
        assert_eq!(source.stem(), "a");
    }

    #[test]
    fn data_url_rejections() {
        assert!(matches!(
            decode_data_url("image/png;base64,AAAA"),
            Err(LienzoError::InvalidDataUrl(_))
        ));
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:text/plain,hello").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }
}
