// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing configuration: canvas fitting, interactive placement, watermark
// opacity, and output encoding. All values are plain numbers with serde
// defaults so a partial JSON document is enough to override one knob.

use serde::{Deserialize, Serialize};

use crate::error::{LienzoError, Result};

/// Target canvas for the fitted ("Lienzo") output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Margin as a fraction of each canvas dimension, applied on every side.
    pub margin: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 300,
            margin: 0.10,
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LienzoError::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.margin.is_finite() || !(0.0..0.5).contains(&self.margin) {
            return Err(LienzoError::InvalidConfig(format!(
                "margin must lie in [0, 0.5), got {}",
                self.margin
            )));
        }
        Ok(())
    }
}

/// Manual zoom and drag applied on top of the automatic fit.
///
/// The defaults (scale 1, no offset) reproduce the plain centred fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    /// Multiplier applied to the fitted draw size.
    pub scale: f64,
    /// Horizontal offset in canvas pixels, positive to the right.
    pub offset_x: f64,
    /// Vertical offset in canvas pixels, positive downwards.
    pub offset_y: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Placement {
    /// Smallest zoom the editor slider allows.
    pub const MIN_SCALE: f64 = 0.1;
    /// Largest zoom the editor slider allows.
    pub const MAX_SCALE: f64 = 5.0;

    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_SCALE..=Self::MAX_SCALE).contains(&self.scale) {
            return Err(LienzoError::InvalidConfig(format!(
                "scale must be within {}..={}, got {}",
                Self::MIN_SCALE,
                Self::MAX_SCALE,
                self.scale
            )));
        }
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            return Err(LienzoError::InvalidConfig(format!(
                "offsets must be finite, got ({}, {})",
                self.offset_x, self.offset_y
            )));
        }
        Ok(())
    }

    /// Set the zoom, clamped to the editor range.
    pub fn with_scale(self, scale: f64) -> Self {
        Self {
            scale: scale.clamp(Self::MIN_SCALE, Self::MAX_SCALE),
            ..self
        }
    }

    /// Accumulate a drag delta.
    pub fn nudge(self, dx: f64, dy: f64) -> Self {
        Self {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            ..self
        }
    }

    /// Back to the automatic fit, as the editor does when a new image loads.
    pub fn reset(self) -> Self {
        Self::default()
    }
}

/// Watermark overlay settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Global alpha applied while drawing each overlay (0.0..=1.0).
    pub opacity: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self { opacity: 0.5 }
    }
}

impl WatermarkConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(LienzoError::InvalidConfig(format!(
                "opacity must lie in [0, 1], got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

/// Encoding used for every produced image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless RGBA PNG.
    #[default]
    Png,
    /// JPEG at the given quality (1-100). Alpha is dropped.
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// MIME type, used when building data URLs.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

/// Everything a batch run needs besides the images themselves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub fit: FitConfig,
    pub placement: Placement,
    pub watermark: WatermarkConfig,
    pub output_format: OutputFormat,
}

impl ProcessingConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.fit.validate()?;
        self.placement.validate()?;
        self.watermark.validate()?;
        if let OutputFormat::Jpeg { quality } = self.output_format {
            if !(1..=100).contains(&quality) {
                return Err(LienzoError::InvalidConfig(format!(
                    "JPEG quality must lie in 1..=100, got {}",
                    quality
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_canvas() {
        let config = ProcessingConfig::default();
        assert_eq!(config.fit.width, 500);
        assert_eq!(config.fit.height, 300);
        assert!((config.fit.margin - 0.10).abs() < f64::EPSILON);
        assert_eq!(config.placement, Placement::default());
        assert!((config.watermark.opacity - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.output_format, OutputFormat::Png);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            ProcessingConfig::from_json_str(r#"{"fit": {"width": 800}, "watermark": {"opacity": 0.25}}"#)
                .unwrap();
        assert_eq!(config.fit.width, 800);
        assert_eq!(config.fit.height, 300);
        assert!((config.watermark.opacity - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn jpeg_format_round_trips_through_json() {
        let config = ProcessingConfig::from_json_str(
            r#"{"output_format": {"kind": "jpeg", "quality": 85}}"#,
        )
        .unwrap();
        assert_eq!(config.output_format, OutputFormat::Jpeg { quality: 85 });
        assert_eq!(config.output_format.extension(), "jpg");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ProcessingConfig::from_json_str(r#"{"fit": {"height": 0}}"#).is_err());
        assert!(ProcessingConfig::from_json_str(r#"{"fit": {"margin": 0.5}}"#).is_err());
        assert!(ProcessingConfig::from_json_str(r#"{"placement": {"scale": 0}}"#).is_err());
        assert!(ProcessingConfig::from_json_str(r#"{"placement": {"scale": 30}}"#).is_err());
        assert!(ProcessingConfig::from_json_str(r#"{"placement": {"scale": 0.05}}"#).is_err());
        assert!(ProcessingConfig::from_json_str(r#"{"placement": {"scale": 5.0}}"#).is_ok());
        assert!(ProcessingConfig::from_json_str(r#"{"watermark": {"opacity": 1.5}}"#).is_err());
        assert!(
            ProcessingConfig::from_json_str(r#"{"output_format": {"kind": "jpeg", "quality": 0}}"#)
                .is_err()
        );
        assert!(matches!(
            ProcessingConfig::from_json_str("not json"),
            Err(LienzoError::Serialization(_))
        ));
    }

    #[test]
    fn placement_editing() {
        let placement = Placement::default().with_scale(9.0).nudge(4.0, -2.0).nudge(1.0, 1.0);
        assert_eq!(placement.scale, Placement::MAX_SCALE);
        assert_eq!(placement.offset_x, 5.0);
        assert_eq!(placement.offset_y, -1.0);
        assert_eq!(Placement::default().with_scale(0.0).scale, Placement::MIN_SCALE);
        assert_eq!(placement.reset(), Placement::default());
    }
}
