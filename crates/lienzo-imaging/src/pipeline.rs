// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestrator — the two independent outputs built from one upload:
// the fitted canvas (trim, then fit) and one watermarked copy per overlay.
//
// The `try_*` functions report why an output failed. The plain variants log
// the failure and return `None`, meaning "skip this output".

use lienzo_core::error::Result;
use lienzo_core::{
    FitConfig, NamedImage, OutputFormat, Overlay, Placement, ProcessingConfig, SourceImage,
    WatermarkConfig, canvas_output_name, watermark_output_name,
};
use tracing::{info, instrument, warn};

use crate::ops::fit::fit_onto_canvas;
use crate::ops::trim::trim;
use crate::ops::watermark::composite;
use crate::raster::{PixelBuffer, pixels};

/// Decode, trim, and fit `source` onto the target canvas.
#[instrument(skip(source), fields(name = %source.display_name))]
pub fn try_make_canvas_variant(
    source: &SourceImage,
    fit: &FitConfig,
    placement: &Placement,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    let decoded = pixels::decode(source)?;
    let trimmed = trim(&decoded).or_original(decoded);
    let canvas = fit_onto_canvas(&trimmed, fit, placement)?;
    info!(
        from_w = trimmed.width(),
        from_h = trimmed.height(),
        "Canvas variant rendered"
    );
    pixels::encode(&canvas, format)
}

/// [`try_make_canvas_variant`] with the default placement and PNG output,
/// yielding `None` on failure.
pub fn make_canvas_variant(source: &SourceImage, fit: &FitConfig) -> Option<Vec<u8>> {
    try_make_canvas_variant(source, fit, &Placement::default(), OutputFormat::Png)
        .map_err(|err| warn!(name = %source.display_name, %err, "Skipping canvas variant"))
        .ok()
}

/// One watermarked copy of `source` per overlay, in overlay order.
///
/// The base is decoded once. An overlay that fails to decode only empties
/// its own slot; a base that fails to decode empties every slot.
#[instrument(skip(source, overlays), fields(name = %source.display_name, overlays = overlays.len()))]
pub fn try_make_watermark_variants(
    source: &SourceImage,
    overlays: &[Overlay],
    config: &WatermarkConfig,
    format: OutputFormat,
) -> Result<Vec<Result<Vec<u8>>>> {
    config.validate()?;
    let base = pixels::decode(source)?;
    Ok(overlays
        .iter()
        .map(|overlay| watermark_one(&base, overlay, config.opacity, format))
        .collect())
}

fn watermark_one(
    base: &PixelBuffer,
    overlay: &Overlay,
    opacity: f32,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    let stamp = pixels::decode_bytes(&overlay.content)?;
    let out = composite(base, &[&stamp], opacity)?;
    pixels::encode(&out, format)
}

/// [`try_make_watermark_variants`] at the default opacity and PNG output,
/// with every failure flattened to `None`.
pub fn make_watermark_variants(source: &SourceImage, overlays: &[Overlay]) -> Vec<Option<Vec<u8>>> {
    watermark_slots(
        source,
        overlays,
        &WatermarkConfig::default(),
        OutputFormat::Png,
    )
}

fn watermark_slots(
    source: &SourceImage,
    overlays: &[Overlay],
    config: &WatermarkConfig,
    format: OutputFormat,
) -> Vec<Option<Vec<u8>>> {
    match try_make_watermark_variants(source, overlays, config, format) {
        Ok(results) => results
            .into_iter()
            .zip(overlays)
            .map(|(result, overlay)| {
                result
                    .map_err(|err| {
                        warn!(
                            name = %source.display_name,
                            overlay = %overlay.label,
                            %err,
                            "Skipping watermark variant"
                        )
                    })
                    .ok()
            })
            .collect(),
        Err(err) => {
            warn!(name = %source.display_name, %err, "Skipping all watermark variants");
            vec![None; overlays.len()]
        }
    }
}

/// Both outputs for one image under a fixed configuration, named for download.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ProcessingConfig,
}

impl Pipeline {
    pub fn new(config: ProcessingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// `<stem>-Lienzo.png`, or `None` if the image could not be processed.
    pub fn canvas_output(&self, source: &SourceImage) -> Option<NamedImage> {
        let format = self.config.output_format;
        try_make_canvas_variant(source, &self.config.fit, &self.config.placement, format)
            .map(|bytes| NamedImage {
                file_name: canvas_output_name(&source.display_name, format),
                bytes,
            })
            .map_err(|err| warn!(name = %source.display_name, %err, "Skipping canvas variant"))
            .ok()
    }

    /// `<stem>-<label>.png` per overlay, each independently `None` on failure.
    pub fn watermark_outputs(
        &self,
        source: &SourceImage,
        overlays: &[Overlay],
    ) -> Vec<Option<NamedImage>> {
        let format = self.config.output_format;
        watermark_slots(source, overlays, &self.config.watermark, format)
            .into_iter()
            .zip(overlays)
            .map(|(bytes, overlay)| {
                bytes.map(|bytes| NamedImage {
                    file_name: watermark_output_name(&source.display_name, &overlay.label, format),
                    bytes,
                })
            })
            .collect()
    }
}
