// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canvas fitter — scales an image into the inset safe area of a fixed-size
// white canvas, preserving aspect ratio, and centres it there.

use lienzo_core::error::Result;
use lienzo_core::{FitAxis, FitConfig, FitGeometry, Placement};
use tracing::{debug, instrument};

use crate::raster::canvas::WHITE;
use crate::raster::{DrawingContext, PixelBuffer};

/// Where a `source_width` x `source_height` image lands on the canvas.
///
/// The image is fitted by width only when it is strictly wider than the safe
/// area; equal aspect ratios fit by height. `draw_width`/`draw_height` already
/// include the placement scale, and `draw_x`/`draw_y` the placement offsets.
pub fn compute_geometry(
    source_width: u32,
    source_height: u32,
    config: &FitConfig,
    placement: &Placement,
) -> FitGeometry {
    let canvas_w = config.width as f64;
    let canvas_h = config.height as f64;
    let margin_x = canvas_w * config.margin;
    let margin_y = canvas_h * config.margin;
    let safe_width = canvas_w - 2.0 * margin_x;
    let safe_height = canvas_h - 2.0 * margin_y;

    let image_ratio = source_width as f64 / source_height as f64;
    let safe_ratio = safe_width / safe_height;

    let (axis, fit_width, fit_height) = if image_ratio > safe_ratio {
        (FitAxis::Width, safe_width, safe_width / image_ratio)
    } else {
        (FitAxis::Height, safe_height * image_ratio, safe_height)
    };

    let draw_width = fit_width * placement.scale;
    let draw_height = fit_height * placement.scale;

    FitGeometry {
        margin_x,
        margin_y,
        safe_width,
        safe_height,
        axis,
        draw_width,
        draw_height,
        draw_x: margin_x + (safe_width - draw_width) / 2.0 + placement.offset_x,
        draw_y: margin_y + (safe_height - draw_height) / 2.0 + placement.offset_y,
    }
}

/// Composite `image` onto a fresh white `config.width` x `config.height` canvas.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn fit_onto_canvas(
    image: &PixelBuffer,
    config: &FitConfig,
    placement: &Placement,
) -> Result<PixelBuffer> {
    Ok(fit_into_context(image, config, placement)?.finish())
}

/// Same as [`fit_onto_canvas`] but keeps the context open for further drawing.
pub(crate) fn fit_into_context(
    image: &PixelBuffer,
    config: &FitConfig,
    placement: &Placement,
) -> Result<DrawingContext> {
    config.validate()?;
    placement.validate()?;

    let mut ctx = DrawingContext::with_background(config.width, config.height, WHITE)?;
    let geometry = compute_geometry(image.width(), image.height(), config, placement);
    debug!(
        axis = ?geometry.axis,
        draw_x = geometry.draw_x,
        draw_y = geometry.draw_y,
        draw_width = geometry.draw_width,
        draw_height = geometry.draw_height,
        "Fit geometry computed"
    );
    ctx.draw_image(
        image,
        geometry.draw_x,
        geometry.draw_y,
        geometry.draw_width,
        geometry.draw_height,
    )?;
    Ok(ctx)
}
