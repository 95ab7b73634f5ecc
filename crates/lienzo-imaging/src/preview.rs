// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor preview — the fitted canvas as shown while the user zooms and drags,
// with the safe area outlined by a dashed red guide. Exports never carry
// the guide; they go through `pipeline` instead.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{Blend, draw_line_segment_mut};
use lienzo_core::error::Result;
use lienzo_core::{FitConfig, Placement};
use tracing::instrument;

use crate::ops::fit::{compute_geometry, fit_into_context};
use crate::raster::PixelBuffer;

/// Red at 70% opacity.
const GUIDE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 179]);
/// Dash and gap length in pixels.
const DASH: f32 = 5.0;
/// Stroke width in pixels, centred on the safe-area edge.
const GUIDE_WIDTH: u32 = 2;

/// Render the fitted image plus the safe-area guide.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn render_editor_preview(
    image: &PixelBuffer,
    config: &FitConfig,
    placement: &Placement,
) -> Result<PixelBuffer> {
    let fitted = fit_into_context(image, config, placement)?.finish();
    let geometry = compute_geometry(image.width(), image.height(), config, placement);

    let left = geometry.margin_x as f32;
    let top = geometry.margin_y as f32;
    let right = (geometry.margin_x + geometry.safe_width) as f32;
    let bottom = (geometry.margin_y + geometry.safe_height) as f32;

    let mut canvas = Blend(fitted.into_rgba());
    for step in 0..GUIDE_WIDTH {
        let inset = step as f32 - (GUIDE_WIDTH / 2) as f32;
        dashed_line(&mut canvas, (left, top + inset), (right, top + inset));
        dashed_line(&mut canvas, (left, bottom + inset), (right, bottom + inset));
        dashed_line(&mut canvas, (left + inset, top), (left + inset, bottom));
        dashed_line(&mut canvas, (right + inset, top), (right + inset, bottom));
    }
    Ok(PixelBuffer::from_rgba(canvas.0))
}

/// Axis-aligned dashed line, alternating `DASH` pixels on and off.
fn dashed_line(canvas: &mut Blend<RgbaImage>, from: (f32, f32), to: (f32, f32)) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = dx.abs().max(dy.abs());
    if length <= 0.0 {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);
    let mut start = 0.0;
    while start < length {
        let end = (start + DASH - 1.0).min(length);
        draw_line_segment_mut(
            canvas,
            (from.0 + ux * start, from.1 + uy * start),
            (from.0 + ux * end, from.1 + uy * end),
            GUIDE_COLOR,
        );
        start += 2.0 * DASH;
    }
}
