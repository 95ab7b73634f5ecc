// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drawing context — a single RGBA canvas plus a global alpha, written once
// per layer (background, image, overlays) and then finalised.

use std::ops::{Deref, DerefMut};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use lienzo_core::error::{LienzoError, Result};
use tracing::debug;

use super::pixels::PixelBuffer;

/// Largest canvas we agree to allocate (16384 x 16384).
const MAX_CANVAS_PIXELS: u64 = 16_384 * 16_384;

/// Opaque white, the fitted canvas background.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// An owned canvas with 2D-context style drawing.
///
/// Every draw is composited source-over and multiplied by the global alpha.
/// The global alpha is only changed through [`DrawingContext::with_alpha`],
/// whose guard restores the previous value when dropped.
pub struct DrawingContext {
    canvas: RgbaImage,
    global_alpha: f32,
}

impl DrawingContext {
    // -- Construction ---------------------------------------------------------

    /// A fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixels = width as u64 * height as u64;
        if pixels == 0 || pixels > MAX_CANVAS_PIXELS {
            return Err(LienzoError::ContextUnavailable(format!(
                "cannot allocate a {}x{} canvas",
                width, height
            )));
        }
        Ok(Self {
            canvas: RgbaImage::new(width, height),
            global_alpha: 1.0,
        })
    }

    /// A canvas filled with `color`.
    pub fn with_background(width: u32, height: u32, color: Rgba<u8>) -> Result<Self> {
        let mut ctx = Self::new(width, height)?;
        ctx.fill(color);
        Ok(ctx)
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    // -- Drawing --------------------------------------------------------------

    /// Overwrite every pixel with `color`, ignoring the global alpha.
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = color;
        }
    }

    /// Set the global alpha for the lifetime of the returned guard.
    pub fn with_alpha(&mut self, alpha: f32) -> AlphaGuard<'_> {
        let previous = self.global_alpha;
        self.global_alpha = alpha.clamp(0.0, 1.0);
        AlphaGuard { ctx: self, previous }
    }

    /// Draw `image` stretched to `width` x `height` with its top-left corner at
    /// (`x`, `y`). Coordinates are rounded to whole pixels; anything outside
    /// the canvas is clipped.
    ///
    /// Fails with `ContextUnavailable` when the stretched image would exceed
    /// the allocation limit.
    pub fn draw_image(
        &mut self,
        image: &PixelBuffer,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let target_w = width.round();
        let target_h = height.round();
        let (origin_x, origin_y) = (x.round(), y.round());
        if !(target_w >= 1.0 && target_h >= 1.0) || !origin_x.is_finite() || !origin_y.is_finite() {
            debug!(width, height, x, y, "Skipping draw of an empty target rectangle");
            return Ok(());
        }
        let (cw, ch) = (self.canvas.width() as f64, self.canvas.height() as f64);
        if origin_x >= cw || origin_y >= ch || origin_x + target_w <= 0.0 || origin_y + target_h <= 0.0 {
            debug!(x, y, width, height, "Draw rectangle lies outside the canvas");
            return Ok(());
        }
        if target_w * target_h > MAX_CANVAS_PIXELS as f64 {
            return Err(LienzoError::ContextUnavailable(format!(
                "cannot stretch image to {}x{}",
                target_w, target_h
            )));
        }
        let (target_w, target_h) = (target_w as u32, target_h as u32);
        let (origin_x, origin_y) = (origin_x as i64, origin_y as i64);

        if (target_w, target_h) == image.dimensions() {
            self.blend_at(image.as_rgba(), origin_x, origin_y);
        } else {
            let resized = imageops::resize(image.as_rgba(), target_w, target_h, FilterType::Triangle);
            self.blend_at(&resized, origin_x, origin_y);
        }
        Ok(())
    }

    /// Composite `top` at its natural size with its top-left corner at (`x`, `y`).
    fn blend_at(&mut self, top: &RgbaImage, x: i64, y: i64) {
        let alpha = self.global_alpha;
        if alpha <= 0.0 {
            return;
        }
        let (cw, ch) = (self.canvas.width() as i64, self.canvas.height() as i64);
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + top.width() as i64).min(cw);
        let y_end = (y + top.height() as i64).min(ch);

        for cy in y_start..y_end {
            for cx in x_start..x_end {
                let src = top.get_pixel((cx - x) as u32, (cy - y) as u32);
                let dst = self.canvas.get_pixel_mut(cx as u32, cy as u32);
                *dst = source_over(*dst, *src, alpha);
            }
        }
    }

    // -- Output ---------------------------------------------------------------

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Finish the composition and hand back its pixels.
    pub fn finish(self) -> PixelBuffer {
        PixelBuffer::from_rgba(self.canvas)
    }
}

/// Restores the global alpha of its [`DrawingContext`] on drop.
pub struct AlphaGuard<'a> {
    ctx: &'a mut DrawingContext,
    previous: f32,
}

impl Deref for AlphaGuard<'_> {
    type Target = DrawingContext;

    fn deref(&self) -> &DrawingContext {
        self.ctx
    }
}

impl DerefMut for AlphaGuard<'_> {
    fn deref_mut(&mut self) -> &mut DrawingContext {
        self.ctx
    }
}

impl Drop for AlphaGuard<'_> {
    fn drop(&mut self) {
        self.ctx.global_alpha = self.previous;
    }
}

/// Porter-Duff source-over with the source alpha scaled by `global_alpha`.
fn source_over(dst: Rgba<u8>, src: Rgba<u8>, global_alpha: f32) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0 * global_alpha;
    if sa <= 0.0 {
        return dst;
    }
    if sa >= 1.0 {
        return src;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| -> u8 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
