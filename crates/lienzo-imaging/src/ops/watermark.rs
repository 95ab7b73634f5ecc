// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark compositor — blends overlay stamps, stretched to cover the whole
// image, on top of a copy of the base image at its native size.

use lienzo_core::error::Result;
use lienzo_core::{OutputFormat, Overlay, SourceImage, WatermarkConfig};
use tracing::{info, instrument};

use crate::raster::{DrawingContext, PixelBuffer, pixels};

/// Draw `overlay` stretched over the whole context at `opacity`.
///
/// The context's global alpha is back at its previous value on return.
pub(crate) fn draw_overlay(
    ctx: &mut DrawingContext,
    overlay: &PixelBuffer,
    opacity: f32,
) -> Result<()> {
    let (width, height) = (ctx.width() as f64, ctx.height() as f64);
    let mut faded = ctx.with_alpha(opacity);
    faded.draw_image(overlay, 0.0, 0.0, width, height)
}

/// Copy `base` onto a canvas of its own size and blend each overlay on top, in order.
pub fn composite(base: &PixelBuffer, overlays: &[&PixelBuffer], opacity: f32) -> Result<PixelBuffer> {
    let (width, height) = base.dimensions();
    let mut ctx = DrawingContext::new(width, height)?;
    ctx.draw_image(base, 0.0, 0.0, width as f64, height as f64)?;
    for overlay in overlays {
        draw_overlay(&mut ctx, overlay, opacity)?;
    }
    Ok(ctx.finish())
}

/// Decode `source` and `overlay`, composite a single overlay, and encode the result.
#[instrument(skip_all, fields(name = %source.display_name, overlay = %overlay.label))]
pub fn watermark_source(
    source: &SourceImage,
    overlay: &Overlay,
    config: &WatermarkConfig,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    config.validate()?;
    let base = pixels::decode(source)?;
    let stamp = pixels::decode_bytes(&overlay.content)?;
    let out = composite(&base, &[&stamp], config.opacity)?;
    info!(width = out.width(), height = out.height(), "Watermark applied");
    pixels::encode(&out, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::canvas::WHITE;
    use crate::raster::pixels::tests::png_source;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, color: [u8; 4]) -> PixelBuffer {
        PixelBuffer::from_rgba(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn half_opacity_black_over_white_is_mid_grey() {
        let base = solid(6, 4, [255, 255, 255, 255]);
        let stamp = solid(6, 4, [0, 0, 0, 255]);
        let out = composite(&base, &[&stamp], 0.5).unwrap();
        assert_eq!(out.dimensions(), (6, 4));
        assert!(out.as_rgba().pixels().all(|p| *p == Rgba([128, 128, 128, 255])));
    }

    #[test]
    fn overlay_is_stretched_to_base_size() {
        let base = solid(40, 10, [255, 255, 255, 255]);
        // Square stamp, wider base: the stamp is distorted to cover all of it.
        let stamp = solid(3, 3, [0, 0, 255, 255]);
        let out = composite(&base, &[&stamp], 0.5).unwrap();
        assert_eq!(out.dimensions(), (40, 10));
        for (x, y) in [(0, 0), (39, 0), (0, 9), (39, 9), (20, 5)] {
            assert_eq!(*out.as_rgba().get_pixel(x, y), Rgba([128, 128, 255, 255]));
        }
    }

    #[test]
    fn transparent_stamp_regions_leave_base_untouched() {
        let base = solid(4, 4, [10, 200, 30, 255]);
        let mut stamp = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        stamp.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        let out = composite(&base, &[&PixelBuffer::from_rgba(stamp)], 0.5).unwrap();
        assert_eq!(*out.as_rgba().get_pixel(3, 3), Rgba([10, 200, 30, 255]));
        assert_eq!(*out.as_rgba().get_pixel(0, 0), Rgba([133, 228, 143, 255]));
    }

    #[test]
    fn stacked_overlays_apply_in_order() {
        let base = solid(2, 2, [255, 255, 255, 255]);
        let black = solid(2, 2, [0, 0, 0, 255]);
        let red = solid(2, 2, [255, 0, 0, 255]);
        let out = composite(&base, &[&black, &red], 0.5).unwrap();
        // white -> (128,128,128) -> half red over that.
        assert_eq!(*out.as_rgba().get_pixel(1, 1), Rgba([192, 64, 64, 255]));
    }

    #[test]
    fn later_draws_are_fully_opaque() {
        let mut ctx = DrawingContext::with_background(8, 8, WHITE).unwrap();
        draw_overlay(&mut ctx, &solid(8, 8, [0, 0, 0, 255]), 0.5).unwrap();
        assert_eq!(ctx.global_alpha(), 1.0);

        ctx.draw_image(&solid(8, 8, [0, 255, 0, 255]), 0.0, 0.0, 8.0, 8.0)
            .unwrap();
        assert!(ctx.as_rgba().pixels().all(|p| *p == Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn encoded_watermark_keeps_native_size() {
        let source = png_source(&RgbaImage::from_pixel(31, 17, Rgba([200, 0, 0, 255])), "A1.png");
        let stamp = png_source(&RgbaImage::from_pixel(500, 300, Rgba([0, 0, 0, 255])), "logo.png");
        let overlay = Overlay::new("Logo1", stamp.content.clone());
        let bytes =
            watermark_source(&source, &overlay, &WatermarkConfig::default(), OutputFormat::Png)
                .unwrap();
        let out = pixels::decode_bytes(&bytes).unwrap();
        assert_eq!(out.dimensions(), (31, 17));
        assert_eq!(*out.as_rgba().get_pixel(15, 8), Rgba([100, 0, 0, 255]));
    }

    #[test]
    fn undecodable_overlay_is_an_error() {
        let source = png_source(&RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])), "a.png");
        let overlay = Overlay::new("Broken", vec![9u8; 12]);
        assert!(
            watermark_source(&source, &overlay, &WatermarkConfig::default(), OutputFormat::Png)
                .is_err()
        );
    }
}
