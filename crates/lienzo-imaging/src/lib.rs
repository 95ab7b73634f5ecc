// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lienzo-imaging — Image processing for Lienzo.
//
// Decodes uploads into RGBA pixel buffers, trims blank borders, fits the
// result centred onto a fixed-size white canvas, and blends watermark
// overlays onto copies of the original. The batch driver runs all of that
// over many uploads on tokio's blocking pool.

pub mod batch;
pub mod ops;
pub mod pipeline;
pub mod preview;
pub mod raster;

// Re-export the primary entry points so callers can use `lienzo_imaging::Pipeline` etc.
pub use batch::{BatchItem, BatchProcessor};
pub use ops::{Trimmed, compute_geometry, fit_onto_canvas, trim};
pub use pipeline::{
    Pipeline, make_canvas_variant, make_watermark_variants, try_make_canvas_variant,
    try_make_watermark_variants,
};
pub use preview::render_editor_preview;
pub use raster::{AlphaGuard, DrawingContext, PixelBuffer};
pub use raster::pixels::{decode, decode_bytes, encode, encode_to_data_url, probe_dimensions};
