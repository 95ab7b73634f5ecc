// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the lienzo-imaging crate. Covers the two hot
// paths of a batch run: the border scan of the trimmer and the
// resample-and-composite step of the fitter.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use lienzo_core::{FitConfig, Placement};
use lienzo_imaging::{PixelBuffer, fit_onto_canvas, trim};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 1200x900 product shot: white studio background with a coloured block
/// from (300, 200) to (900, 700).
fn product_shot() -> PixelBuffer {
    let mut img = RgbaImage::from_pixel(1200, 900, Rgba([255, 255, 255, 255]));
    for y in 200..700 {
        for x in 300..900 {
            img.put_pixel(x, y, Rgba([180, 40, 40, 255]));
        }
    }
    PixelBuffer::from_rgba(img)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_trim(c: &mut Criterion) {
    let shot = product_shot();
    c.bench_function("trim (1200x900, white border)", |b| {
        b.iter(|| black_box(trim(black_box(&shot))));
    });
}

fn bench_fit(c: &mut Criterion) {
    let shot = product_shot();
    let config = FitConfig::default();
    let placement = Placement::default();
    c.bench_function("fit_onto_canvas (1200x900 -> 500x300)", |b| {
        b.iter(|| black_box(fit_onto_canvas(black_box(&shot), &config, &placement)));
    });
}

criterion_group!(benches, bench_trim, bench_fit);
criterion_main!(benches);
