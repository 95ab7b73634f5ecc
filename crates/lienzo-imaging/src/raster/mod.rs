// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — decode/encode of pixel buffers and the drawing context
// every composition is built on.

pub mod canvas;
pub mod pixels;

pub use canvas::{AlphaGuard, DrawingContext};
pub use pixels::PixelBuffer;
