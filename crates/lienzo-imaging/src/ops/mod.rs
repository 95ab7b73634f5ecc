// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image operations — content trimming, canvas fitting, and watermark compositing.

pub mod fit;
pub mod trim;
pub mod watermark;

pub use fit::{compute_geometry, fit_onto_canvas};
pub use trim::{Trimmed, content_bounds, is_background, trim, trim_to_content};
pub use watermark::{composite, watermark_source};
