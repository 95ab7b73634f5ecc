// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lienzo — Core types, configuration, and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{FitConfig, OutputFormat, Placement, ProcessingConfig, WatermarkConfig};
pub use error::LienzoError;
pub use types::*;
