// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Lienzo.

use thiserror::Error;

/// Top-level error type for all Lienzo operations.
///
/// Every variant fails a single image's output only. Callers running a batch
/// record the failure against that image and carry on with its siblings.
#[derive(Debug, Error)]
pub enum LienzoError {
    // -- Image errors --
    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Batch execution --
    #[error("batch worker failed: {0}")]
    Task(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LienzoError>;
