//! Error Types
//!
//! This module defines the error types used by the obscurance pipeline.
//!
//! # Overview
//!
//! The main error type [`DaoError`] covers the setup-time and pre-dispatch
//! failure modes:
//! - Missing parallel-compute capability on the device
//! - Host camera configurations the technique cannot run on
//! - Missing or unrenderable compute programs
//! - Buffer resolutions that do not fit the deinterleaved layout
//!
//! Per-frame numeric edge cases (zero-length normals, far-plane depth,
//! empty bilateral windows) are **never** errors; they resolve to the
//! documented fallback values inside the kernels.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, DaoError>`.
//!
//! ```rust,ignore
//! use myth_dao::errors::{DaoError, Result};
//!
//! fn setup() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the deinterleaved obscurance pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DaoError {
    // ========================================================================
    // Setup Errors
    // ========================================================================
    /// The device cannot run compute shaders.
    #[error(
        "Deinterleaved ambient obscurance requires a device with compute shader support; disable the effect for this session"
    )]
    ComputeUnsupported,

    /// The host camera is configured in a way the technique cannot run on.
    #[error("Incompatible host configuration: {0}")]
    IncompatibleHost(String),

    /// A compute program template could not be located.
    #[error("Compute program not found: {0}")]
    ShaderNotFound(String),

    /// A compute program template failed to render.
    #[error("Compute program template error: {0}")]
    ShaderTemplate(String),

    // ========================================================================
    // Resolution Errors (signaled before any dispatch)
    // ========================================================================
    /// The frame has a zero dimension.
    #[error("Resolution must be non-zero, got {width}x{height}")]
    EmptyResolution {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// Deinterleaving needs even dimensions on both axes.
    #[error("Resolution must be even in both dimensions, got {width}x{height}")]
    OddResolution {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// A configured buffer does not match the frame's target size.
    #[error("{what} is {actual:?} but the frame target is {expected:?}")]
    ResolutionMismatch {
        /// Which buffer mismatched
        what: &'static str,
        /// Target size of the frame
        expected: (u32, u32),
        /// Size of the offending buffer
        actual: (u32, u32),
    },
}

impl From<minijinja::Error> for DaoError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::TemplateNotFound => DaoError::ShaderNotFound(err.to_string()),
            _ => DaoError::ShaderTemplate(err.to_string()),
        }
    }
}

/// Validates that a frame of `width`x`height` can be deinterleaved into 2×2 blocks.
pub fn check_resolution(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(DaoError::EmptyResolution { width, height });
    }
    if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
        return Err(DaoError::OddResolution { width, height });
    }
    Ok(())
}

/// Alias for `Result<T, DaoError>`.
pub type Result<T> = std::result::Result<T, DaoError>;
