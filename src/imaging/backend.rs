//! Rasterization backend trait and shared types.
//!
//! The [`RasterBackend`] trait is the single operation every backend must
//! support: turn a [`RenderParams`] into encoded bitmap bytes.
//!
//! The production implementation is
//! [`ResvgBackend`](super::resvg_backend::ResvgBackend): pure Rust, statically
//! linked. Tests use the mock in this module, which records every render and
//! can be told to fail for particular scales.

use super::params::RenderParams;
use thiserror::Error;

/// Failure to produce one bitmap for one density.
///
/// A failed render never affects other renders running beside it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterizationError {
    #[error("Failed to decode vector source: {0}")]
    Decode(String),
    #[error("Failed to allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },
    #[error("Failed to encode {format}: {message}")]
    Encode { format: String, message: String },
    #[error("No encoder for output format {0}")]
    UnsupportedFormat(String),
}

/// Trait for rasterization backends.
///
/// `Sync` so one backend can serve every parallel render.
pub trait RasterBackend: Sync {
    /// Render the source at the planned size and encode it.
    fn render(&self, params: &RenderParams) -> Result<Vec<u8>, RasterizationError>;
}
