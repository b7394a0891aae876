//! Parameter types for rasterization.
//!
//! These structs describe *what* to render, not *how*. They are the interface
//! between [`operations`](super::operations), which turns a descriptor and a
//! density into a render plan, and the [`backend`](super::backend), which does
//! the pixel work. Tests swap in a mock backend without touching the planning.

use crate::catalog::ImageFormat;
use std::sync::Arc;

use crate::source::SourceImage;

/// Quality setting for lossy encoders (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    /// Convert a `0.0..=1.0` fraction into an encoder quality.
    ///
    /// Encoders have no zero setting, so 0.0 maps to the lowest quality, 1.
    pub fn from_fraction(fraction: f64) -> Self {
        Self::new((fraction.clamp(0.0, 1.0) * 100.0).round() as u32)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

/// Everything needed to produce one encoded bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: Arc<SourceImage>,
    /// Density scale applied to the intrinsic size.
    pub scale: f64,
    /// Target surface size, already rounded up.
    pub width: u32,
    pub height: u32,
    pub format: &'static ImageFormat,
    /// `None` when the format has no quality setting.
    pub quality: Option<Quality>,
}
