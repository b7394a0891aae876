//! High-level rasterization operations.
//!
//! These functions combine calculations with backend execution: they read a
//! descriptor, compute the render parameters for one density, and call the
//! backend.

use super::backend::{RasterBackend, RasterizationError};
use super::calculations::target_dimensions;
use super::params::{Quality, RenderParams};
use crate::catalog::Density;
use crate::descriptor::ConversionDescriptor;
use std::sync::Arc;

/// Plan a render without executing it.
///
/// Quality is only attached when the output format supports it.
pub fn plan_render(descriptor: &ConversionDescriptor, density: &Density) -> RenderParams {
    let source = descriptor.source();
    let (width, height) =
        target_dimensions(source.intrinsic_width, source.intrinsic_height, density.scale);
    let format = descriptor.output_format();

    RenderParams {
        source: Arc::clone(source),
        scale: density.scale,
        width,
        height,
        format,
        quality: format
            .supports_quality
            .then(|| Quality::from_fraction(descriptor.quality_fraction())),
    }
}

/// Rasterize one descriptor at one density.
pub fn rasterize(
    backend: &impl RasterBackend,
    descriptor: &ConversionDescriptor,
    density: &Density,
) -> Result<Vec<u8>, RasterizationError> {
    let params = plan_render(descriptor, density);
    tracing::debug!(
        resource = descriptor.name().unwrap_or_default(),
        density = density.name,
        width = params.width,
        height = params.height,
        format = params.format.name,
        "rasterizing"
    );
    backend.render(&params)
}
