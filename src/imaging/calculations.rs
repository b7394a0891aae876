//! Pure calculation functions for surface dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Target surface size for rendering an intrinsic size at a density scale.
///
/// Each edge is rounded up, so a fractional result never clips the vector.
///
/// # Examples
/// ```
/// # use svg2res::imaging::target_dimensions;
/// // 24x24 icon at hdpi (x1.5) → 36x36
/// assert_eq!(target_dimensions(24.0, 24.0, 1.5), (36, 36));
///
/// // 10x7 at ldpi (x0.75) → 7.5x5.25 → 8x6
/// assert_eq!(target_dimensions(10.0, 7.0, 0.75), (8, 6));
/// ```
pub fn target_dimensions(width: f64, height: f64, scale: f64) -> (u32, u32) {
    (scaled_edge(width, scale), scaled_edge(height, scale))
}

fn scaled_edge(edge: f64, scale: f64) -> u32 {
    (edge * scale).ceil() as u32
}
