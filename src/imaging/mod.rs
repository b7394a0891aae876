//! Rasterization of vector sources, one density at a time.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Parse** | `usvg::Tree::from_data` |
//! | **Surface** | `tiny_skia::Pixmap` sized `ceil(w·scale) × ceil(h·scale)` |
//! | **Draw** | `resvg::render` under a uniform `scale` transform |
//! | **Encode** | `image` crate PNG / JPEG / WebP encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for surface dimensions (unit testable)
//! - **Parameters**: Data structures describing one render
//! - **Backend**: [`RasterBackend`] trait + [`ResvgBackend`]
//! - **Operations**: Plan a render from a descriptor and run it on a backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod resvg_backend;

pub use backend::{RasterBackend, RasterizationError};
pub use calculations::target_dimensions;
pub use operations::{plan_render, rasterize};
pub use params::{Quality, RenderParams};
pub use resvg_backend::ResvgBackend;
