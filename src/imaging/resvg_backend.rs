//! Pure Rust rasterization backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Parse SVG | `usvg::Tree::from_data` (re-exported by `resvg`) |
//! | Allocate surface | `tiny_skia::Pixmap::new` |
//! | Draw | `resvg::render` with `Transform::from_scale(sx, sy)` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (straight RGBA) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (RGB, quality 1-100) |
//! | Encode → WebP | `webp::Encoder::encode_simple` (lossy, quality 1-100) |
//!
//! The vector is drawn directly onto a surface of the target size under a
//! scale transform, so every density is rendered natively from the paths
//! instead of being resampled from a fixed-size bitmap. The transform first
//! stretches the document onto the declared intrinsic size, then applies the
//! density scale, so a record whose declared size differs from the document's
//! own size still fills its surface.
//!
//! JPEG has no alpha channel. Transparent areas are composited over black,
//! which is what a browser canvas produces, and conveniently equals the
//! premultiplied colour channels tiny-skia already stores.

use super::backend::{RasterBackend, RasterizationError};
use super::params::RenderParams;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use resvg::{tiny_skia, usvg};

/// Backend built on `resvg` for drawing, `image` and `webp` for encoding.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct ResvgBackend;

impl ResvgBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the vector source into a render tree.
fn parse_tree(bytes: &[u8]) -> Result<usvg::Tree, RasterizationError> {
    usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| RasterizationError::Decode(e.to_string()))
}

/// Scale factors mapping document user units onto the target surface.
///
/// The document is fitted to the declared intrinsic box, then the density
/// scale is applied.
fn fit_scale(tree: &usvg::Tree, params: &RenderParams) -> (f32, f32) {
    let size = tree.size();
    let sx = params.scale * params.source.intrinsic_width / f64::from(size.width());
    let sy = params.scale * params.source.intrinsic_height / f64::from(size.height());
    (sx as f32, sy as f32)
}

/// Draw the tree onto a fresh surface of the target size.
fn draw(tree: &usvg::Tree, params: &RenderParams) -> Result<tiny_skia::Pixmap, RasterizationError> {
    let (width, height) = (params.width, params.height);
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterizationError::Surface { width, height })?;
    let (sx, sy) = fit_scale(tree, params);
    resvg::render(
        tree,
        tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

/// Un-premultiplied RGBA8, as PNG and WebP expect.
fn straight_rgba(pixmap: &tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

/// RGB8 composited over black.
fn rgb_over_black(pixmap: &tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

fn encode(
    pixmap: &tiny_skia::Pixmap,
    params: &RenderParams,
) -> Result<Vec<u8>, RasterizationError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut buf = Vec::new();

    let result = match params.format.name {
        "PNG" => PngEncoder::new(&mut buf).write_image(
            &straight_rgba(pixmap),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        "JPEG" => {
            let quality = params.quality.unwrap_or_default();
            JpegEncoder::new_with_quality(&mut buf, quality.value()).write_image(
                &rgb_over_black(pixmap),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        "WEBP" => {
            let quality = params.quality.unwrap_or_default();
            let rgba = straight_rgba(pixmap);
            return webp::Encoder::from_rgba(&rgba, width, height)
                .encode_simple(false, f32::from(quality.value()))
                .map(|encoded| encoded.to_vec())
                .map_err(|e| RasterizationError::Encode {
                    format: params.format.name.to_string(),
                    message: format!("{e:?}"),
                });
        }
        other => return Err(RasterizationError::UnsupportedFormat(other.to_string())),
    };

    result.map_err(|e| RasterizationError::Encode {
        format: params.format.name.to_string(),
        message: e.to_string(),
    })?;
    Ok(buf)
}

impl RasterBackend for ResvgBackend {
    fn render(&self, params: &RenderParams) -> Result<Vec<u8>, RasterizationError> {
        let tree = parse_tree(&params.source.bytes)?;
        let pixmap = draw(&tree, params)?;
        encode(&pixmap, params)
    }
}
