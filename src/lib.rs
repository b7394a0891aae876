//! # svg2res
//!
//! Exports vector images as Android density-bucketed bitmaps, packed into one
//! `res.zip` that unzips straight over a project's `res/` directory.
//!
//! # Architecture: Descriptor → Renders → Archive
//!
//! ```text
//! 1. Source     .svg files        →  SourceImage        (bytes + intrinsic size)
//! 2. Describe   SourceImage       →  ConversionDescriptor (name, format, quality)
//! 3. Gate       descriptors       →  ExportRequest      (everything exportable?)
//! 4. Convert    descriptor × D    →  D bitmaps          (parallel, fail-fast)
//! 5. Archive    N × D bitmaps     →  res.zip            (res/<dir>/<name>.<ext>)
//! ```
//!
//! Rendering is behind the [`imaging::RasterBackend`] trait and packaging
//! behind [`archive::ArchiveBuilder`], so the orchestration in [`convert`] and
//! [`export`] is tested against in-memory mocks without drawing or zipping.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Fixed density and format tables, density selection |
//! | [`source`] | Source vector records and the `.svg` file loader |
//! | [`naming`] | Name, quality and directory grammars; archive path templating |
//! | [`descriptor`] | Per-image export settings and their validation |
//! | [`imaging`] | Render planning, the backend trait, the resvg backend |
//! | [`convert`] | One descriptor across every selected density |
//! | [`export`] | Every descriptor into one archive; the eligibility gate |
//! | [`archive`] | Zip packaging |
//! | [`config`] | `svg2res.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Native Rendering Per Density
//!
//! Each density is drawn from the vector paths onto a surface of its own
//! size, never resampled from another density's bitmap. An `x0.75` icon is as
//! sharp as the `x4` one.
//!
//! ## Sizes Round Up
//!
//! Target dimensions are `ceil(intrinsic × scale)`, so a 10×7 icon becomes
//! 8×6 at ldpi rather than losing its last row of pixels.
//!
//! ## All Or Nothing
//!
//! One failed render fails its descriptor, and one failed descriptor fails the
//! export. A partial archive would overwrite a project's existing drawables
//! with an incomplete set, so none is produced.
//!
//! ## Deterministic Archives
//!
//! Entries are sorted by path and carry a fixed timestamp. Exporting the same
//! images twice yields byte-identical archives, which keeps them diffable.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod convert;
pub mod descriptor;
pub mod export;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
