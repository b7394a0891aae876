//! Shared test utilities.
//!
//! Builds in-memory sources and descriptors without touching the file
//! system, and reads archives back into a path → bytes map.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let descriptor = sample_descriptor("icon", 24, 24);
//! let blob = export_all(&MockBackend::new(), &ZipArchiveBuilder::new(),
//!     &[descriptor], &DensitySelection::defaults(), "drawable-{}", None).unwrap();
//!
//! let entries = read_zip(&blob);
//! assert!(entries.contains_key("res/drawable-hdpi/icon.webp"));
//! ```

use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::archive::ArchiveEntries;
use crate::descriptor::ConversionDescriptor;
use crate::source::SourceImage;

// =========================================================================
// Sources
// =========================================================================

/// A `w`×`h` SVG completely covered by an opaque red rectangle.
pub fn square_svg(width: u32, height: u32) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><rect x="0" y="0" width="{width}" height="{height}" fill="#ff0000"/></svg>"##
    )
}

/// A shared SVG source named `name` with the given intrinsic size.
pub fn sample_source(name: &str, width: u32, height: u32) -> Arc<SourceImage> {
    Arc::new(
        SourceImage::new(
            name,
            f64::from(width),
            f64::from(height),
            "SVG",
            square_svg(width, height).into_bytes(),
        )
        .unwrap(),
    )
}

/// A descriptor with default settings over [`sample_source`].
pub fn sample_descriptor(name: &str, width: u32, height: u32) -> ConversionDescriptor {
    ConversionDescriptor::new(sample_source(name, width, height))
}

// =========================================================================
// Archives
// =========================================================================

/// Read every file of a zip archive. Panics on a malformed archive.
pub fn read_zip(blob: &[u8]) -> ArchiveEntries {
    let mut archive = zip::ZipArchive::new(Cursor::new(blob)).unwrap();
    let mut entries = ArchiveEntries::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).unwrap();
        entries.insert(file.name().to_string(), bytes);
    }
    entries
}
