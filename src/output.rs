//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Catalogs
//!
//! ```text
//! [ ] ldpi (x0.75)
//! [x] mdpi (x1)
//! [x] hdpi (x1.5)
//! ```
//!
//! ```text
//! WEBP  image/webp     .webp  quality
//! PNG   image/png      .png
//! JPEG  image/jpeg     .jpg   quality
//! SVG   image/svg+xml  .svg   source only
//! ```
//!
//! ## Plan
//!
//! ```text
//! 001 icon (24x24 → WEBP)
//!     res/drawable-mdpi/icon.webp  24x24  q100
//!     res/drawable-hdpi/icon.webp  36x36  q100
//!
//! 2 entries for 1 image at 2 densities
//! ```
//!
//! ## Export
//!
//! ```text
//! icon
//!     mdpi: 312 bytes
//!     hdpi: 455 bytes
//! logo: failed (Failed to decode vector source: ...)
//! Archive: 4 entries, 1830 bytes
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::catalog::{self, DensitySelection};
use crate::export::{ExportEvent, ExportRequest};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn count(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

// ============================================================================
// Catalogs
// ============================================================================

/// Every catalog density, checked when it is in `selected`.
pub fn format_density_catalog(selected: &DensitySelection) -> Vec<String> {
    catalog::DENSITIES
        .iter()
        .map(|density| {
            let mark = if selected.contains(density) { 'x' } else { ' ' };
            format!("[{mark}] {density}")
        })
        .collect()
}

pub fn print_density_catalog(selected: &DensitySelection) {
    for line in format_density_catalog(selected) {
        println!("{}", line);
    }
}

/// Every catalog format with its MIME type, extension and capabilities.
pub fn format_format_catalog() -> Vec<String> {
    catalog::FORMATS
        .iter()
        .map(|format| {
            let note = if format.is_vector {
                "source only"
            } else if format.supports_quality {
                "quality"
            } else {
                ""
            };
            format!(
                "{:<5} {:<14} {:<6} {}",
                format.name,
                format.mime_type,
                format!(".{}", format.extension),
                note
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

pub fn print_format_catalog() {
    for line in format_format_catalog() {
        println!("{}", line);
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Format a validated request as the list of entries it will write.
///
/// Paths written more than once are listed as warnings at the end.
pub fn format_plan(request: &ExportRequest) -> Vec<String> {
    let mut lines = Vec::new();
    let plan = request.plan();
    let per_descriptor = request.densities().len().max(1);

    for (i, (descriptor, entries)) in request
        .descriptors()
        .iter()
        .zip(plan.chunks(per_descriptor))
        .enumerate()
    {
        let source = descriptor.source();
        lines.push(format!(
            "{} {} ({}x{} → {})",
            format_index(i + 1),
            descriptor.name().unwrap_or_default(),
            source.intrinsic_width,
            source.intrinsic_height,
            descriptor.output_format().name
        ));
        for entry in entries {
            let quality = entry
                .quality
                .map(|q| format!("  q{q}"))
                .unwrap_or_default();
            lines.push(format!(
                "{}{}  {}x{}{}",
                indent(1),
                entry.path,
                entry.width,
                entry.height,
                quality
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} for {} at {}",
        count(plan.len(), "entry", "entries"),
        count(request.descriptors().len(), "image", "images"),
        count(request.densities().len(), "density", "densities"),
    ));

    for (path, times) in request.collisions() {
        lines.push(format!(
            "Warning: {path} is written {times} times; the last image wins"
        ));
    }
    lines
}

pub fn print_plan(request: &ExportRequest) {
    for line in format_plan(request) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format a single export progress event as display lines.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::DescriptorConverted { name, blobs } => {
            let mut lines = vec![name.clone()];
            for (density, size) in blobs {
                lines.push(format!("{}{}: {} bytes", indent(1), density, size));
            }
            lines
        }
        ExportEvent::DescriptorFailed { name, error } => {
            vec![format!("{}: failed ({})", name, error)]
        }
        ExportEvent::ArchiveBuilt { entries, bytes } => {
            vec![format!(
                "Archive: {}, {} bytes",
                count(*entries, "entry", "entries"),
                bytes
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_descriptor;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn count_picks_word_form() {
        assert_eq!(count(1, "entry", "entries"), "1 entry");
        assert_eq!(count(2, "entry", "entries"), "2 entries");
        assert_eq!(count(0, "image", "images"), "0 images");
    }

    // =========================================================================
    // Catalogs
    // =========================================================================

    #[test]
    fn density_catalog_marks_selection() {
        let lines = format_density_catalog(&DensitySelection::defaults());
        assert_eq!(
            lines,
            vec![
                "[ ] ldpi (x0.75)",
                "[x] mdpi (x1)",
                "[x] hdpi (x1.5)",
                "[x] xhdpi (x2)",
                "[x] xxhdpi (x3)",
                "[x] xxxhdpi (x4)",
            ]
        );
    }

    #[test]
    fn format_catalog_lists_all_formats() {
        let lines = format_format_catalog();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "WEBP  image/webp     .webp  quality");
        assert_eq!(lines[1], "PNG   image/png      .png");
        assert!(lines[3].ends_with("source only"));
    }

    // =========================================================================
    // Plan
    // =========================================================================

    fn request(
        descriptors: Vec<crate::descriptor::ConversionDescriptor>,
        densities: &[&str],
    ) -> ExportRequest {
        ExportRequest::validate(
            descriptors,
            DensitySelection::from_names(densities).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn plan_groups_entries_by_image() {
        let req = request(
            vec![sample_descriptor("icon", 24, 24)],
            &["mdpi", "hdpi"],
        );
        let lines = format_plan(&req);
        assert_eq!(
            lines,
            vec![
                "001 icon (24x24 → WEBP)",
                "    res/drawable-mdpi/icon.webp  24x24  q100",
                "    res/drawable-hdpi/icon.webp  36x36  q100",
                "",
                "2 entries for 1 image at 2 densities",
            ]
        );
    }

    #[test]
    fn plan_shows_jpeg_quality() {
        let descriptor = sample_descriptor("photo", 10, 10)
            .with_format("JPEG")
            .unwrap()
            .with_quality_text(Some("80".into()));
        let lines = format_plan(&request(vec![descriptor], &["xhdpi"]));
        assert_eq!(lines[1], "    res/drawable-xhdpi/photo.jpg  20x20  q80");
        assert_eq!(lines[3], "1 entry for 1 image at 1 density");
    }

    #[test]
    fn plan_warns_about_collisions() {
        let req = request(
            vec![
                sample_descriptor("a", 8, 8).with_name(Some("same".into())),
                sample_descriptor("b", 8, 8).with_name(Some("same".into())),
            ],
            &["mdpi"],
        );
        let lines = format_plan(&req);
        assert_eq!(
            lines.last().unwrap(),
            "Warning: res/drawable-mdpi/same.webp is written 2 times; the last image wins"
        );
    }

    // =========================================================================
    // Export events
    // =========================================================================

    #[test]
    fn converted_event_lists_densities() {
        let lines = format_export_event(&ExportEvent::DescriptorConverted {
            name: "icon".into(),
            blobs: vec![("mdpi", 120), ("hdpi", 240)],
        });
        assert_eq!(lines, vec!["icon", "    mdpi: 120 bytes", "    hdpi: 240 bytes"]);
    }

    #[test]
    fn failed_event_shows_error() {
        let lines = format_export_event(&ExportEvent::DescriptorFailed {
            name: "logo".into(),
            error: "boom".into(),
        });
        assert_eq!(lines, vec!["logo: failed (boom)"]);
    }

    #[test]
    fn archive_event_shows_totals() {
        let lines = format_export_event(&ExportEvent::ArchiveBuilt {
            entries: 1,
            bytes: 99,
        });
        assert_eq!(lines, vec!["Archive: 1 entry, 99 bytes"]);
    }
}
