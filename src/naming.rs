//! Naming grammars and archive path templating.
//!
//! Every archive entry path is built from three user-controlled parts:
//!
//! ```text
//! res/<directory template with {} → density>/<name>.<extension>
//! res/drawable-xhdpi/icon.png
//! ```
//!
//! ## Grammars
//!
//! - **Resource name**: `^[A-Za-z0-9_]+$`. Android rejects resource files with
//!   dashes, dots or spaces in the stem.
//! - **Quality percentage**: an integer in `0..=100` written exactly as its
//!   canonical decimal form, so `"80"` is valid and `"080"`, `"+80"`, `"80.0"`
//!   and `" 80"` are not.
//! - **Directory template**: `[A-Za-z0-9-]+\{\}[A-Za-z0-9-]*`, e.g.
//!   `drawable-{}` or `drawable-ja-{}-v29`.
//!
//! The template grammar is only enforced on a user-supplied override. Path
//! construction itself substitutes the first `{}` and otherwise uses the
//! template verbatim, so a template without a placeholder sends every density
//! into the same directory.

use crate::catalog::{Density, ImageFormat};
use regex::Regex;
use std::sync::LazyLock;

/// Directory template used when the user supplies none.
pub const DEFAULT_DIRECTORY_TEMPLATE: &str = "drawable-{}";

/// Top-level directory of every archive entry.
pub const ARCHIVE_ROOT: &str = "res";

/// File name offered for the downloaded archive.
pub const ARCHIVE_FILE_NAME: &str = "res.zip";

const PLACEHOLDER: &str = "{}";

static RESOURCE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("resource name pattern is valid"));

static DIRECTORY_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9-]+\{\}[A-Za-z0-9-]*$").expect("directory template pattern is valid")
});

/// True if `name` can be used as a resource file stem.
pub fn is_valid_resource_name(name: &str) -> bool {
    RESOURCE_NAME.is_match(name)
}

/// True if `template` is a one-placeholder directory template.
pub fn is_valid_directory_template(template: &str) -> bool {
    DIRECTORY_TEMPLATE.is_match(template)
}

/// Parse a quality percentage.
///
/// Returns `Some(percent)` only for canonical integers in `0..=100`; the text
/// must survive a parse/format round trip unchanged.
pub fn parse_quality_percentage(text: &str) -> Option<u32> {
    let value: u32 = text.parse().ok()?;
    (value <= 100 && value.to_string() == text).then_some(value)
}

/// Substitute the density name for the first `{}` in the template.
pub fn directory_name(template: &str, density: &Density) -> String {
    template.replacen(PLACEHOLDER, density.name, 1)
}

/// `<name>.<extension>`
pub fn file_name(name: &str, format: &ImageFormat) -> String {
    format!("{}.{}", name, format.extension)
}

/// Full archive path for one rasterized bitmap.
pub fn archive_path(template: &str, density: &Density, name: &str, format: &ImageFormat) -> String {
    format!(
        "{}/{}/{}",
        ARCHIVE_ROOT,
        directory_name(template, density),
        file_name(name, format)
    )
}

/// Derive a resource name from an arbitrary display name.
///
/// Characters outside `[A-Za-z0-9_]` become underscores. Used to suggest a
/// name for design objects like `"Icon / Home"`; the result is only a
/// suggestion and still has to pass [`is_valid_resource_name`].
pub fn suggest_resource_name(display_name: &str) -> String {
    display_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
