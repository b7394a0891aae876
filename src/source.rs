//! Source vector images.
//!
//! A [`SourceImage`] is the immutable input to a conversion: vector bytes plus
//! the intrinsic size the design tool declared for them. Sources are shared
//! between descriptor versions through an `Arc` and are never modified.
//!
//! [`load_sources`] is the file-system provider used by the CLI: it accepts
//! `.svg` files and directories of them, and reads the intrinsic size from the
//! SVG document itself.

use crate::catalog::{self, ImageFormat};
use resvg::usvg;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to parse SVG {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Source format {0} is not a vector format")]
    NotVector(String),
    #[error(transparent)]
    Catalog(#[from] catalog::CatalogError),
    #[error("Invalid intrinsic size {width}x{height} for {name}")]
    InvalidSize { name: String, width: f64, height: f64 },
    #[error("No vector images found; select at least one .svg file or directory")]
    NoSources,
}

/// Vector bytes plus declared intrinsic size, as exported by the design tool.
#[derive(Debug, PartialEq)]
pub struct SourceImage {
    pub display_name: String,
    pub intrinsic_width: f64,
    pub intrinsic_height: f64,
    pub format: &'static ImageFormat,
    pub bytes: Vec<u8>,
}

impl SourceImage {
    /// Build a record, checking the size is positive and the format is a vector one.
    pub fn new(
        display_name: impl Into<String>,
        intrinsic_width: f64,
        intrinsic_height: f64,
        format_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, SourceError> {
        let display_name = display_name.into();
        let format = catalog::format_by_name(format_name)?;
        if !format.is_vector {
            return Err(SourceError::NotVector(format.name.to_string()));
        }
        // Written this way round so NaN is rejected too.
        if !(intrinsic_width > 0.0 && intrinsic_height > 0.0) {
            return Err(SourceError::InvalidSize {
                name: display_name,
                width: intrinsic_width,
                height: intrinsic_height,
            });
        }
        Ok(Self {
            display_name,
            intrinsic_width,
            intrinsic_height,
            format,
            bytes,
        })
    }

    /// Read an SVG file, taking the display name from the file stem.
    pub fn from_svg_file(path: &Path) -> Result<Self, SourceError> {
        let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (width, height) = svg_size(&bytes).map_err(|message| SourceError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, width, height, catalog::SVG.name, bytes)
    }
}

/// Intrinsic size of an SVG document in user units.
pub fn svg_size(bytes: &[u8]) -> Result<(f64, f64), String> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default()).map_err(|e| e.to_string())?;
    let size = tree.size();
    Ok((f64::from(size.width()), f64::from(size.height())))
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Collect sources from files and directories.
///
/// Files are taken as given. Directories are walked recursively for `.svg`
/// files, sorted by path so repeated runs see the same order.
pub fn load_sources(inputs: &[PathBuf]) -> Result<Vec<Arc<SourceImage>>, SourceError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input) {
                let entry = entry?;
                if entry.file_type().is_file() && is_svg(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }

    if paths.is_empty() {
        return Err(SourceError::NoSources);
    }

    paths
        .iter()
        .map(|path| {
            tracing::debug!(path = %path.display(), "loading source");
            SourceImage::from_svg_file(path).map(Arc::new)
        })
        .collect()
}
