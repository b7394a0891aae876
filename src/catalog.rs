//! Fixed catalogs of pixel densities and image formats.
//!
//! Both catalogs are static tables: every [`Density`] and [`ImageFormat`] lives
//! for the whole process and is handed out as a `&'static` reference. Lookups
//! are by name, and two values are equal exactly when their names are equal, so
//! a value looked up twice compares equal to itself.
//!
//! ## Densities
//!
//! | Name | Scale | Selected by default |
//! |---|---|---|
//! | `ldpi` | 0.75 | no |
//! | `mdpi` | 1 | yes |
//! | `hdpi` | 1.5 | yes |
//! | `xhdpi` | 2 | yes |
//! | `xxhdpi` | 3 | yes |
//! | `xxxhdpi` | 4 | yes |
//!
//! ## Formats
//!
//! | Name | MIME type | Extension | Quality | Vector |
//! |---|---|---|---|---|
//! | `WEBP` | `image/webp` | `webp` | yes | no |
//! | `PNG` | `image/png` | `png` | no | no |
//! | `JPEG` | `image/jpeg` | `jpg` | yes | no |
//! | `SVG` | `image/svg+xml` | `svg` | no | yes |
//!
//! Vector formats are only ever a *source* format. The output choices are the
//! bitmap subset, in the order listed above.

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown density: {0}")]
    UnknownDensity(String),
    #[error("unknown format: {0}")]
    UnknownFormat(String),
}

/// A target pixel-density bucket.
#[derive(Debug, Serialize)]
pub struct Density {
    pub name: &'static str,
    /// Multiplier applied to the intrinsic size. Always > 0.
    pub scale: f64,
    /// Whether a fresh selection includes this density.
    pub default_selected: bool,
}

impl PartialEq for Density {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Density {}

impl Hash for Density {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (x{})", self.name, self.scale)
    }
}

pub static LDPI: Density = Density {
    name: "ldpi",
    scale: 0.75,
    default_selected: false,
};
pub static MDPI: Density = Density {
    name: "mdpi",
    scale: 1.0,
    default_selected: true,
};
pub static HDPI: Density = Density {
    name: "hdpi",
    scale: 1.5,
    default_selected: true,
};
pub static XHDPI: Density = Density {
    name: "xhdpi",
    scale: 2.0,
    default_selected: true,
};
pub static XXHDPI: Density = Density {
    name: "xxhdpi",
    scale: 3.0,
    default_selected: true,
};
pub static XXXHDPI: Density = Density {
    name: "xxxhdpi",
    scale: 4.0,
    default_selected: true,
};

/// Every density, in catalog order (ascending scale).
pub static DENSITIES: [&Density; 6] = [&LDPI, &MDPI, &HDPI, &XHDPI, &XXHDPI, &XXXHDPI];

/// Look up a density by its exact name.
pub fn density_by_name(name: &str) -> Result<&'static Density, CatalogError> {
    DENSITIES
        .iter()
        .copied()
        .find(|d| d.name == name)
        .ok_or_else(|| CatalogError::UnknownDensity(name.to_string()))
}

/// An image encoding and what it can do.
#[derive(Debug, Serialize)]
pub struct ImageFormat {
    pub name: &'static str,
    pub mime_type: &'static str,
    /// File extension without the dot.
    pub extension: &'static str,
    /// True only for lossy raster encodings.
    pub supports_quality: bool,
    pub is_vector: bool,
}

impl PartialEq for ImageFormat {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ImageFormat {}

impl Hash for ImageFormat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub static WEBP: ImageFormat = ImageFormat {
    name: "WEBP",
    mime_type: "image/webp",
    extension: "webp",
    supports_quality: true,
    is_vector: false,
};
pub static PNG: ImageFormat = ImageFormat {
    name: "PNG",
    mime_type: "image/png",
    extension: "png",
    supports_quality: false,
    is_vector: false,
};
pub static JPEG: ImageFormat = ImageFormat {
    name: "JPEG",
    mime_type: "image/jpeg",
    extension: "jpg",
    supports_quality: true,
    is_vector: false,
};
pub static SVG: ImageFormat = ImageFormat {
    name: "SVG",
    mime_type: "image/svg+xml",
    extension: "svg",
    supports_quality: false,
    is_vector: true,
};

/// Every known format.
pub static FORMATS: [&ImageFormat; 4] = [&WEBP, &PNG, &JPEG, &SVG];

/// Formats that can be chosen as an output. The first one is the default.
pub static BITMAP_FORMATS: [&ImageFormat; 3] = [&WEBP, &PNG, &JPEG];

/// Look up any format (vector or bitmap) by its exact name.
pub fn format_by_name(name: &str) -> Result<&'static ImageFormat, CatalogError> {
    FORMATS
        .iter()
        .copied()
        .find(|f| f.name == name)
        .ok_or_else(|| CatalogError::UnknownFormat(name.to_string()))
}

/// Look up an output format. Vector formats are reported as unknown.
pub fn bitmap_format_by_name(name: &str) -> Result<&'static ImageFormat, CatalogError> {
    BITMAP_FORMATS
        .iter()
        .copied()
        .find(|f| f.name == name)
        .ok_or_else(|| CatalogError::UnknownFormat(name.to_string()))
}

/// The output format a new descriptor starts with.
pub fn default_output_format() -> &'static ImageFormat {
    BITMAP_FORMATS[0]
}

/// A user's choice of densities: unique by name, iterated in catalog order.
///
/// An empty selection is a valid value but cannot be exported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DensitySelection {
    densities: Vec<&'static Density>,
}

impl DensitySelection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The densities marked `default_selected` in the catalog.
    pub fn defaults() -> Self {
        Self {
            densities: DENSITIES
                .iter()
                .copied()
                .filter(|d| d.default_selected)
                .collect(),
        }
    }

    /// Build a selection from names. Duplicates collapse; unknown names fail.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, CatalogError> {
        let mut selection = Self::empty();
        for name in names {
            selection.insert(density_by_name(name.as_ref())?);
        }
        Ok(selection)
    }

    pub fn insert(&mut self, density: &'static Density) {
        if self.contains(density) {
            return;
        }
        self.densities.push(density);
        self.densities
            .sort_by_key(|d| DENSITIES.iter().position(|c| c == d));
    }

    pub fn remove(&mut self, density: &Density) {
        self.densities.retain(|d| *d != density);
    }

    /// Add the density if absent, remove it if present.
    pub fn toggle(&mut self, density: &'static Density) {
        if self.contains(density) {
            self.remove(density);
        } else {
            self.insert(density);
        }
    }

    pub fn contains(&self, density: &Density) -> bool {
        self.densities.iter().any(|d| *d == density)
    }

    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.densities.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Density> + '_ {
        self.densities.iter().copied()
    }

    pub fn as_slice(&self) -> &[&'static Density] {
        &self.densities
    }
}
