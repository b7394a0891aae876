//! Per-image export configuration.
//!
//! A [`ConversionDescriptor`] pairs one [`SourceImage`] with the settings the
//! user picked for it: resource name, output format and quality. Descriptors
//! are values: every edit consumes the old descriptor and returns a new one,
//! and the caller swaps it into its collection. The source is shared between
//! versions through an `Arc`.
//!
//! Edits never fail on bad *content*. An invalid name or quality text is kept
//! verbatim so it can be shown and corrected, and [`ConversionDescriptor::can_export`]
//! reports whether the current state is exportable. Only an unknown format
//! name is an error, since there is no sensible value to keep.
//!
//! ## Quality
//!
//! Quality is edited as percentage text (`"0"`..`"100"`). The fraction used by
//! the encoder only follows the text while the text is valid:
//!
//! ```text
//! text "80"  → fraction 0.80
//! text "8O"  → fraction 0.80 (unchanged), can_export() == false
//! text "75"  → fraction 0.75
//! ```
//!
//! Switching to a format without quality support keeps the text, so switching
//! back restores it.

use crate::catalog::{self, CatalogError, ImageFormat};
use crate::naming;
use crate::source::SourceImage;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_QUALITY_TEXT: &str = "100";

/// Why a descriptor cannot be exported right now.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportBlocker {
    #[error("name is empty")]
    MissingName,
    #[error("name {0:?} must only contain letters, digits and underscores")]
    InvalidName(String),
    #[error("quality is empty")]
    MissingQuality,
    #[error("quality {0:?} must be an integer from 0 to 100")]
    InvalidQuality(String),
}

/// Editable export settings for one source image.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionDescriptor {
    source: Arc<SourceImage>,
    name: Option<String>,
    output_format: &'static ImageFormat,
    quality_text: Option<String>,
    quality_fraction: f64,
}

impl ConversionDescriptor {
    /// Defaults: the source's display name, the first bitmap format, quality 100.
    pub fn new(source: Arc<SourceImage>) -> Self {
        let name = Some(source.display_name.clone());
        Self {
            source,
            name,
            output_format: catalog::default_output_format(),
            quality_text: Some(DEFAULT_QUALITY_TEXT.to_string()),
            quality_fraction: 1.0,
        }
    }

    pub fn source(&self) -> &Arc<SourceImage> {
        &self.source
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn output_format(&self) -> &'static ImageFormat {
        self.output_format
    }

    pub fn quality_text(&self) -> Option<&str> {
        self.quality_text.as_deref()
    }

    /// Last valid quality as a fraction in `0.0..=1.0`.
    pub fn quality_fraction(&self) -> f64 {
        self.quality_fraction
    }

    /// Replace the name. Stored verbatim; validity is checked by `can_export`.
    pub fn with_name(self, name: Option<String>) -> Self {
        Self { name, ..self }
    }

    /// Replace the output format by name. Only bitmap formats are accepted.
    pub fn with_format(self, format_name: &str) -> Result<Self, CatalogError> {
        let output_format = catalog::bitmap_format_by_name(format_name)?;
        Ok(Self {
            output_format,
            ..self
        })
    }

    /// Replace the quality text, updating the fraction only if the text is valid.
    pub fn with_quality_text(self, text: Option<String>) -> Self {
        let quality_fraction = text
            .as_deref()
            .and_then(naming::parse_quality_percentage)
            .map(|percent| f64::from(percent) / 100.0)
            .unwrap_or(self.quality_fraction);
        Self {
            quality_text: text,
            quality_fraction,
            ..self
        }
    }

    /// The first reason this descriptor cannot be exported, if any.
    pub fn export_blocker(&self) -> Option<ExportBlocker> {
        match self.name.as_deref() {
            None | Some("") => return Some(ExportBlocker::MissingName),
            Some(name) if !naming::is_valid_resource_name(name) => {
                return Some(ExportBlocker::InvalidName(name.to_string()));
            }
            Some(_) => {}
        }
        if self.output_format.supports_quality {
            match self.quality_text.as_deref() {
                None => return Some(ExportBlocker::MissingQuality),
                Some(text) if naming::parse_quality_percentage(text).is_none() => {
                    return Some(ExportBlocker::InvalidQuality(text.to_string()));
                }
                Some(_) => {}
            }
        }
        None
    }

    pub fn can_export(&self) -> bool {
        self.export_blocker().is_none()
    }

    /// `data:` URI of the source bytes, tagged with the source's MIME type.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.source.format.mime_type,
            STANDARD.encode(&self.source.bytes)
        )
    }
}
