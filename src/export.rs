//! Export of every descriptor into one resource archive.
//!
//! ## Pipeline
//!
//! ```text
//! descriptors (N) ──par──► convert_all × densities (N×D renders)
//!                 ──join──► all N settled?  any failure → ExportError
//!                 ──paths─► res/<template with {} → density>/<name>.<ext>
//!                 ──build─► ArchiveBuilder → archive bytes
//! ```
//!
//! Descriptors are converted in parallel and the export waits for all of
//! them. Unlike the per-density join inside [`convert_all`], one failed
//! descriptor does not stop the others from running, but it does fail the
//! export: bitmaps from descriptors that succeeded are discarded, since a
//! partial archive would look complete.
//!
//! ## Collisions
//!
//! Two descriptors with the same name and format land on the same path in
//! every density directory. The later one (descriptor order, then density
//! order) silently replaces the earlier. Keeping names unique is up to the
//! caller; [`ExportRequest::collisions`] lists the clashing paths so the CLI
//! can warn about them.
//!
//! ## Eligibility
//!
//! [`ExportRequest::validate`] is the gate in front of [`export_all`]: it
//! rejects an empty density selection, descriptors that cannot be exported,
//! and a malformed directory template override. The check happens before any
//! rendering starts.

use crate::archive::{ArchiveBuilder, ArchiveEntries, ArchiveError};
use crate::catalog::DensitySelection;
use crate::convert::{ConversionFailed, ConversionResult, convert_all};
use crate::descriptor::{ConversionDescriptor, ExportBlocker};
use crate::imaging::{RasterBackend, plan_render};
use crate::naming;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export failed: {0}")]
    Conversion(#[from] ConversionFailed),
    #[error("Export failed while building the archive: {0}")]
    Archive(#[from] ArchiveError),
}

/// A precondition for exporting is not met. Nothing has been rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No densities selected")]
    NoDensities,
    #[error("No images to export")]
    NoImages,
    #[error("Image #{index} ({source_name}) cannot be exported: {reason}")]
    NotExportable {
        /// 1-based position in the descriptor list.
        index: usize,
        source_name: String,
        reason: ExportBlocker,
    },
    #[error("Invalid directory name {0:?}: expected letters, digits or dashes around one {{}}")]
    InvalidDirectoryTemplate(String),
}

/// Progress reported while an export runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    DescriptorConverted {
        name: String,
        /// `(density name, encoded size in bytes)` per density.
        blobs: Vec<(&'static str, usize)>,
    },
    DescriptorFailed {
        name: String,
        error: String,
    },
    ArchiveBuilt {
        entries: usize,
        bytes: usize,
    },
}

/// One file of the archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Lay out conversion results as archive entries, in iteration order.
pub fn archive_entries(results: &[ConversionResult], directory_template: &str) -> Vec<ArchiveEntry> {
    results
        .iter()
        .flat_map(|result| {
            let name = result.descriptor.name().unwrap_or_default();
            let format = result.descriptor.output_format();
            result.blobs.iter().map(move |blob| ArchiveEntry {
                path: naming::archive_path(directory_template, blob.density, name, format),
                bytes: blob.bytes.clone(),
            })
        })
        .collect()
}

/// Convert every descriptor and package all bitmaps into one archive.
///
/// The template is used as given; validate user input with
/// [`ExportRequest::validate`] first.
pub fn export_all(
    backend: &impl RasterBackend,
    archive: &impl ArchiveBuilder,
    descriptors: &[ConversionDescriptor],
    densities: &DensitySelection,
    directory_template: &str,
    events: Option<&Sender<ExportEvent>>,
) -> Result<Vec<u8>, ExportError> {
    let outcomes: Vec<Result<ConversionResult, ConversionFailed>> = descriptors
        .par_iter()
        .map(|descriptor| {
            let outcome = convert_all(backend, descriptor, densities);
            if let Some(tx) = events {
                tx.send(conversion_event(descriptor, &outcome)).ok();
            }
            outcome
        })
        .collect();

    let results = outcomes
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| tracing::warn!(error = %e, "export aborted"))?;

    let mut entries = ArchiveEntries::new();
    for entry in archive_entries(&results, directory_template) {
        if entries.insert(entry.path.clone(), entry.bytes).is_some() {
            tracing::debug!(path = %entry.path, "archive entry replaced by a later render");
        }
    }

    let blob = archive.build(&entries)?;
    tracing::info!(entries = entries.len(), bytes = blob.len(), "archive built");
    if let Some(tx) = events {
        tx.send(ExportEvent::ArchiveBuilt {
            entries: entries.len(),
            bytes: blob.len(),
        })
        .ok();
    }
    Ok(blob)
}

fn conversion_event(
    descriptor: &ConversionDescriptor,
    outcome: &Result<ConversionResult, ConversionFailed>,
) -> ExportEvent {
    let name = descriptor
        .name()
        .unwrap_or(&descriptor.source().display_name)
        .to_string();
    match outcome {
        Ok(result) => ExportEvent::DescriptorConverted {
            name,
            blobs: result
                .blobs
                .iter()
                .map(|b| (b.density.name, b.bytes.len()))
                .collect(),
        },
        Err(e) => ExportEvent::DescriptorFailed {
            name,
            error: e.source.to_string(),
        },
    }
}

/// A planned archive entry, computed without rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedEntry {
    pub path: String,
    pub density: &'static str,
    pub width: u32,
    pub height: u32,
    pub format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
}

/// List the entries an export would write, in write order, without rendering.
pub fn plan_entries(
    descriptors: &[ConversionDescriptor],
    densities: &DensitySelection,
    directory_template: &str,
) -> Vec<PlannedEntry> {
    descriptors
        .iter()
        .flat_map(|descriptor| {
            densities.iter().map(move |density| {
                let params = plan_render(descriptor, density);
                PlannedEntry {
                    path: naming::archive_path(
                        directory_template,
                        density,
                        descriptor.name().unwrap_or_default(),
                        descriptor.output_format(),
                    ),
                    density: density.name,
                    width: params.width,
                    height: params.height,
                    format: params.format.name,
                    quality: params.quality.map(|q| q.value()),
                }
            })
        })
        .collect()
}

/// Descriptors, densities and directory template that passed the eligibility gate.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    descriptors: Vec<ConversionDescriptor>,
    densities: DensitySelection,
    directory_template: String,
}

impl ExportRequest {
    /// Check every export precondition.
    ///
    /// An empty override counts as no override and selects
    /// [`DEFAULT_DIRECTORY_TEMPLATE`](naming::DEFAULT_DIRECTORY_TEMPLATE).
    pub fn validate(
        descriptors: Vec<ConversionDescriptor>,
        densities: DensitySelection,
        directory_override: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if densities.is_empty() {
            return Err(ValidationError::NoDensities);
        }
        if descriptors.is_empty() {
            return Err(ValidationError::NoImages);
        }
        for (i, descriptor) in descriptors.iter().enumerate() {
            if let Some(reason) = descriptor.export_blocker() {
                return Err(ValidationError::NotExportable {
                    index: i + 1,
                    source_name: descriptor.source().display_name.clone(),
                    reason,
                });
            }
        }

        let directory_template = match directory_override.filter(|t| !t.is_empty()) {
            Some(template) if !naming::is_valid_directory_template(template) => {
                return Err(ValidationError::InvalidDirectoryTemplate(template.to_string()));
            }
            Some(template) => template.to_string(),
            None => naming::DEFAULT_DIRECTORY_TEMPLATE.to_string(),
        };

        Ok(Self {
            descriptors,
            densities,
            directory_template,
        })
    }

    pub fn descriptors(&self) -> &[ConversionDescriptor] {
        &self.descriptors
    }

    pub fn densities(&self) -> &DensitySelection {
        &self.densities
    }

    pub fn directory_template(&self) -> &str {
        &self.directory_template
    }

    /// Every entry the export will write, in write order.
    pub fn plan(&self) -> Vec<PlannedEntry> {
        plan_entries(&self.descriptors, &self.densities, &self.directory_template)
    }

    /// Paths that more than one render will write, with their write counts.
    pub fn collisions(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for entry in self.plan() {
            *counts.entry(entry.path).or_default() += 1;
        }
        counts.retain(|_, n| *n > 1);
        counts
    }

    /// Run the export.
    pub fn run(
        &self,
        backend: &impl RasterBackend,
        archive: &impl ArchiveBuilder,
        events: Option<&Sender<ExportEvent>>,
    ) -> Result<Vec<u8>, ExportError> {
        export_all(
            backend,
            archive,
            &self.descriptors,
            &self.densities,
            &self.directory_template,
            events,
        )
    }
}
