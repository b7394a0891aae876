//! Conversion of one descriptor across a density selection.
//!
//! Every selected density is rasterized in parallel with
//! [rayon](https://docs.rs/rayon). The renders are independent: each owns its
//! own surface and produces its own byte buffer, so nothing is shared while
//! they run.
//!
//! The join is fail-fast. The first failed density fails the whole
//! conversion and no partial set of bitmaps is returned; renders already
//! running are allowed to finish and their output is dropped.

use crate::catalog::{Density, DensitySelection};
use crate::descriptor::ConversionDescriptor;
use crate::imaging::{RasterBackend, RasterizationError, rasterize};
use rayon::prelude::*;
use thiserror::Error;

/// One density's encoded bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityBlob {
    pub density: &'static Density,
    pub bytes: Vec<u8>,
}

/// All bitmaps for one descriptor, in selection order.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub descriptor: ConversionDescriptor,
    pub blobs: Vec<DensityBlob>,
}

impl ConversionResult {
    /// Look up the bitmap rendered for a density.
    pub fn blob_for(&self, density: &Density) -> Option<&DensityBlob> {
        self.blobs.iter().find(|b| b.density == density)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Converting {name} at {density} failed: {source}")]
pub struct ConversionFailed {
    /// Resource name (or display name if the descriptor has none).
    pub name: String,
    pub density: &'static str,
    #[source]
    pub source: RasterizationError,
}

/// Rasterize a descriptor at every selected density.
pub fn convert_all(
    backend: &impl RasterBackend,
    descriptor: &ConversionDescriptor,
    densities: &DensitySelection,
) -> Result<ConversionResult, ConversionFailed> {
    let blobs = densities
        .as_slice()
        .par_iter()
        .map(|&density| {
            rasterize(backend, descriptor, density)
                .map(|bytes| DensityBlob { density, bytes })
                .map_err(|source| ConversionFailed {
                    name: display_name(descriptor),
                    density: density.name,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConversionResult {
        descriptor: descriptor.clone(),
        blobs,
    })
}

fn display_name(descriptor: &ConversionDescriptor) -> String {
    descriptor
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| descriptor.source().display_name.clone())
}
