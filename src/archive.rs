//! Archive assembly.
//!
//! An [`ArchiveBuilder`] turns a path → bytes mapping into one archive blob.
//! The production builder writes a zip file with the `zip` crate.
//!
//! Entries are *stored*, not deflated: every entry is an already-compressed
//! bitmap. Entry timestamps are pinned to the zip epoch (1980-01-01) so the
//! same entries always produce the same bytes.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Path → bytes, sorted by path. Inserting an existing path replaces it.
pub type ArchiveEntries = BTreeMap<String, Vec<u8>>;

/// Serializes entries into one archive blob.
pub trait ArchiveBuilder: Sync {
    fn build(&self, entries: &ArchiveEntries) -> Result<Vec<u8>, ArchiveError>;
}

/// Builds `.zip` archives in memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiveBuilder;

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self
    }
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default())
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn build(&self, entries: &ArchiveEntries) -> Result<Vec<u8>, ArchiveError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, bytes) in entries {
            writer.start_file(path.as_str(), entry_options())?;
            writer.write_all(bytes)?;
        }
        Ok(writer.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::read_zip;

    fn entries(pairs: &[(&str, &[u8])]) -> ArchiveEntries {
        pairs
            .iter()
            .map(|(path, bytes)| (path.to_string(), bytes.to_vec()))
            .collect()
    }

    #[test]
    fn zip_round_trips_entries() {
        let input = entries(&[
            ("res/drawable-mdpi/icon.png", b"one"),
            ("res/drawable-hdpi/icon.png", b"two"),
        ]);
        let blob = ZipArchiveBuilder::new().build(&input).unwrap();

        assert_eq!(read_zip(&blob), input);
    }

    #[test]
    fn empty_archive_is_valid() {
        let blob = ZipArchiveBuilder::new().build(&ArchiveEntries::new()).unwrap();
        assert!(read_zip(&blob).is_empty());
    }

    #[test]
    fn identical_entries_give_identical_bytes() {
        let input = entries(&[("res/a/x.png", b"abc"), ("res/b/x.png", b"def")]);
        let builder = ZipArchiveBuilder::new();
        assert_eq!(builder.build(&input).unwrap(), builder.build(&input).unwrap());
    }

    #[test]
    fn entries_are_stored_uncompressed() {
        let input = entries(&[("res/a/x.png", &[7u8; 256])]);
        let blob = ZipArchiveBuilder::new().build(&input).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(blob)).unwrap();
        let file = archive.by_name("res/a/x.png").unwrap();
        assert_eq!(file.compression(), CompressionMethod::Stored);
        assert_eq!(file.size(), 256);
    }
}
