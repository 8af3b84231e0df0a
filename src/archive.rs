//! The OCF zip container.

use crate::consts::{layout, ocf};
use crate::datetime::DateTime;
use crate::errors::{EpubResult, PackagingError};
use crate::manifest::{Manifest, Spine};
use crate::writer::zip::{ZipFileOptionsExt, ZipWriter};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// A file to place in the archive.
#[derive(Copy, Clone, Debug)]
struct Entry<'a> {
    /// Container-root-relative archive path.
    path: &'a str,
    data: &'a [u8],
}

/// What the archive contents must satisfy before anything is written.
pub(crate) struct References<'a> {
    pub(crate) manifest: &'a Manifest,
    pub(crate) spine: &'a Spine,
    /// Archive paths linked from navigation.
    pub(crate) nav_targets: &'a [&'a str],
}

/// Archive entries in write order.
///
/// `mimetype` is implicit and always written first.
#[derive(Clone, Debug, Default)]
pub(crate) struct Archive<'a> {
    entries: Vec<Entry<'a>>,
}

impl<'a> Archive<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, path: &'a str, data: &'a [u8]) -> &mut Self {
        self.entries.push(Entry { path, data });
        self
    }

    /// Checks that every reference resolves among the entries.
    ///
    /// # Errors
    /// - [`PackagingError::DuplicateEntry`]: Two entries share a path.
    /// - [`PackagingError::MissingEntry`]: The package document, a manifest item,
    ///   or a navigation target has no entry.
    /// - [`PackagingError::DanglingIdref`]: A spine reference is not a manifest id.
    fn validate(&self, references: &References<'_>) -> Result<(), PackagingError> {
        let mut paths = HashSet::with_capacity(self.entries.len() + 1);
        paths.insert(ocf::MIMETYPE_PATH);

        for entry in &self.entries {
            if !paths.insert(entry.path) {
                return Err(PackagingError::DuplicateEntry(entry.path.to_owned()));
            }
        }

        // Referenced by `META-INF/container.xml`
        if !paths.contains(layout::PACKAGE_PATH) {
            return Err(PackagingError::MissingEntry(layout::PACKAGE_PATH.to_owned()));
        }

        let manifest = references.manifest;
        if let Some(item) = manifest
            .items()
            .iter()
            .find(|item| !paths.contains(item.path.as_str()))
        {
            return Err(PackagingError::MissingEntry(item.path.clone()));
        }

        let spine = references.spine;
        if let Some(idref) = spine
            .idrefs
            .iter()
            .chain([&spine.toc])
            .find(|idref| manifest.get(idref).is_none())
        {
            return Err(PackagingError::DanglingIdref(idref.clone()));
        }

        if let Some(target) = references
            .nav_targets
            .iter()
            .find(|target| manifest.by_path(target).is_none())
        {
            return Err(PackagingError::MissingEntry((*target).to_owned()));
        }
        Ok(())
    }

    /// Validates the entries, then writes the complete archive into memory.
    ///
    /// Every entry carries the `modified` timestamp.
    /// A `compression` level of `0` stores entries uncompressed.
    pub(crate) fn write(
        &self,
        references: &References<'_>,
        compression: u8,
        modified: DateTime,
    ) -> EpubResult<Vec<u8>> {
        self.validate(references)?;

        let mut zip = ZipWriter::new(
            Cursor::new(Vec::new()),
            SimpleFileOptions::default()
                .zip_last_modified_date(modified)
                .zip_compression_level(compression),
        );

        // EPUB requires that the mimetype file must be first and uncompressed
        zip.start_uncompressed_file(ocf::MIMETYPE_PATH)?;
        zip.write_all(ocf::MIMETYPE)?;

        for entry in &self.entries {
            zip.write_file(entry.path, entry.data)?;
        }

        let data = zip.finish()?.into_inner();
        log::debug!("archive: {} entries, {} bytes", self.entries.len() + 1, data.len());
        Ok(data)
    }
}
