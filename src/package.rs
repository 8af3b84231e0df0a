//! The package document (`content.opf`) and the OCF container descriptor.

mod container;
mod metadata;

pub(crate) use container::container_xml;

use crate::asset::Asset;
use crate::book::Book;
use crate::consts::{opf, xml};
use crate::datetime::DateTime;
use crate::errors::{EpubResult, PackagingError};
use crate::manifest::{Manifest, ManifestItem, Spine};
use crate::writer::WriterResult;
use crate::writer::xml::{XmlWriter, write_element};
use std::io::Write;

/// `id` of the `dc:identifier` element, referenced by `unique-identifier`.
const UNIQUE_ID: &str = "pub-id";

/// Inputs of the package document.
pub(crate) struct Package<'a> {
    pub(crate) book: &'a Book,
    pub(crate) manifest: &'a Manifest,
    pub(crate) spine: &'a Spine,
    pub(crate) cover: Option<&'a Asset>,
    pub(crate) modified: DateTime,
}

/// Renders `content.opf`.
///
/// # Errors
/// - [`MetadataError`](crate::errors::MetadataError): A required field is blank.
/// - [`PackagingError::MissingEntry`]: The cover asset is not in the manifest.
pub(crate) fn assemble(package: &Package<'_>) -> EpubResult<Vec<u8>> {
    package.book.validate()?;

    let cover_id = match package.cover {
        Some(cover) => Some(
            package
                .manifest
                .by_path(cover.path())
                .map(|item| item.id.as_str())
                .ok_or_else(|| PackagingError::MissingEntry(cover.path().to_owned()))?,
        ),
        None => None,
    };

    let mut data = Vec::new();
    PackageWriter::new(package, cover_id, &mut data).write_opf()?;
    Ok(data)
}

struct PackageWriter<'a, W> {
    package: &'a Package<'a>,
    cover_id: Option<&'a str>,
    writer: XmlWriter<'static, W>,
}

impl<'a, W: Write> PackageWriter<'a, W> {
    fn new(package: &'a Package<'a>, cover_id: Option<&'a str>, writer: W) -> Self {
        Self {
            package,
            cover_id,
            writer: XmlWriter::new(writer),
        }
    }

    fn write_opf(mut self) -> WriterResult<()> {
        self.writer.write_utf8_declaration()?;

        write_element! {
            writer: self.writer,
            tag: opf::PACKAGE,
            attributes: {
                xml::XMLNS     => opf::OPF_NS,
                opf::VERSION   => opf::PACKAGE_VERSION,
                opf::UNIQUE_ID => UNIQUE_ID,
                xml::LANG      => self.package.book.language().trim(),
            }
            inner_content: {
                self.write_metadata()?;
                self.write_manifest()?;
                self.write_spine()?;
            }
        }
    }

    fn write_manifest(&mut self) -> WriterResult<()> {
        let items = self.package.manifest.items();

        write_element! {
            writer: self.writer,
            tag: opf::MANIFEST,
            inner_content: {
                for item in items {
                    self.write_item(item)?;
                }
            }
        }
    }

    fn write_item(&mut self, item: &ManifestItem) -> WriterResult<()> {
        let properties = item.properties_attribute();

        write_element! {
            writer: self.writer,
            tag: opf::ITEM,
            attributes: {
                xml::ID         => item.id.as_str(),
                opf::HREF       => item.href.as_str(),
                opf::MEDIA_TYPE => item.media_type.as_str(),
                opf::PROPERTIES => properties.as_deref(),
            }
        }
    }

    fn write_spine(&mut self) -> WriterResult<()> {
        let spine = self.package.spine;

        write_element! {
            writer: self.writer,
            tag: opf::SPINE,
            attributes: {
                opf::TOC => spine.toc.as_str(),
            }
            inner_content: {
                for idref in &spine.idrefs {
                    write_element! {
                        writer: self.writer,
                        tag: opf::ITEMREF,
                        attributes: {
                            opf::IDREF => idref.as_str(),
                        }
                    }?;
                }
            }
        }
    }
}
