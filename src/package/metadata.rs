use crate::book::Contributor;
use crate::consts::{dc, opf, xml};
use crate::package::{PackageWriter, UNIQUE_ID};
use crate::writer::WriterResult;
use crate::writer::xml::write_element;
use std::io::Write;

const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

impl<W: Write> PackageWriter<'_, W> {
    pub(super) fn write_metadata(&mut self) -> WriterResult<()> {
        let book = self.package.book;

        write_element! {
            writer: self.writer,
            tag: opf::METADATA,
            attributes: {
                dc::XMLNS_DC => dc::DUBLIN_CORE_NS,
            }
            inner_content: {
                write_element! {
                    writer: self.writer,
                    tag: dc::IDENTIFIER,
                    text: book.identifier().trim(),
                    attributes: {
                        xml::ID => UNIQUE_ID,
                    }
                }?;
                self.write_dublin_core(dc::TITLE, book.title().trim())?;
                self.write_dublin_core(dc::LANGUAGE, book.language().trim())?;

                self.write_contributors(dc::CREATOR, "creator-", book.creators())?;
                self.write_contributors(dc::CONTRIBUTOR, "contributor-", book.contributors())?;

                if let Some(description) = book.description() {
                    self.write_dublin_core(dc::DESCRIPTION, description)?;
                }
                if let Some(publisher) = book.publisher() {
                    self.write_dublin_core(dc::PUBLISHER, publisher)?;
                }

                self.write_generated_entries()?;
            }
        }
    }

    fn write_dublin_core(&mut self, tag: &'static str, value: &str) -> WriterResult<()> {
        write_element! {
            writer: self.writer,
            tag: tag,
            text: value,
        }
    }

    /// Each entry receives a generated `id` (`creator-1`, ...),
    /// refined by its MARC relator role.
    fn write_contributors(
        &mut self,
        tag: &'static str,
        id_prefix: &str,
        contributors: &[Contributor],
    ) -> WriterResult<()> {
        for (i, contributor) in contributors.iter().enumerate() {
            let id = format!("{id_prefix}{}", i + 1);
            let refines = format!("#{id}");

            write_element! {
                writer: self.writer,
                tag: tag,
                text: contributor.name(),
                attributes: {
                    xml::ID => id.as_str(),
                }
            }?;
            write_element! {
                writer: self.writer,
                tag: opf::META,
                text: contributor.role_kind().as_marc(),
                attributes: {
                    opf::REFINES  => refines.as_str(),
                    opf::PROPERTY => opf::ROLE,
                    opf::SCHEME   => opf::MARC_RELATORS,
                }
            }?;
        }
        Ok(())
    }

    /// `dcterms:modified`, the generator, and the EPUB 2 cover entry.
    fn write_generated_entries(&mut self) -> WriterResult<()> {
        let modified = self.package.modified.to_string();

        write_element! {
            writer: self.writer,
            tag: opf::META,
            text: &modified,
            attributes: {
                opf::PROPERTY => dc::MODIFIED,
            }
        }?;
        write_element! {
            writer: self.writer,
            tag: opf::META,
            attributes: {
                opf::NAME    => opf::GENERATOR,
                opf::CONTENT => GENERATOR,
            }
        }?;

        // Reading systems predating EPUB 3 locate the cover through this entry
        if let Some(cover_id) = self.cover_id {
            write_element! {
                writer: self.writer,
                tag: opf::META,
                attributes: {
                    opf::NAME    => opf::COVER,
                    opf::CONTENT => cover_id,
                }
            }?;
        }
        Ok(())
    }
}
