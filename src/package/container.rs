use crate::consts::{layout, mime, ocf, xml};
use crate::writer::WriterResult;
use crate::writer::xml::{XmlWriter, write_element};
use std::io::Write;

/// Renders `META-INF/container.xml`, pointing at the package document.
pub(crate) fn container_xml() -> WriterResult<Vec<u8>> {
    let mut data = Vec::new();
    ContainerWriter::new(&mut data).write_container()?;
    Ok(data)
}

struct ContainerWriter<W> {
    writer: XmlWriter<'static, W>,
}

impl<W: Write> ContainerWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer: XmlWriter::new(writer),
        }
    }

    fn write_container(mut self) -> WriterResult<()> {
        self.writer.write_utf8_declaration()?;

        write_element! {
            writer: self.writer,
            tag: ocf::CONTAINER,
            attributes: {
                ocf::VERSION => ocf::CONTAINER_VERSION,
                xml::XMLNS   => ocf::CONTAINER_NS,
            }
            inner_content: {
                self.write_root_files()?;
            }
        }
    }

    fn write_root_files(&mut self) -> WriterResult<()> {
        write_element! {
            writer: self.writer,
            tag: ocf::ROOT_FILES,
            inner_content: {
                write_element! {
                    writer: self.writer,
                    tag: ocf::ROOT_FILE,
                    attributes: {
                        ocf::FULL_PATH  => layout::PACKAGE_PATH,
                        ocf::MEDIA_TYPE => mime::OEBPS_PACKAGE,
                    }
                }?;
            }
        }
    }
}
