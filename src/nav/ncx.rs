use crate::consts::{layout, ncx, xml};
use crate::nav::Navigation;
use crate::util::uri;
use crate::writer::WriterResult;
use crate::writer::xml::{XmlWriter, write_element};
use std::io::Write;

const NAV_POINT_ID_PREFIX: &str = "nav-point-";
const COVER_LABEL: &str = "Cover";

/// Writes the NCX as a flat index in reading order.
///
/// Section headings are omitted, as every `navPoint` must reference
/// a distinct position in the reading order.
pub(super) struct NcxWriter<'a, W> {
    nav: &'a Navigation<'a>,
    writer: XmlWriter<'static, W>,
    play_order: usize,
}

impl<'a, W: Write> NcxWriter<'a, W> {
    pub(super) fn new(nav: &'a Navigation<'a>, writer: W) -> Self {
        Self {
            nav,
            writer: XmlWriter::new(writer),
            play_order: 0,
        }
    }

    pub(super) fn write_ncx(mut self) -> WriterResult<()> {
        // DOCTYPE for NCX is omitted as EPUB 2 does not require it
        self.writer.write_utf8_declaration()?;

        write_element! {
            writer: self.writer,
            tag: ncx::NCX,
            attributes: {
                xml::XMLNS   => ncx::NCX_NS,
                ncx::VERSION => ncx::NCX_VERSION,
                xml::LANG    => self.nav.book.language(),
            }
            inner_content: {
                self.write_ncx_head()?;
                self.write_ncx_doc_title()?;
                self.write_ncx_nav_map()?;
            }
        }
    }

    fn write_ncx_head(&mut self) -> WriterResult<()> {
        const DEPTH: &str = "1";
        const ZERO: &str = "0";

        let uid = self.nav.book.identifier();

        write_element! {
            writer: self.writer,
            tag: ncx::HEAD,
            inner_content: {
                self.write_ncx_meta(ncx::DTB_UID, uid)?;
                self.write_ncx_meta(ncx::DTB_DEPTH, DEPTH)?;
                self.write_ncx_meta(ncx::DTB_TOTAL_PAGE_COUNT, ZERO)?;
                self.write_ncx_meta(ncx::DTB_MAX_PAGE_NUMBER, ZERO)?;
            }
        }
    }

    fn write_ncx_meta(&mut self, name: &str, content: &str) -> WriterResult<()> {
        write_element! {
            writer: self.writer,
            tag: ncx::META,
            attributes: {
                ncx::NAME    => name,
                ncx::CONTENT => content,
            }
        }
    }

    fn write_ncx_doc_title(&mut self) -> WriterResult<()> {
        let title = self.nav.book.title();

        write_element! {
            writer: self.writer,
            tag: ncx::DOC_TITLE,
            inner_content: {
                self.write_ncx_text(title)?;
            }
        }
    }

    fn write_ncx_nav_map(&mut self) -> WriterResult<()> {
        let nav = self.nav;

        write_element! {
            writer: self.writer,
            tag: ncx::NAV_MAP,
            inner_content: {
                if let Some(cover_page) = nav.cover_page {
                    let src = uri::relativize(layout::PACKAGE_DIR, cover_page);
                    self.write_ncx_nav_point(COVER_LABEL, &src)?;
                }
                for point in nav.points.iter().filter(|point| point.content) {
                    let src = point.href(layout::PACKAGE_DIR);
                    self.write_ncx_nav_point(point.title, &src)?;
                }
            }
        }
    }

    fn write_ncx_nav_point(&mut self, label: &str, src: &str) -> WriterResult<()> {
        self.play_order += 1;
        let id = format!("{NAV_POINT_ID_PREFIX}{}", self.play_order);
        let play_order = self.play_order.to_string();

        write_element! {
            writer: self.writer,
            tag: ncx::NAV_POINT,
            attributes: {
                xml::ID         => id.as_str(),
                ncx::PLAY_ORDER => play_order.as_str(),
            }
            inner_content: {
                self.write_ncx_nav_label(label)?;
                self.write_ncx_content_src(src)?;
            }
        }
    }

    fn write_ncx_nav_label(&mut self, label: &str) -> WriterResult<()> {
        write_element! {
            writer: self.writer,
            tag: ncx::NAV_LABEL,
            inner_content: {
                self.write_ncx_text(label)?;
            }
        }
    }

    fn write_ncx_text(&mut self, text: &str) -> WriterResult<()> {
        write_element! {
            writer: self.writer,
            tag: ncx::TEXT,
            text: text,
        }
    }

    fn write_ncx_content_src(&mut self, src: &str) -> WriterResult<()> {
        write_element! {
            writer: self.writer,
            tag: ncx::CONTENT,
            attributes: {
                ncx::SRC => src,
            }
        }
    }
}
