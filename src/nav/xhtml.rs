use crate::consts::{epub, layout, xhtml, xml};
use crate::nav::{NavPoint, Navigation};
use crate::util::uri;
use crate::writer::WriterResult;
use crate::writer::xml::{XmlWriter, write_element};
use std::io::Write;

const LANDMARKS_TITLE: &str = "Landmarks";
const COVER_LABEL: &str = "Cover";
const START_LABEL: &str = "Start";

pub(super) struct NavWriter<'a, W> {
    nav: &'a Navigation<'a>,
    writer: XmlWriter<'static, W>,
}

impl<'a, W: Write> NavWriter<'a, W> {
    pub(super) fn new(nav: &'a Navigation<'a>, writer: W) -> Self {
        Self {
            nav,
            writer: XmlWriter::new(writer),
        }
    }

    pub(super) fn write_nav(mut self) -> WriterResult<()> {
        let language = self.nav.book.language();
        self.writer.write_utf8_declaration()?.write_html_doctype()?;

        write_element! {
            writer: self.writer,
            tag: xhtml::HTML,
            attributes: {
                xml::XMLNS  => xhtml::XHTML_NS,
                epub::XMLNS => epub::EPUB_NS,
                xml::LANG   => language,
                xhtml::LANG => language,
            }
            inner_content: {
                self.write_nav_head()?;
                self.write_nav_body()?;
            }
        }
    }

    fn write_nav_head(&mut self) -> WriterResult<()> {
        let stylesheet = self
            .nav
            .stylesheet
            .map(|path| uri::relativize(layout::PACKAGE_DIR, path));

        write_element! {
            writer: self.writer,
            tag: xhtml::HEAD,
            inner_content: {
                write_element! {
                    writer: self.writer,
                    tag: xhtml::META,
                    attributes: {
                        xhtml::CHARSET => xhtml::UTF_8,
                    }
                }?;
                write_element! {
                    writer: self.writer,
                    tag: xhtml::TITLE,
                    text: self.nav.toc_title,
                }?;
                if let Some(href) = &stylesheet {
                    write_element! {
                        writer: self.writer,
                        tag: xhtml::LINK,
                        attributes: {
                            xhtml::REL  => xhtml::STYLESHEET,
                            xhtml::TYPE => xhtml::TEXT_CSS,
                            xhtml::HREF => href.as_str(),
                        }
                    }?;
                }
            }
        }
    }

    fn write_nav_body(&mut self) -> WriterResult<()> {
        write_element! {
            writer: self.writer,
            tag: xhtml::BODY,
            inner_content: {
                self.write_toc()?;
                self.write_landmarks()?;
            }
        }
    }

    fn write_toc(&mut self) -> WriterResult<()> {
        write_element! {
            writer: self.writer,
            tag: xhtml::NAV,
            attributes: {
                epub::TYPE => epub::TOC,
                xml::ID    => epub::TOC,
            }
            inner_content: {
                write_element! {
                    writer: self.writer,
                    tag: xhtml::H2,
                    text: self.nav.toc_title,
                }?;
                self.write_nested_points()?;
            }
        }
    }

    /// Rebuilds the hierarchy from depth-annotated pre-order entries.
    ///
    /// Each `<li>` stays open until an entry at the same or a lower depth
    /// follows, so children nest in an `<ol>` within their parent's `<li>`.
    fn write_nested_points(&mut self) -> WriterResult<()> {
        let points = &self.nav.points;
        let mut open_lists = 0;

        for (i, point) in points.iter().enumerate() {
            if i > 0 && point.depth <= open_lists {
                self.writer.finish_end_element(xhtml::LIST_ITEM)?;
            }
            while open_lists > point.depth {
                self.writer.finish_end_element(xhtml::ORDERED_LIST)?;
                self.writer.finish_end_element(xhtml::LIST_ITEM)?;
                open_lists -= 1;
            }
            while open_lists < point.depth {
                self.writer
                    .start_element(xhtml::ORDERED_LIST)?
                    .finish_start_element()?;
                open_lists += 1;
            }

            self.writer
                .start_element(xhtml::LIST_ITEM)?
                .finish_start_element()?;
            self.write_point_label(point)?;
        }

        if open_lists > 0 {
            self.writer.finish_end_element(xhtml::LIST_ITEM)?;
            while open_lists > 1 {
                self.writer.finish_end_element(xhtml::ORDERED_LIST)?;
                self.writer.finish_end_element(xhtml::LIST_ITEM)?;
                open_lists -= 1;
            }
            self.writer.finish_end_element(xhtml::ORDERED_LIST)?;
        }
        Ok(())
    }

    fn write_point_label(&mut self, point: &NavPoint<'_>) -> WriterResult<()> {
        let href = point.href(layout::PACKAGE_DIR);

        write_element! {
            writer: self.writer,
            tag: xhtml::ANCHOR,
            text: point.title,
            attributes: {
                xhtml::HREF => href.as_str(),
            }
        }
    }

    /// Hidden `landmarks`: the cover page and the start of the body matter.
    fn write_landmarks(&mut self) -> WriterResult<()> {
        let start = self.nav.points.iter().find(|point| point.content);
        let cover_href = self
            .nav
            .cover_page
            .map(|path| uri::relativize(layout::PACKAGE_DIR, path));
        let start_href = start.map(|point| point.href(layout::PACKAGE_DIR));

        write_element! {
            writer: self.writer,
            tag: xhtml::NAV,
            attributes: {
                epub::TYPE    => epub::LANDMARKS,
                xhtml::HIDDEN => xhtml::HIDDEN,
            }
            inner_content: {
                write_element! {
                    writer: self.writer,
                    tag: xhtml::H2,
                    text: LANDMARKS_TITLE,
                }?;
                write_element! {
                    writer: self.writer,
                    tag: xhtml::ORDERED_LIST,
                    inner_content: {
                        if let Some(href) = &cover_href {
                            self.write_landmark(epub::COVER, COVER_LABEL, href)?;
                        }
                        if let Some(href) = &start_href {
                            self.write_landmark(epub::BODYMATTER, START_LABEL, href)?;
                        }
                    }
                }?;
            }
        }
    }

    fn write_landmark(&mut self, epub_type: &str, label: &str, href: &str) -> WriterResult<()> {
        write_element! {
            writer: self.writer,
            tag: xhtml::LIST_ITEM,
            inner_content: {
                write_element! {
                    writer: self.writer,
                    tag: xhtml::ANCHOR,
                    text: label,
                    attributes: {
                        epub::TYPE  => epub_type,
                        xhtml::HREF => href,
                    }
                }?;
            }
        }
    }
}
