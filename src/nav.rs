//! Navigation: the EPUB 3 navigation document and the legacy NCX.

mod ncx;
mod xhtml;

use crate::book::Book;
use crate::chapter::FlatChapter;
use crate::writer::WriterResult;

/// A table of contents entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NavPoint<'a> {
    pub(crate) title: &'a str,
    /// Nesting depth, `1` for top-level entries.
    pub(crate) depth: usize,
    /// Archive path of the target document.
    pub(crate) path: &'a str,
    /// `id` of the target chapter's section, if set.
    pub(crate) fragment: Option<&'a str>,
    /// The entry is a chapter with content, rather than a section heading.
    pub(crate) content: bool,
}

impl NavPoint<'_> {
    /// Href relative to `from_dir`, including the fragment.
    fn href(&self, from_dir: &str) -> String {
        let mut href = crate::util::uri::relativize(from_dir, self.path);
        if let Some(fragment) = self.fragment {
            href.push('#');
            href.push_str(fragment);
        }
        href
    }
}

/// Navigation data for one publication, serialized as `nav.xhtml` and `toc.ncx`.
#[derive(Clone, Debug)]
pub(crate) struct Navigation<'a> {
    book: &'a Book,
    toc_title: &'a str,
    /// Archive path of the stylesheet.
    stylesheet: Option<&'a str>,
    /// Depth-annotated pre-order entries.
    points: Vec<NavPoint<'a>>,
    /// Archive path of the cover page.
    cover_page: Option<&'a str>,
}

impl<'a> Navigation<'a> {
    /// Derives one entry per flattened chapter.
    ///
    /// Section headings link to the document of their first descendant with content.
    pub(crate) fn new(
        book: &'a Book,
        toc_title: &'a str,
        stylesheet: Option<&'a str>,
        flat: &[FlatChapter<'a>],
        paths: &'a [Option<String>],
        cover_page: Option<&'a str>,
    ) -> Self {
        let points = flat
            .iter()
            .filter_map(|entry| {
                let path = paths.get(entry.target)?.as_deref()?;
                let target = flat.get(entry.target)?;

                Some(NavPoint {
                    title: entry.node.label(),
                    depth: entry.depth,
                    path,
                    fragment: target.node.section_id(),
                    content: entry.node.has_content(),
                })
            })
            .collect::<Vec<_>>();

        log::debug!(
            "navigation: {} entries, max depth {}",
            points.len(),
            points.iter().map(|point| point.depth).max().unwrap_or_default(),
        );

        Self {
            book,
            toc_title,
            stylesheet,
            points,
            cover_page,
        }
    }

    /// Archive paths of every document navigation links to.
    pub(crate) fn targets(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.cover_page
            .into_iter()
            .chain(self.points.iter().map(|point| point.path))
    }

    /// Renders `nav.xhtml`.
    pub(crate) fn to_xhtml(&self) -> WriterResult<Vec<u8>> {
        let mut data = Vec::new();
        xhtml::NavWriter::new(self, &mut data).write_nav()?;
        Ok(data)
    }

    /// Renders `toc.ncx`.
    pub(crate) fn to_ncx(&self) -> WriterResult<Vec<u8>> {
        let mut data = Vec::new();
        ncx::NcxWriter::new(self, &mut data).write_ncx()?;
        Ok(data)
    }
}
