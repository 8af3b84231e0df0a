//! Content documents: one XHTML file per chapter with content,
//! plus the optional cover page and head chapter.

mod markup;

pub(crate) use markup::Features;

use crate::asset::{Asset, AssetStore};
use crate::chapter::{Block, ChapterNode, Content, FlatChapter, Inline};
use crate::consts::{epub, layout, xhtml, xml};
use crate::errors::{EncodingError, EpubResult, PackagingError};
use crate::util::{uri, utf};
use crate::writer::WriterResult;
use crate::writer::xml::{XmlWriter, write_element};
use markup::RewriteError;
use std::borrow::Cow;
use std::collections::HashMap;

/// The stylesheet written when none is configured.
pub(crate) const DEFAULT_STYLESHEET: &str = "\
body { margin: 0 5%; line-height: 1.5; }
h1 { text-align: center; margin: 1em 0; }
blockquote { margin: 1em 2em; font-style: italic; }
.alt-wrapper { text-align: center; margin: 1em 0; }
.alt-wrapper img { max-width: 100%; }
.alt-wrapper table { margin: 0 auto; border-collapse: collapse; }
.alt-wrapper td, .alt-wrapper th { border: 1px solid; padding: 0.2em 0.5em; }
.title { font-weight: bold; }
.caption { font-size: 0.9em; }
.super { vertical-align: super; font-size: 0.75em; text-decoration: none; }
.cover { text-align: center; }
.cover img { max-width: 100%; max-height: 100%; }
";

const CHAPTER_LINK: &str = "chapter:";
const ASSET_LINK: &str = "asset:";

const ALT_WRAPPER_CLASS: &str = "alt-wrapper";
const TITLE_CLASS: &str = "title";
const CAPTION_CLASS: &str = "caption";
const NOTE_REF_CLASS: &str = "super";
const COVER_CLASS: &str = "cover";

/// A rendered XHTML document ready to be placed in the archive.
#[derive(Clone, Debug)]
pub(crate) struct ContentDocument {
    /// Container-root-relative archive path.
    pub(crate) path: String,
    pub(crate) data: Vec<u8>,
    /// Vocabularies embedded through markup.
    pub(crate) features: Features,
}

/// Archive paths of content documents, indexed like `flat`.
///
/// Chapters with content are numbered from `1` in reading order
/// (`OEBPS/Text/part01.xhtml`, ...), zero-padded to at least two digits.
/// Section headings receive [`None`].
pub(crate) fn content_paths(flat: &[FlatChapter<'_>]) -> Vec<Option<String>> {
    let count = flat.iter().filter(|entry| entry.node.has_content()).count();
    let width = count.to_string().len().max(2);
    let mut position = 0;

    flat.iter()
        .map(|entry| {
            entry.node.has_content().then(|| {
                position += 1;
                format!("{}/part{position:0width$}.xhtml", layout::TEXT_DIR)
            })
        })
        .collect()
}

/// State shared by every document of a publication.
pub(crate) struct RenderContext<'a> {
    language: &'a str,
    stylesheet: Option<&'a str>,
    footnotes_title: &'a str,
    assets: &'a AssetStore,
    /// Chapter key → archive path of the document it resolves to.
    links: HashMap<&'a str, &'a str>,
}

impl<'a> RenderContext<'a> {
    /// `head` is the head chapter, rendered to [`layout::HEAD_PATH`].
    pub(crate) fn new(
        language: &'a str,
        stylesheet: Option<&'a str>,
        footnotes_title: &'a str,
        assets: &'a AssetStore,
        flat: &[FlatChapter<'a>],
        paths: &'a [Option<String>],
        head: Option<&'a ChapterNode>,
    ) -> Self {
        let head_link = head
            .and_then(ChapterNode::link_key)
            .map(|key| (key, layout::HEAD_PATH));
        let links = flat
            .iter()
            .filter_map(|entry| {
                let key = entry.node.link_key()?;
                let path = paths.get(entry.target)?.as_deref()?;
                Some((key, path))
            })
            .chain(head_link)
            .collect();

        Self {
            language,
            stylesheet,
            footnotes_title,
            assets,
            links,
        }
    }

    /// Resolves `chapter:` and `asset:` hrefs relative to `from_dir`.
    ///
    /// Returns [`None`] for any other href, which is kept as written.
    fn resolve_href(&self, chapter: &str, from_dir: &str, href: &str) -> EpubResult<Option<String>> {
        if let Some(target) = href.strip_prefix(CHAPTER_LINK) {
            let (key, fragment) = match target.split_once('#') {
                Some((key, fragment)) => (key, Some(fragment)),
                None => (target, None),
            };
            let path = self.links.get(key).ok_or_else(|| PackagingError::UnresolvedLink {
                chapter: chapter.to_owned(),
                target: href.to_owned(),
            })?;

            let mut resolved = uri::relativize(from_dir, path);
            if let Some(fragment) = fragment {
                resolved.push('#');
                resolved.push_str(fragment);
            }
            Ok(Some(resolved))
        } else if let Some(id) = href.strip_prefix(ASSET_LINK) {
            let asset = self.assets.resolve(id)?;
            Ok(Some(uri::relativize(from_dir, asset.path())))
        } else {
            Ok(None)
        }
    }
}

/// Renders the content document of `node` at the archive `path`.
///
/// # Errors
/// - [`EncodingError`]: Undecodable [`Content::Bytes`].
/// - [`PackagingError::UnresolvedLink`]: A `chapter:` link names an unknown key.
/// - [`EpubError::UnknownAsset`](crate::EpubError::UnknownAsset):
///   An image or `asset:` link names an unregistered asset.
pub(crate) fn render_chapter(
    node: &ChapterNode,
    path: &str,
    ctx: &RenderContext<'_>,
) -> EpubResult<ContentDocument> {
    let mut document = DocumentWriter::new(ctx, node.label(), path);

    let body = match node.body() {
        None => Body::Paragraphs(Cow::Borrowed("")),
        Some(Content::Text(text)) => Body::Paragraphs(Cow::Borrowed(text)),
        Some(Content::Markup(fragment)) => document.rewrite(Cow::Borrowed(fragment))?,
        Some(Content::Bytes(bytes)) => {
            let decoded = utf::into_utf8_str(bytes.clone()).map_err(|source| EncodingError {
                chapter: node.title().to_owned(),
                source,
            })?;
            document.rewrite(Cow::Owned(decoded))?
        }
        Some(Content::Blocks(blocks)) => Body::Blocks(blocks),
    };

    document.start_document()?;
    document
        .writer
        .start_element(xhtml::SECTION)?
        .add_attribute(epub::TYPE, epub::CHAPTER)
        .add_attribute(xml::ID, node.section_id())
        .finish_start_element()?;

    document.write_body(&body)?;
    document.writer.finish_end_element(xhtml::SECTION)?;
    document.write_footnotes()?;

    let features = document.features;
    Ok(ContentDocument {
        path: path.to_owned(),
        data: document.finish()?,
        features,
    })
}

/// Renders the cover page: the cover image alone, scaled to fit.
pub(crate) fn render_cover_page(
    title: &str,
    cover: &Asset,
    ctx: &RenderContext<'_>,
) -> EpubResult<ContentDocument> {
    let mut document = DocumentWriter::new(ctx, title, layout::COVER_PAGE_PATH);
    let src = uri::relativize(document.dir, cover.path());

    document.start_document()?;
    let writer = &mut document.writer;
    write_element! {
        writer: writer,
        tag: xhtml::SECTION,
        attributes: {
            epub::TYPE => epub::COVER,
        }
        inner_content: {
            write_element! {
                writer: writer,
                tag: xhtml::DIV,
                attributes: {
                    xhtml::CLASS => COVER_CLASS,
                }
                inner_content: {
                    write_element! {
                        writer: writer,
                        tag: xhtml::IMG,
                        attributes: {
                            xhtml::SRC => src.as_str(),
                            xhtml::ALT => title,
                        }
                    }?;
                }
            }?;
        }
    }?;

    Ok(ContentDocument {
        path: layout::COVER_PAGE_PATH.to_owned(),
        data: document.finish()?,
        features: Features::default(),
    })
}

enum Body<'b> {
    Paragraphs(Cow<'b, str>),
    /// Rewritten, well-formed markup.
    Fragment(String),
    Blocks(&'b [Block]),
}

struct DocumentWriter<'a, 'b> {
    writer: XmlWriter<'static, Vec<u8>>,
    ctx: &'b RenderContext<'a>,
    title: &'b str,
    /// Directory of the document; links are made relative to it.
    dir: &'b str,
    /// Footnote texts in order of reference.
    notes: Vec<&'b str>,
    features: Features,
}

impl<'a, 'b> DocumentWriter<'a, 'b> {
    fn new(ctx: &'b RenderContext<'a>, title: &'b str, path: &'b str) -> Self {
        Self {
            writer: XmlWriter::compact(Vec::new()),
            ctx,
            title,
            dir: uri::parent(path),
            notes: Vec::new(),
            features: Features::default(),
        }
    }

    fn resolve_href(&self, href: &str) -> EpubResult<Option<String>> {
        self.ctx.resolve_href(self.title, self.dir, href)
    }

    /// Falls back to plain text if the fragment is malformed.
    fn rewrite<'c>(&mut self, fragment: Cow<'c, str>) -> EpubResult<Body<'c>> {
        match markup::rewrite(self.title, &fragment, |href| self.resolve_href(href)) {
            Ok(rewritten) => {
                self.features.merge(rewritten.features);
                Ok(Body::Fragment(rewritten.xml))
            }
            Err(RewriteError::Fatal(error)) => Err(error),
            Err(RewriteError::Malformed(reason)) => {
                log::warn!(
                    "chapter `{}`: markup is not well-formed ({reason}); writing it as text",
                    self.title,
                );
                Ok(Body::Paragraphs(fragment))
            }
        }
    }

    fn start_document(&mut self) -> WriterResult<()> {
        let stylesheet = self
            .ctx
            .stylesheet
            .map(|path| uri::relativize(self.dir, path));
        let writer = &mut self.writer;

        writer.write_utf8_declaration()?.write_html_doctype()?;
        writer
            .start_element(xhtml::HTML)?
            .add_attribute(xml::XMLNS, xhtml::XHTML_NS)
            .add_attribute(epub::XMLNS, epub::EPUB_NS)
            .add_attribute(xml::LANG, self.ctx.language)
            .add_attribute(xhtml::LANG, self.ctx.language)
            .finish_start_element()?;

        write_element! {
            writer: writer,
            tag: xhtml::HEAD,
            inner_content: {
                write_element! {
                    writer: writer,
                    tag: xhtml::META,
                    attributes: {
                        xhtml::CHARSET => xhtml::UTF_8,
                    }
                }?;
                write_element! {
                    writer: writer,
                    tag: xhtml::TITLE,
                    text: self.title,
                }?;
                if let Some(href) = &stylesheet {
                    write_element! {
                        writer: writer,
                        tag: xhtml::LINK,
                        attributes: {
                            xhtml::REL => xhtml::STYLESHEET,
                            xhtml::TYPE => xhtml::TEXT_CSS,
                            xhtml::HREF => href.as_str(),
                        }
                    }?;
                }
            }
        }?;

        writer.start_element(xhtml::BODY)?.finish_start_element()
    }

    fn finish(mut self) -> WriterResult<Vec<u8>> {
        self.writer.finish_end_element(xhtml::BODY)?;
        self.writer.finish_end_element(xhtml::HTML)?;
        Ok(self.writer.into_inner())
    }

    fn write_body(&mut self, body: &Body<'b>) -> EpubResult<()> {
        match body {
            Body::Paragraphs(text) => self.write_paragraphs(text),
            Body::Fragment(xml) => self.writer.write_raw(xml),
            Body::Blocks(blocks) => {
                for block in *blocks {
                    self.write_block(block)?;
                }
                Ok(())
            }
        }
    }

    /// Blank lines separate paragraphs; other line breaks become `<br/>`.
    fn write_paragraphs(&mut self, text: &str) -> WriterResult<()> {
        let mut lines = Vec::new();

        for line in text.lines() {
            if line.trim().is_empty() {
                self.write_paragraph(&lines)?;
                lines.clear();
            } else {
                lines.push(line);
            }
        }
        self.write_paragraph(&lines)
    }

    fn write_paragraph(&mut self, lines: &[&str]) -> WriterResult<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let writer = &mut self.writer;

        writer.start_element(xhtml::PARAGRAPH)?.finish_start_element()?;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                writer.start_element(xhtml::BREAK)?.finish_empty_element()?;
            }
            writer.write_text(line)?;
        }
        writer.finish_end_element(xhtml::PARAGRAPH)
    }

    fn write_block(&mut self, block: &'b Block) -> EpubResult<()> {
        match block {
            Block::Heading(inline) => self.write_inline_element(xhtml::H1, inline),
            Block::Paragraph(inline) => self.write_inline_element(xhtml::PARAGRAPH, inline),
            Block::Quote(inline) => {
                self.writer
                    .start_element(xhtml::BLOCKQUOTE)?
                    .finish_start_element()?;
                self.write_inline_element(xhtml::PARAGRAPH, inline)?;
                self.writer.finish_end_element(xhtml::BLOCKQUOTE)
            }
            Block::Image {
                asset,
                alt,
                caption,
            } => {
                let asset = self.ctx.assets.resolve(asset)?;
                let src = uri::relativize(self.dir, asset.path());
                let writer = &mut self.writer;

                write_element! {
                    writer: writer,
                    tag: xhtml::DIV,
                    attributes: {
                        xhtml::CLASS => ALT_WRAPPER_CLASS,
                    }
                    inner_content: {
                        write_element! {
                            writer: writer,
                            tag: xhtml::IMG,
                            attributes: {
                                xhtml::SRC => src.as_str(),
                                xhtml::ALT => alt.as_str(),
                            }
                        }?;
                        if let Some(caption) = caption {
                            write_element! {
                                writer: writer,
                                tag: xhtml::PARAGRAPH,
                                text: caption,
                                attributes: {
                                    xhtml::CLASS => CAPTION_CLASS,
                                }
                            }?;
                        }
                    }
                }
            }
            Block::Table {
                markup,
                title,
                caption,
            } => {
                let body = self.rewrite(Cow::Borrowed(markup))?;

                self.writer
                    .start_element(xhtml::DIV)?
                    .add_attribute(xhtml::CLASS, ALT_WRAPPER_CLASS)
                    .finish_start_element()?;
                if let Some(title) = title {
                    self.writer
                        .start_element(xhtml::PARAGRAPH)?
                        .add_attribute(xhtml::CLASS, TITLE_CLASS)
                        .finish_text_element(title)?;
                }
                self.write_body(&body)?;
                if let Some(caption) = caption {
                    self.writer
                        .start_element(xhtml::PARAGRAPH)?
                        .add_attribute(xhtml::CLASS, CAPTION_CLASS)
                        .finish_text_element(caption)?;
                }
                self.writer.finish_end_element(xhtml::DIV)
            }
        }
    }

    fn write_inline_element(&mut self, tag: &'static str, inline: &'b [Inline]) -> EpubResult<()> {
        self.writer.start_element(tag)?.finish_start_element()?;
        for item in inline {
            self.write_inline(item)?;
        }
        self.writer.finish_end_element(tag)
    }

    fn write_inline(&mut self, inline: &'b Inline) -> EpubResult<()> {
        match inline {
            Inline::Text(text) => self.writer.write_text(text),
            Inline::Emphasis(text) => {
                self.writer.start_element(xhtml::EM)?.finish_text_element(text)
            }
            Inline::Strong(text) => {
                self.writer.start_element(xhtml::STRONG)?.finish_text_element(text)
            }
            Inline::Link { href, text } => {
                let resolved = self.resolve_href(href)?;
                let href = resolved.as_deref().unwrap_or(href);

                self.writer
                    .start_element(xhtml::ANCHOR)?
                    .add_attribute(xhtml::HREF, href)
                    .finish_text_element(text)
            }
            Inline::Note(note) => {
                self.notes.push(note);
                let number = self.notes.len();
                let id = format!("ref-{number}");
                let href = format!("#fn-{number}");

                self.writer
                    .start_element(xhtml::ANCHOR)?
                    .add_attribute(xml::ID, id.as_str())
                    .add_attribute(xhtml::HREF, href.as_str())
                    .add_attribute(xhtml::CLASS, NOTE_REF_CLASS)
                    .add_attribute(epub::TYPE, epub::NOTEREF)
                    .finish_text_element(&format!("[{number}]"))
            }
        }
    }

    /// `<section epub:type="footnotes">` listing every note, each linking
    /// back to its reference.
    fn write_footnotes(&mut self) -> WriterResult<()> {
        if self.notes.is_empty() {
            return Ok(());
        }
        let notes = std::mem::take(&mut self.notes);
        let writer = &mut self.writer;

        write_element! {
            writer: writer,
            tag: xhtml::SECTION,
            attributes: {
                epub::TYPE => epub::FOOTNOTES,
            }
            inner_content: {
                write_element! {
                    writer: writer,
                    tag: xhtml::H2,
                    text: self.ctx.footnotes_title,
                }?;

                for (i, note) in notes.into_iter().enumerate() {
                    let number = i + 1;
                    let id = format!("fn-{number}");
                    let href = format!("#ref-{number}");

                    write_element! {
                        writer: writer,
                        tag: xhtml::ASIDE,
                        attributes: {
                            xml::ID => id.as_str(),
                            epub::TYPE => epub::FOOTNOTE,
                        }
                        inner_content: {
                            write_element! {
                                writer: writer,
                                tag: xhtml::PARAGRAPH,
                                inner_content: {
                                    write_element! {
                                        writer: writer,
                                        tag: xhtml::ANCHOR,
                                        text: &format!("[{number}]"),
                                        attributes: {
                                            xhtml::HREF => href.as_str(),
                                        }
                                    }?;
                                    writer.write_text(" ")?;
                                    writer.write_text(note)?;
                                }
                            }?;
                        }
                    }?;
                }
            }
        }
    }
}
