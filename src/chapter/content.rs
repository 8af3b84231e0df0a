use crate::input::{IntoOption, Many};

/// The body of a [`ChapterNode`](super::ChapterNode).
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// Plain text; paragraphs are separated by blank lines.
    Text(String),
    /// An XHTML body fragment.
    Markup(String),
    /// An undecoded XHTML body fragment (UTF-8, or UTF-16 with a byte order mark).
    Bytes(Vec<u8>),
    /// Structured blocks.
    Blocks(Vec<Block>),
}

/// A structured block of chapter content.
///
/// # Examples
/// ```
/// use quire::chapter::{Block, Inline};
///
/// let blocks = [
///     Block::heading("Loomings"),
///     Block::paragraph([
///         Inline::text("Call me "),
///         Inline::emphasis("Ishmael"),
///         Inline::note("A name borrowed from Genesis."),
///         Inline::text(". See "),
///         Inline::link("chapter:carpet-bag", "the next chapter"),
///         Inline::text("."),
///     ]),
///     Block::quote("Whenever it is a damp, drizzly November in my soul..."),
///     Block::image("whale.png", "A sperm whale", "Fig. 1"),
///     Block::table(
///         "<table><tr><th>Species</th><th>Length</th></tr><tr><td>Sperm</td><td>16 m</td></tr></table>",
///         "Table 1",
///         None,
///     ),
/// ];
/// ```
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// `<h1>`
    Heading(Vec<Inline>),
    /// `<p>`
    Paragraph(Vec<Inline>),
    /// `<blockquote><p>`
    Quote(Vec<Inline>),
    /// An image referencing a registered asset, with an optional caption.
    Image {
        /// Asset id.
        asset: String,
        /// Alternative text.
        alt: String,
        /// Caption shown beneath the image.
        caption: Option<String>,
    },
    /// An XHTML table fragment with an optional title and caption.
    ///
    /// The markup is rewritten like [`Content::Markup`], so it may link
    /// to chapters and assets.
    Table {
        /// `<table>` markup.
        markup: String,
        /// Title shown above the table.
        title: Option<String>,
        /// Caption shown beneath the table.
        caption: Option<String>,
    },
}

impl Block {
    /// Creates a [`Block::Heading`].
    pub fn heading(inline: impl Many<Inline>) -> Self {
        Self::Heading(inline.iter_many().collect())
    }

    /// Creates a [`Block::Paragraph`].
    pub fn paragraph(inline: impl Many<Inline>) -> Self {
        Self::Paragraph(inline.iter_many().collect())
    }

    /// Creates a [`Block::Quote`].
    pub fn quote(inline: impl Many<Inline>) -> Self {
        Self::Quote(inline.iter_many().collect())
    }

    /// Creates a [`Block::Image`] referencing the asset registered under `asset`.
    pub fn image(
        asset: impl Into<String>,
        alt: impl Into<String>,
        caption: impl IntoOption<String>,
    ) -> Self {
        Self::Image {
            asset: asset.into(),
            alt: alt.into(),
            caption: caption.into_option(),
        }
    }

    /// Creates a [`Block::Table`] from `<table>` markup.
    pub fn table(
        markup: impl Into<String>,
        title: impl IntoOption<String>,
        caption: impl IntoOption<String>,
    ) -> Self {
        Self::Table {
            markup: markup.into(),
            title: title.into_option(),
            caption: caption.into_option(),
        }
    }
}

/// Inline content within a [`Block`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// `<em>`
    Emphasis(String),
    /// `<strong>`
    Strong(String),
    /// A hyperlink.
    ///
    /// `chapter:KEY[#fragment]` and `asset:ID` hrefs are resolved
    /// to generated locations; other hrefs are kept as-is.
    Link {
        /// Link target.
        href: String,
        /// Link text.
        text: String,
    },
    /// A footnote: rendered as a numbered note reference,
    /// with the note text listed at the end of the chapter.
    Note(String),
}

impl Inline {
    /// Creates [`Inline::Text`].
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates [`Inline::Emphasis`].
    pub fn emphasis(text: impl Into<String>) -> Self {
        Self::Emphasis(text.into())
    }

    /// Creates [`Inline::Strong`].
    pub fn strong(text: impl Into<String>) -> Self {
        Self::Strong(text.into())
    }

    /// Creates an [`Inline::Link`].
    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Link {
            href: href.into(),
            text: text.into(),
        }
    }

    /// Creates an [`Inline::Note`].
    pub fn note(text: impl Into<String>) -> Self {
        Self::Note(text.into())
    }
}

impl From<&str> for Inline {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Inline {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
