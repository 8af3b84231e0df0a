//! # quire
//! A deterministic EPUB 3 packaging library.
//!
//! Book metadata, a tree of chapters, and binary assets go in;
//! a valid, reproducible EPUB container comes out.
//!
//! ## Pipeline
//! Writing a [`Publication`] runs, strictly in order:
//! 1. **Flatten** the [chapter tree](chapter::ChapterTree) into reading order.
//! 2. **Render** one XHTML content document per chapter with content.
//! 3. **Navigate**: build `nav.xhtml` and the legacy `toc.ncx`.
//! 4. **Declare** every resource in the manifest and derive the spine.
//! 5. **Assemble** the package document (`content.opf`).
//! 6. **Archive** everything into a zip container, `mimetype` first and uncompressed.
//!
//! Every failure aborts the write before a single byte is emitted;
//! see [`EpubError`].
//!
//! ## Determinism
//! Given identical inputs and a fixed
//! [modification date](book::BookBuilder::modified), the produced bytes are identical.
//! Without one, the current time is used.
//!
//! ## Logging
//! Progress is reported through the [`log`](https://docs.rs/log) facade;
//! no logger is installed by this crate.
//!
//! ## Examples
//! Creating a minimal EPUB:
//! ```
//! use quire::Publication;
//! use quire::asset::AssetStore;
//! use quire::book::Book;
//! use quire::chapter::{ChapterNode, ChapterTree};
//!
//! # fn main() -> quire::EpubResult<()> {
//! let book = Book::builder()
//!     .title("Moby-Dick")
//!     .identifier("urn:isbn:9780000000001")
//!     .language("en")
//!     .creator("Herman Melville")
//!     .build();
//!
//! let mut chapters = ChapterTree::new();
//! chapters.push([
//!     ChapterNode::new("Loomings").text("Call me Ishmael."),
//!     ChapterNode::new("The Carpet-Bag").text("I stuffed a shirt or two..."),
//! ]);
//!
//! let bytes = Publication::new(book, chapters, AssetStore::new())
//!     .write()
//!     .to_vec()?;
//!
//! // A zip local file header
//! assert_eq!(b"PK\x03\x04", &bytes[..4]);
//! # Ok(())
//! # }
//! ```
//! Nested chapters, section headings, and intra-book links:
//! ```
//! # use quire::Publication;
//! # use quire::asset::AssetStore;
//! # use quire::book::Book;
//! use quire::chapter::{Block, ChapterNode, ChapterTree, Inline};
//!
//! # fn main() -> quire::EpubResult<()> {
//! # let book = Book::builder().title("T").identifier("id").language("en").build();
//! let mut chapters = ChapterTree::new();
//! chapters.push(
//!     // A section heading: listed in navigation, but not in the reading order
//!     ChapterNode::new("Part I").children([
//!         ChapterNode::new("Chapter 1").key("c1").blocks([
//!             Block::paragraph([
//!                 Inline::text("See "),
//!                 Inline::link("chapter:c2", "the next chapter"),
//!                 Inline::note("A footnote."),
//!             ]),
//!         ]),
//!         ChapterNode::new("Chapter 2").key("c2").markup("<p>The <em>end</em>.</p>"),
//!     ]),
//! );
//!
//! Publication::new(book, chapters, AssetStore::new())
//!     .write()
//!     .toc_title("Table of Contents")
//!     .to_vec()?;
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod book;
pub mod chapter;
pub mod datetime;
pub mod errors;
pub mod input;

mod archive;
mod consts;
mod manifest;
mod nav;
mod package;
mod publication;
mod render;
mod util;
mod write;
mod writer;

pub use self::{
    consts::mime,
    errors::{EpubError, EpubResult},
    publication::Publication,
    write::EpubWriteOptions,
};
