//! The immutable input of a write: metadata, chapters and assets.

use crate::asset::AssetStore;
use crate::book::Book;
use crate::chapter::ChapterTree;
use crate::write::EpubWriteOptions;

/// Everything needed to produce an EPUB container.
///
/// A [`Publication`] is never modified by writing,
/// so the same instance may be written any number of times,
/// including from several threads at once.
///
/// # Examples
/// ```
/// use quire::Publication;
/// use quire::asset::AssetStore;
/// use quire::book::Book;
/// use quire::chapter::{ChapterNode, ChapterTree};
///
/// # fn main() -> quire::EpubResult<()> {
/// let mut assets = AssetStore::new();
/// assets.register_inferred("cover.png", vec![0x89, b'P', b'N', b'G'])?;
///
/// let book = Book::builder()
///     .title("A Short Story")
///     .identifier("urn:uuid:123e4567-e89b-12d3-a456-426614174000")
///     .language("en")
///     .creator("Jane Doe")
///     .cover("cover.png")
///     .build();
///
/// let mut chapters = ChapterTree::new();
/// chapters.push(ChapterNode::new("Chapter 1").text("It was a dark and stormy night."));
///
/// let epub = Publication::new(book, chapters, assets)
///     .write()
///     .compression(9)
///     .cover_page(true)
///     .to_vec()?;
///
/// assert_eq!(b"PK", &epub[..2]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Publication {
    book: Book,
    chapters: ChapterTree,
    assets: AssetStore,
}

impl Publication {
    /// Bundles metadata, chapters and assets for writing.
    ///
    /// Inputs are validated when writing, not here.
    pub fn new(book: Book, chapters: ChapterTree, assets: AssetStore) -> Self {
        Self {
            book,
            chapters,
            assets,
        }
    }

    /// The publication-wide metadata.
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// The chapter hierarchy.
    pub fn chapters(&self) -> &ChapterTree {
        &self.chapters
    }

    /// The registered assets.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Returns configuration to write this [`Publication`] to a destination.
    #[must_use]
    pub fn write(&self) -> EpubWriteOptions<&Self> {
        EpubWriteOptions::<&Self>::new(self)
    }
}
