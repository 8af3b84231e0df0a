//! Writing a [`Publication`] as an EPUB container.

mod writer;

use crate::errors::EpubResult;
use crate::input::IntoOption;
use crate::publication::Publication;
use crate::write::writer::{EpubWriteConfig, EpubWriter};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Configuration for writing a [`Publication`] to a destination.
///
/// `EpubWriteOptions` supports two usage patterns:
/// 1. **Attached**: Bound to a specific [`Publication`].
///    Created via [`Publication::write`].
///    This is ideal for one-off writes.
/// 2. **Detached**: Standalone configuration.
///    Created via [`EpubWriteOptions::default`].
///    This is ideal for reusing the same configuration across multiple publications.
///
/// # Output
/// Output is deterministic: given the same inputs, the produced bytes are
/// identical across runs. Without a pinned
/// [modification date](crate::book::BookBuilder::modified), timestamps are
/// [`DateTime::ZIP_EPOCH`](crate::datetime::DateTime::ZIP_EPOCH);
/// [`modified_now`](crate::book::BookBuilder::modified_now) opts into the current time.
///
/// Nothing is written to the destination unless the whole container
/// was produced successfully.
///
/// # Options
/// - [`compression`](Self::compression) (Default: `6`)
/// - [`max_nodes`](Self::max_nodes) (Default: `10 000`)
/// - [`max_depth`](Self::max_depth) (Default: `32`)
/// - [`stylesheet`](Self::stylesheet) (Default: built-in stylesheet)
/// - [`cover_page`](Self::cover_page) (Default: `false`)
/// - [`toc_title`](Self::toc_title) (Default: `Contents`)
/// - [`footnotes_title`](Self::footnotes_title) (Default: `References`)
/// - [`concurrent_rendering`](Self::concurrent_rendering) (Default: `false`)
///
/// # Examples
/// - Attached:
/// ```no_run
/// # use quire::Publication;
/// # fn main() -> quire::EpubResult<()> {
/// # let publication: Publication = todo!();
/// publication
///     .write()
///     .compression(9)
///     .toc_title("Table of Contents")
///     .save("book.epub")
/// # }
/// ```
/// - Detached:
/// ```no_run
/// # use quire::{EpubWriteOptions, Publication};
/// # fn main() -> quire::EpubResult<()> {
/// # let publications: Vec<Publication> = todo!();
/// let mut options = EpubWriteOptions::default();
/// options.stylesheet(None).cover_page(true);
///
/// for (i, publication) in publications.iter().enumerate() {
///     options.save(publication, format!("book-{i}.epub"))?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct EpubWriteOptions<T = ()> {
    container: T,
    config: EpubWriteConfig,
}

impl<T> EpubWriteOptions<T> {
    fn save_epub(
        publication: &Publication,
        config: &EpubWriteConfig,
        path: impl AsRef<Path>,
    ) -> EpubResult<()> {
        // Generated first, so a failure leaves nothing on disk
        let data = Self::vec_epub(publication, config)?;

        let path = path.as_ref();
        let temp = temp_path(path);

        let write_result = (|| -> std::io::Result<()> {
            let file = std::fs::File::create(&temp)?;
            let mut buf = std::io::BufWriter::new(file);

            buf.write_all(&data)?;
            buf.flush()?;
            std::fs::rename(&temp, path)?;
            Ok(())
        })();

        if let Err(error) = write_result {
            // Attempt to remove the temp file
            let _ = std::fs::remove_file(&temp);
            // Original error takes precedence
            return Err(error.into());
        }
        log::debug!("saved {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    fn write_epub<W: Write>(
        publication: &Publication,
        config: &EpubWriteConfig,
        mut write_to: W,
    ) -> EpubResult<W> {
        let data = Self::vec_epub(publication, config)?;
        write_to.write_all(&data)?;
        Ok(write_to)
    }

    fn vec_epub(publication: &Publication, config: &EpubWriteConfig) -> EpubResult<Vec<u8>> {
        EpubWriter::new(config, publication).write()
    }

    /// Sets the *deflate* compression level of the generated epub file.
    ///
    /// The given compression level must be within the range `[0, 9]`.
    /// If the level is greater than the maximum bound, it is set to `9`.
    ///
    /// - **Lower value**: Faster compression → Larger file size
    /// - **Higher value**: Slower compression → Smaller file size
    ///
    /// A compression level of `0` equates to no compression.
    /// The `mimetype` entry is always stored uncompressed.
    ///
    /// Default: `6` (Balance of speed + compression)
    pub fn compression(&mut self, level: u8) -> &mut Self {
        self.config.compression = level.min(9);
        self
    }

    /// Sets the maximum number of chapter nodes accepted.
    ///
    /// Larger trees fail with
    /// [`StructureError::TooManyNodes`](crate::errors::StructureError::TooManyNodes).
    ///
    /// Default: `10 000`
    pub fn max_nodes(&mut self, max_nodes: usize) -> &mut Self {
        self.config.limits.max_nodes = max_nodes;
        self
    }

    /// Sets the maximum chapter nesting depth accepted; top-level chapters are at depth `1`.
    ///
    /// Deeper trees fail with
    /// [`StructureError::TooDeep`](crate::errors::StructureError::TooDeep).
    ///
    /// Default: `32`
    pub fn max_depth(&mut self, max_depth: usize) -> &mut Self {
        self.config.limits.max_depth = max_depth;
        self
    }

    /// Sets the CSS written to `OEBPS/styles/style.css` and linked from every
    /// generated document.
    ///
    /// Passing [`None`] omits the stylesheet entirely.
    ///
    /// # Examples
    /// ```
    /// # use quire::EpubWriteOptions;
    /// EpubWriteOptions::default()
    ///     // No stylesheet
    ///     .stylesheet(None)
    ///     // Custom stylesheet; only the last call takes effect
    ///     .stylesheet("p { text-indent: 1em; }");
    /// ```
    ///
    /// Default: A small built-in stylesheet.
    pub fn stylesheet(&mut self, css: impl IntoOption<String>) -> &mut Self {
        self.config.stylesheet = css.into_option();
        self
    }

    /// When set to `true`, generates `OEBPS/Text/cover.xhtml` showing the cover
    /// image, placed first in the reading order and listed in the landmarks.
    ///
    /// Has no effect unless the [`Book`](crate::book::Book) references a cover.
    ///
    /// Default: `false`
    pub fn cover_page(&mut self, cover_page: bool) -> &mut Self {
        self.config.cover_page = cover_page;
        self
    }

    /// Sets the heading and title of the navigation document.
    ///
    /// Default: `Contents`
    pub fn toc_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.config.toc_title = title.into();
        self
    }

    /// Sets the heading above footnotes at the end of a chapter.
    ///
    /// Default: `References`
    pub fn footnotes_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.config.footnotes_title = title.into();
        self
    }

    /// When set to `true`, chapters are rendered on multiple threads.
    ///
    /// The output is identical either way; when several chapters fail,
    /// the error of the first in reading order is returned.
    ///
    /// Default: `false`
    pub fn concurrent_rendering(&mut self, concurrent: bool) -> &mut Self {
        self.config.concurrent_rendering = concurrent;
        self
    }
}

impl<'a> EpubWriteOptions<&'a Publication> {
    pub(crate) fn new(publication: &'a Publication) -> Self {
        Self {
            container: publication,
            config: EpubWriteConfig::default(),
        }
    }

    /// Saves a [`Publication`] to disk using the given `path`.
    ///
    /// The container is written to a temporary file next to `path`
    /// (`book.epub` → `book.epub.quire.tmp`), then renamed,
    /// so `path` never holds a partial archive.
    pub fn save(&self, path: impl AsRef<Path>) -> EpubResult<()> {
        Self::save_epub(self.container, &self.config, path)
    }

    /// Writes a [`Publication`] to the given `writer`.
    pub fn write<W: Write>(&self, writer: W) -> EpubResult<W> {
        Self::write_epub(self.container, &self.config, writer)
    }

    /// Generates a [`Publication`] as a byte [`Vec`].
    pub fn to_vec(&self) -> EpubResult<Vec<u8>> {
        Self::vec_epub(self.container, &self.config)
    }
}

impl EpubWriteOptions {
    /// Saves the provided [`Publication`] to disk using the given `path`.
    ///
    /// If options are one-off, prefer [`EpubWriteOptions::<&Publication>::save`].
    pub fn save(&self, publication: &Publication, path: impl AsRef<Path>) -> EpubResult<()> {
        Self::save_epub(publication, &self.config, path)
    }

    /// Writes the provided [`Publication`] to the given `writer`.
    ///
    /// If options are one-off, prefer [`EpubWriteOptions::<&Publication>::write`].
    pub fn write<W: Write>(&self, publication: &Publication, write_to: W) -> EpubResult<W> {
        Self::write_epub(publication, &self.config, write_to)
    }

    /// Generates a byte [`Vec`] for the provided [`Publication`].
    ///
    /// If options are one-off, prefer [`EpubWriteOptions::<&Publication>::to_vec`].
    pub fn to_vec(&self, publication: &Publication) -> EpubResult<Vec<u8>> {
        Self::vec_epub(publication, &self.config)
    }
}

impl Default for EpubWriteOptions {
    fn default() -> Self {
        Self {
            container: (),
            config: EpubWriteConfig::default(),
        }
    }
}

/// `path` with `.quire.tmp` appended to its file name.
///
/// Appending keeps the temp files of `book.epub` and `book.zip` apart.
fn temp_path(path: &Path) -> PathBuf {
    const SUFFIX: &str = ".quire.tmp";

    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(SUFFIX);
    path.with_file_name(name)
}
