//! Error-related types for packaging a [`Publication`](crate::Publication).
//!
//! Every error is a deterministic function of the input; none are retried.
//! Any error aborts the build before a single byte of the archive is emitted.

pub use crate::util::utf::UtfError;

/// Alias for `Result<T, EpubError>`.
pub type EpubResult<T> = Result<T, EpubError>;

/// Possible errors when packaging a [`Publication`](crate::Publication).
///
/// # Variants
/// ## Input Errors
/// - [`Structure`](EpubError::Structure): Malformed or oversized chapter tree.
/// - [`UnknownAsset`](EpubError::UnknownAsset): Reference to an unregistered asset.
/// - [`DuplicateAsset`](EpubError::DuplicateAsset): Conflicting asset registration.
/// - [`EmptyAssetId`](EpubError::EmptyAssetId): Asset registered without an id.
/// - [`Encoding`](EpubError::Encoding): Chapter content is not decodable text.
/// - [`Metadata`](EpubError::Metadata): Required book metadata is missing.
/// ## Packaging Errors
/// - [`ManifestConflict`](EpubError::ManifestConflict): Two items map to the same id or path.
/// - [`Packaging`](EpubError::Packaging): A reference does not resolve at write time.
/// ## Output Errors
/// - [`Io`](EpubError::Io): Writing to the destination failed.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum EpubError {
    /// The chapter tree violates a structural constraint.
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// An asset id was referenced (e.g., as the cover) but never registered.
    #[error("Unknown asset id: {0}")]
    UnknownAsset(String),

    /// An asset id was registered twice with differing content.
    #[error("Asset id registered twice with differing content: {0}")]
    DuplicateAsset(String),

    /// An asset id is empty, so no archive path can be derived from it.
    #[error("Asset id must not be empty")]
    EmptyAssetId,

    /// Chapter content could not be interpreted as text.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Two manifest items would receive the same id or archive path.
    #[error("Manifest conflict for id `{id}` at `{path}`")]
    ManifestConflict {
        /// The conflicting manifest id.
        id: String,
        /// The archive path of the item that could not be added.
        path: String,
    },

    /// Required book metadata is missing or empty.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// A path or id reference does not resolve among the generated documents.
    #[error(transparent)]
    Packaging(#[from] PackagingError),

    /// An IO exception occurred during writing.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Structural violations of a [`ChapterTree`](crate::chapter::ChapterTree).
#[non_exhaustive]
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum StructureError {
    /// The tree contains more nodes than permitted.
    #[error("Chapter tree exceeds the maximum of {limit} nodes")]
    TooManyNodes {
        /// The configured maximum.
        limit: usize,
    },

    /// The tree nests deeper than permitted.
    #[error("Chapter tree exceeds the maximum depth of {limit}")]
    TooDeep {
        /// The configured maximum.
        limit: usize,
    },

    /// No chapter carries content; the reading order would be empty.
    #[error("Chapter tree contains no chapter with content")]
    Empty,

    /// A section heading has no descendant with content to link to.
    #[error("Section `{title}` has no chapter with content")]
    NoContent {
        /// Title of the offending section.
        title: String,
    },

    /// Two chapters share the same link key.
    #[error("Duplicate chapter key: {key}")]
    DuplicateKey {
        /// The duplicated key.
        key: String,
    },
}

/// Chapter content that cannot be decoded as text.
#[derive(thiserror::Error, Debug)]
#[error("Undecodable content in chapter `{chapter}`: {source}")]
pub struct EncodingError {
    /// Title of the chapter whose content failed to decode.
    pub chapter: String,
    /// The underlying decoding failure.
    #[source]
    pub source: UtfError,
}

/// Missing required book metadata.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MetadataError {
    /// The title is missing or blank.
    #[error("Missing `dc:title` metadata entry")]
    MissingTitle,

    /// The unique identifier is missing or blank.
    #[error("Missing `dc:identifier` metadata entry")]
    MissingIdentifier,

    /// The language code is missing or blank.
    #[error("Missing `dc:language` metadata entry")]
    MissingLanguage,
}

/// Reference mismatches detected while packaging.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PackagingError {
    /// A referenced archive path has no corresponding document or asset.
    #[error("Referenced archive entry does not exist: {0}")]
    MissingEntry(String),

    /// Two documents or assets would be written to the same archive path.
    #[error("Archive entry written more than once: {0}")]
    DuplicateEntry(String),

    /// A spine or navigation reference points to a non-existent manifest id.
    #[error("Reference to a non-existent manifest id: {0}")]
    DanglingIdref(String),

    /// An intra-book link targets a chapter key that does not exist.
    #[error("Unresolved link `{target}` in chapter `{chapter}`")]
    UnresolvedLink {
        /// Title of the chapter containing the link.
        chapter: String,
        /// The link target as written.
        target: String,
    },
}
