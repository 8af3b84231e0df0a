//! Publication-wide [`Book`] metadata.

use crate::datetime::DateTime;
use crate::errors::MetadataError;
use crate::input::Many;

/// Book metadata written to the package document.
///
/// `title`, `identifier`, and `language` are required;
/// they must be non-empty after trimming whitespace,
/// otherwise writing fails with [`MetadataError`].
///
/// # See Also
/// - [`Book::builder`] to create a [`Book`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Book {
    title: String,
    identifier: String,
    language: String,
    creators: Vec<Contributor>,
    contributors: Vec<Contributor>,
    description: Option<String>,
    publisher: Option<String>,
    cover: Option<String>,
    modified: Option<DateTime>,
}

impl Book {
    /// Returns a builder to construct [`Book`] metadata.
    ///
    /// # Examples
    /// ```
    /// use quire::book::{Book, Contributor, Role};
    ///
    /// let book = Book::builder()
    ///     .title("Moby-Dick")
    ///     .identifier("urn:isbn:9780000000001")
    ///     .language("en")
    ///     .creator("Herman Melville")
    ///     .contributor(Contributor::new("Jane Doe").role(Role::Editor))
    ///     .cover("cover.jpg")
    ///     .build();
    ///
    /// assert_eq!("Moby-Dick", book.title());
    /// assert_eq!(Some("cover.jpg"), book.cover());
    /// assert_eq!(Role::Author, book.creators()[0].role_kind());
    /// ```
    pub fn builder() -> BookBuilder {
        BookBuilder(Book::default())
    }

    /// The title (`dc:title`).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The unique identifier (`dc:identifier`).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The language code (`dc:language`).
    pub fn language(&self) -> &str {
        &self.language
    }

    /// All creators in insertion order.
    pub fn creators(&self) -> &[Contributor] {
        &self.creators
    }

    /// All contributors in insertion order.
    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }

    /// The description (`dc:description`), if set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The publisher (`dc:publisher`), if set.
    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    /// The cover asset id, if set.
    pub fn cover(&self) -> Option<&str> {
        self.cover.as_deref()
    }

    /// The pinned modification timestamp, if set.
    ///
    /// Writing falls back to [`DateTime::ZIP_EPOCH`].
    pub fn modified(&self) -> Option<DateTime> {
        self.modified
    }

    /// Checks that every required field is present.
    ///
    /// The title is checked first, then the identifier, then the language.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.title.trim().is_empty() {
            Err(MetadataError::MissingTitle)
        } else if self.identifier.trim().is_empty() {
            Err(MetadataError::MissingIdentifier)
        } else if self.language.trim().is_empty() {
            Err(MetadataError::MissingLanguage)
        } else {
            Ok(())
        }
    }
}

/// Builder for [`Book`], accessible via [`Book::builder`].
///
/// Text values are stored as plain text (e.g. `"1 < 2 & 3"`);
/// they are XML-escaped automatically during writing.
#[derive(Clone, Debug, Default)]
pub struct BookBuilder(Book);

impl BookBuilder {
    /// Sets the title (`dc:title`). **Required.**
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = title.into();
        self
    }

    /// Sets the unique identifier (`dc:identifier`),
    /// such as `urn:isbn:...` or `urn:uuid:...`. **Required.**
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.0.identifier = identifier.into();
        self
    }

    /// Sets the language (`dc:language`) as a BCP 47 code,
    /// such as `en` or `fr-CA`. **Required.**
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.0.language = language.into();
        self
    }

    /// Appends one or more creators (`dc:creator`).
    ///
    /// A plain name is treated as an [author](Role::Author).
    pub fn creator(mut self, creator: impl Many<Contributor>) -> Self {
        self.0.creators.extend(creator.iter_many());
        self
    }

    /// Appends one or more contributors (`dc:contributor`),
    /// such as editors and translators.
    pub fn contributor(mut self, contributor: impl Many<Contributor>) -> Self {
        self.0.contributors.extend(contributor.iter_many());
        self
    }

    /// Sets the description (`dc:description`).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    /// Sets the publisher (`dc:publisher`).
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.0.publisher = Some(publisher.into());
        self
    }

    /// References a registered [asset](crate::asset::AssetStore) as the cover image.
    ///
    /// The id must resolve when writing, otherwise
    /// [`EpubError::UnknownAsset`](crate::EpubError::UnknownAsset) is returned.
    pub fn cover(mut self, asset_id: impl Into<String>) -> Self {
        self.0.cover = Some(asset_id.into());
        self
    }

    /// Pins the modification timestamp (`dcterms:modified`).
    ///
    /// The same value is used for every archive entry timestamp.
    /// When unset, [`DateTime::ZIP_EPOCH`] is used,
    /// so rebuilds of the same input are byte-identical either way.
    pub fn modified(mut self, modified: DateTime) -> Self {
        self.0.modified = Some(modified);
        self
    }

    /// Pins the modification timestamp to the current time.
    ///
    /// Output then differs between builds.
    /// On targets without a clock (see [`DateTime::try_now`]),
    /// the timestamp is left unset.
    pub fn modified_now(mut self) -> Self {
        if let Some(now) = DateTime::try_now() {
            self.0.modified = Some(now);
        }
        self
    }

    /// Returns the built [`Book`].
    ///
    /// Required fields are checked when writing, not here.
    pub fn build(self) -> Book {
        self.0
    }
}

/// A person or organization responsible for the book.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contributor {
    name: String,
    role: Role,
}

impl Contributor {
    /// Creates a contributor with the [author](Role::Author) role.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Role::Author,
        }
    }

    /// Sets the role.
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The [`Role`].
    pub fn role_kind(&self) -> Role {
        self.role
    }
}

impl From<&str> for Contributor {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Contributor {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Contribution roles, written as
/// [MARC relator](https://www.loc.gov/marc/relators/relaterm.html) refinements.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// `aut`
    Author,
    /// `edt`
    Editor,
    /// `trl`
    Translator,
    /// `ill`
    Illustrator,
    /// `nrt`
    Narrator,
}

impl Role {
    /// The MARC relator code.
    pub fn as_marc(&self) -> &'static str {
        match self {
            Self::Author => "aut",
            Self::Editor => "edt",
            Self::Translator => "trl",
            Self::Illustrator => "ill",
            Self::Narrator => "nrt",
        }
    }
}
