//! Flexible input traits for building a [`Publication`](crate::Publication).
//!
//! - [`Many`]: Pass one-to-many arguments (single items, arrays, or vectors) to methods.
//! - [`IntoOption`]: Pass an [`Option`] or the underlying type directly.

/// A helper trait for flexible one-to-many arguments.
///
/// This trait abstracts over single items and collections (e.g., arrays, vectors),
/// allowing methods to accept both uniformly.
///
/// # See Also
/// - [`Batch`] to pass iterators as arguments to methods that accept `impl Many<T>`.
///
/// # Examples
/// ```
/// use quire::chapter::ChapterNode;
///
/// let part = ChapterNode::new("Part I")
///     // Pass a single item
///     .children(ChapterNode::new("Prologue").text("..."))
///     // Pass an array (Many)
///     .children([
///         ChapterNode::new("Chapter 1").text("..."),
///         ChapterNode::new("Chapter 2").text("..."),
///     ]);
///
/// assert_eq!(3, part.sub_chapters().len());
/// ```
pub trait Many<T> {
    /// The iterator produced.
    type Iter: Iterator<Item = T>;

    /// Returns an iterator over one-to-many items.
    fn iter_many(self) -> Self::Iter;
}

impl<T, I: Into<T>, const N: usize> Many<T> for [I; N] {
    type Iter = std::iter::Map<std::array::IntoIter<I, N>, fn(I) -> T>;

    fn iter_many(self) -> Self::Iter {
        self.into_iter().map(Into::into)
    }
}

impl<T, I: Into<T>> Many<T> for Vec<I> {
    type Iter = std::iter::Map<std::vec::IntoIter<I>, fn(I) -> T>;

    fn iter_many(self) -> Self::Iter {
        self.into_iter().map(Into::into)
    }
}

macro_rules! impl_single_insertable {
    ($(
        impl $target:path,
    )+) => {
        $(
        impl<I: Into<$target>> Many<$target> for I {
            type Iter = std::iter::Once<$target>;

            fn iter_many(self) -> Self::Iter {
                std::iter::once(self.into())
            }
        }

        impl Many<$target> for Option<$target> {
            type Iter = std::option::IntoIter<$target>;

            fn iter_many(self) -> Self::Iter {
                self.into_iter()
            }
        }
        )+
    };
}

impl_single_insertable! {
    impl crate::book::Contributor,
    impl crate::chapter::ChapterNode,
    impl crate::chapter::Block,
    impl crate::chapter::Inline,
}

/// Convenience adapter for passing an [`Iterator`] to methods
/// that accept [`impl Many<T>`](Many).
///
/// Methods that accept `impl Many<T>` do not accept arbitrary
/// implementations of [`IntoIterator`]:
/// ```
/// use quire::book::Book;
/// use quire::input::Batch;
///
/// let creators = ["a", "b", "c"].into_iter().rev();
///
/// let book = Book::builder()
///     .creator(Batch(creators))
///     // Vectors and arrays are supported without the adapter
///     .creator(vec!["x", "y"])
///     .build();
///
/// assert_eq!(5, book.creators().len());
/// assert_eq!("c", book.creators()[0].name());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Batch<Iter>(pub Iter);

impl<T, I: Into<T>, It: IntoIterator<Item = I>> Many<T> for Batch<It> {
    type Iter = std::iter::Map<It::IntoIter, fn(I) -> T>;

    fn iter_many(self) -> Self::Iter {
        self.0.into_iter().map(Into::into)
    }
}

/// A helper trait for flexible [`Option`] arguments,
/// where standard Rust [`Into<Option<T>>`] cannot convert
/// values like `&str` directly into `Option<String>`.
///
/// # Examples
/// ```
/// use quire::EpubWriteOptions;
///
/// EpubWriteOptions::default()
///     .stylesheet("body { margin: 0; }") // &str
///     .stylesheet(String::from("p {}"))   // Owned String
///     .stylesheet(None);                  // Disables the stylesheet
/// ```
pub trait IntoOption<T> {
    /// Consumes self and returns an [`Option`].
    fn into_option(self) -> Option<T>;
}

impl<T> IntoOption<T> for Option<T> {
    fn into_option(self) -> Option<T> {
        self
    }
}

impl IntoOption<String> for &str {
    fn into_option(self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl IntoOption<String> for &String {
    fn into_option(self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl IntoOption<String> for String {
    fn into_option(self) -> Option<String> {
        Some(self)
    }
}
