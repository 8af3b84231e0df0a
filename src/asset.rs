//! Binary resources (images, fonts, stylesheets) embedded in the container.

use crate::consts::{layout, mime};
use crate::errors::{EpubError, EpubResult};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Characters kept literally when an asset id becomes a file name.
///
/// Everything else is percent-encoded, so distinct ids never share a path.
const FILE_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Fallback media type for unrecognized extensions.
const OCTET_STREAM: &str = "application/octet-stream";

/// A registered binary resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    id: String,
    data: Vec<u8>,
    media_type: String,
    path: String,
}

impl Asset {
    /// The logical id the asset was registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The raw payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The media type (e.g., `image/png`).
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The container-root-relative archive path (e.g., `OEBPS/assets/cover.png`).
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Collection of [`Asset`]s keyed by logical id.
///
/// Iteration is sorted by id, independent of registration order.
///
/// # Examples
/// ```
/// use quire::asset::AssetStore;
/// # fn main() -> quire::EpubResult<()> {
/// let mut assets = AssetStore::new();
///
/// let path = assets.register("cover.png", vec![0x89, b'P', b'N', b'G'], "image/png")?;
/// assert_eq!("OEBPS/assets/cover.png", path);
///
/// // Identical re-registration is a no-op
/// assets.register("cover.png", vec![0x89, b'P', b'N', b'G'], "image/png")?;
/// assert_eq!(1, assets.len());
///
/// // Differing content under the same id is rejected
/// assert!(assets.register("cover.png", vec![], "image/png").is_err());
///
/// assert_eq!("image/png", assets.resolve("cover.png")?.media_type());
/// assert!(assets.resolve("missing").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetStore {
    assets: BTreeMap<String, Asset>,
}

impl AssetStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a payload under `id`, returning its archive path.
    ///
    /// Registering the same id again with an identical payload and media type
    /// returns the existing path.
    ///
    /// # Errors
    /// - [`EpubError::DuplicateAsset`]: `id` is registered with a different
    ///   payload or media type.
    /// - [`EpubError::EmptyAssetId`]: `id` is empty.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        data: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
    ) -> EpubResult<&str> {
        let id = id.into();
        let data = data.into();
        let media_type = media_type.into();

        if id.is_empty() {
            return Err(EpubError::EmptyAssetId);
        }

        let asset = match self.assets.entry(id) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();

                if existing.data != data || existing.media_type != media_type {
                    return Err(EpubError::DuplicateAsset(existing.id.clone()));
                }
                existing
            }
            Entry::Vacant(entry) => {
                let path = asset_path(entry.key());
                log::trace!("registered asset `{}` at {path}", entry.key());

                let id = entry.key().clone();
                entry.insert(Asset {
                    id,
                    data,
                    media_type,
                    path,
                })
            }
        };
        Ok(&asset.path)
    }

    /// Registers a payload, inferring the media type from the extension of `id`.
    ///
    /// Unrecognized extensions fall back to `application/octet-stream`.
    ///
    /// # See Also
    /// - [`mime::media_type_for_extension`] for the recognized extensions.
    pub fn register_inferred(
        &mut self,
        id: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> EpubResult<&str> {
        let id = id.into();
        let media_type = id
            .rsplit_once('.')
            .and_then(|(_, extension)| mime::media_type_for_extension(extension))
            .unwrap_or(OCTET_STREAM);

        self.register(id, data, media_type)
    }

    /// Returns the asset registered under `id`.
    ///
    /// # Errors
    /// - [`EpubError::UnknownAsset`]: Nothing is registered under `id`.
    pub fn resolve(&self, id: &str) -> EpubResult<&Asset> {
        self.get(id)
            .ok_or_else(|| EpubError::UnknownAsset(id.to_owned()))
    }

    /// Returns the asset registered under `id`, if any.
    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.get(id)
    }

    /// Returns `true` if an asset is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    /// Returns an iterator over all assets, sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// The number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns `true` if no assets are registered.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<'a> IntoIterator for &'a AssetStore {
    type Item = &'a Asset;
    type IntoIter = std::collections::btree_map::Values<'a, String, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.values()
    }
}

/// `OEBPS/assets/` + the percent-encoded id.
///
/// A leading `.` is encoded as well, so ids such as `..` cannot
/// escape the asset directory.
fn asset_path(id: &str) -> String {
    let mut path = String::with_capacity(layout::ASSET_DIR.len() + id.len() + 1);
    path.push_str(layout::ASSET_DIR);
    path.push('/');

    let rest = match id.strip_prefix('.') {
        Some(rest) => {
            path.push_str("%2E");
            rest
        }
        None => id,
    };
    path.extend(utf8_percent_encode(rest, FILE_NAME));
    path
}
