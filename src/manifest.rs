//! The package manifest and spine.

use crate::asset::AssetStore;
use crate::consts::{layout, mime, opf};
use crate::errors::{EpubError, EpubResult};
use crate::render::ContentDocument;
use crate::util::str::path_to_id;
use crate::util::uri;
use std::collections::HashMap;

/// A resource declared in the package document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ManifestItem {
    pub(crate) id: String,
    /// Container-root-relative archive path.
    pub(crate) path: String,
    /// Percent-encoded href relative to the package directory.
    pub(crate) href: String,
    pub(crate) media_type: String,
    pub(crate) properties: Vec<&'static str>,
}

impl ManifestItem {
    /// Space-separated `properties` attribute value, if any.
    pub(crate) fn properties_attribute(&self) -> Option<String> {
        (!self.properties.is_empty()).then(|| self.properties.join(" "))
    }
}

/// Manifest items in declaration order, indexed by id and archive path.
#[derive(Clone, Debug, Default)]
pub(crate) struct Manifest {
    items: Vec<ManifestItem>,
    by_id: HashMap<String, usize>,
    by_path: HashMap<String, usize>,
}

impl Manifest {
    /// Declares the resource at `path`, deriving its id from the path
    /// relative to the package directory.
    ///
    /// # Errors
    /// [`EpubError::ManifestConflict`] if the id or path is already declared.
    pub(crate) fn insert(
        &mut self,
        path: &str,
        media_type: &str,
        properties: Vec<&'static str>,
    ) -> EpubResult<&ManifestItem> {
        let relative = path
            .strip_prefix(layout::PACKAGE_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path);
        let id = path_to_id(relative);

        if self.by_id.contains_key(&id) || self.by_path.contains_key(path) {
            return Err(EpubError::ManifestConflict {
                id,
                path: path.to_owned(),
            });
        }

        let index = self.items.len();
        self.by_id.insert(id.clone(), index);
        self.by_path.insert(path.to_owned(), index);
        self.items.push(ManifestItem {
            id,
            path: path.to_owned(),
            href: uri::relativize(layout::PACKAGE_DIR, path),
            media_type: media_type.to_owned(),
            properties,
        });
        Ok(&self.items[index])
    }

    pub(crate) fn items(&self) -> &[ManifestItem] {
        &self.items
    }

    pub(crate) fn get(&self, id: &str) -> Option<&ManifestItem> {
        self.by_id.get(id).map(|&index| &self.items[index])
    }

    /// The item declared for the archive `path`.
    pub(crate) fn by_path(&self, path: &str) -> Option<&ManifestItem> {
        self.by_path.get(path).map(|&index| &self.items[index])
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

/// Reading order as manifest idrefs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Spine {
    pub(crate) idrefs: Vec<String>,
    /// Manifest id of the NCX.
    pub(crate) toc: String,
}

/// Everything the manifest declares, besides the navigation documents.
pub(crate) struct ManifestSources<'a> {
    /// Content documents in reading order.
    pub(crate) documents: &'a [ContentDocument],
    pub(crate) cover_page: Option<&'a ContentDocument>,
    /// The head chapter, read after the cover page.
    pub(crate) head: Option<&'a ContentDocument>,
    pub(crate) stylesheet: bool,
    pub(crate) assets: &'a AssetStore,
    /// Asset id of the cover image.
    pub(crate) cover: Option<&'a str>,
}

/// Declares every resource and derives the spine.
///
/// Items are declared in a fixed order: navigation document, NCX, stylesheet,
/// cover page, head chapter, content documents in reading order, then assets
/// sorted by id. The spine follows the same order.
pub(crate) fn build(sources: &ManifestSources<'_>) -> EpubResult<(Manifest, Spine)> {
    let mut manifest = Manifest::default();
    let mut idrefs = Vec::with_capacity(sources.documents.len() + 1);

    manifest.insert(layout::NAV_PATH, mime::XHTML, vec![opf::NAV_PROPERTY])?;
    let toc = manifest.insert(layout::NCX_PATH, mime::NCX, Vec::new())?.id.clone();

    if sources.stylesheet {
        manifest.insert(layout::STYLESHEET_PATH, mime::CSS, Vec::new())?;
    }

    let documents = sources
        .cover_page
        .into_iter()
        .chain(sources.head)
        .chain(sources.documents);

    for document in documents {
        let mut properties = Vec::new();
        if document.features.mathml {
            properties.push(opf::MATHML_PROPERTY);
        }
        if document.features.svg {
            properties.push(opf::SVG_PROPERTY);
        }
        let item = manifest.insert(&document.path, mime::XHTML, properties)?;
        idrefs.push(item.id.clone());
    }

    for asset in sources.assets {
        let properties = if sources.cover == Some(asset.id()) {
            vec![opf::COVER_IMAGE_PROPERTY]
        } else {
            Vec::new()
        };
        manifest.insert(asset.path(), asset.media_type(), properties)?;
    }

    log::debug!(
        "manifest declares {} items; spine holds {}",
        manifest.len(),
        idrefs.len(),
    );
    Ok((manifest, Spine { idrefs, toc }))
}
