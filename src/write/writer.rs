use crate::archive::{Archive, References};
use crate::asset::Asset;
use crate::chapter::{ChapterNode, FlatChapter, Limits};
use crate::consts::{layout, ocf};
use crate::datetime::DateTime;
use crate::errors::EpubResult;
use crate::manifest::{self, ManifestSources};
use crate::nav::Navigation;
use crate::package::{self, Package};
use crate::publication::Publication;
use crate::render::{self, ContentDocument, RenderContext};
use std::num::NonZeroUsize;

#[derive(Clone, Debug)]
pub(super) struct EpubWriteConfig {
    /// See [`super::EpubWriteOptions::compression`]
    pub(super) compression: u8,
    /// See [`super::EpubWriteOptions::max_nodes`] and [`super::EpubWriteOptions::max_depth`]
    pub(super) limits: Limits,
    /// See [`super::EpubWriteOptions::stylesheet`]
    pub(super) stylesheet: Option<String>,
    /// See [`super::EpubWriteOptions::cover_page`]
    pub(super) cover_page: bool,
    /// See [`super::EpubWriteOptions::toc_title`]
    pub(super) toc_title: String,
    /// See [`super::EpubWriteOptions::footnotes_title`]
    pub(super) footnotes_title: String,
    /// See [`super::EpubWriteOptions::concurrent_rendering`]
    pub(super) concurrent_rendering: bool,
}

impl Default for EpubWriteConfig {
    fn default() -> Self {
        Self {
            compression: 6,
            limits: Limits::default(),
            stylesheet: Some(render::DEFAULT_STYLESHEET.to_owned()),
            cover_page: false,
            toc_title: "Contents".to_owned(),
            footnotes_title: "References".to_owned(),
            concurrent_rendering: false,
        }
    }
}

/// Runs the pipeline for one publication:
/// flatten → render → navigation → manifest → package → archive.
pub(super) struct EpubWriter<'a> {
    config: &'a EpubWriteConfig,
    publication: &'a Publication,
}

impl<'a> EpubWriter<'a> {
    pub(super) fn new(config: &'a EpubWriteConfig, publication: &'a Publication) -> Self {
        Self {
            config,
            publication,
        }
    }

    pub(super) fn write(self) -> EpubResult<Vec<u8>> {
        let config = self.config;
        let book = self.publication.book();
        let assets = self.publication.assets();

        book.validate()?;

        let cover = book.cover().map(|id| assets.resolve(id)).transpose()?;
        if config.cover_page && cover.is_none() {
            log::warn!("cover page requested, but the book has no cover; skipping");
        }

        let chapters = self.publication.chapters();
        let flat = chapters.flatten(config.limits)?;
        let paths = render::content_paths(&flat);
        log::debug!("chapter tree: {} nodes", flat.len());

        let stylesheet = config.stylesheet.as_ref().map(|_| layout::STYLESHEET_PATH);
        let ctx = RenderContext::new(
            book.language().trim(),
            stylesheet,
            &config.footnotes_title,
            assets,
            &flat,
            &paths,
            chapters.head(),
        );

        let head = chapters
            .head()
            .map(|node| render::render_chapter(node, layout::HEAD_PATH, &ctx))
            .transpose()?;
        let documents = self.render_documents(&flat, &paths, &ctx)?;
        let cover_page = match cover {
            Some(cover) if config.cover_page => {
                Some(render::render_cover_page(book.title().trim(), cover, &ctx)?)
            }
            _ => None,
        };
        log::debug!(
            "rendered {} content documents",
            documents.len() + usize::from(cover_page.is_some()) + usize::from(head.is_some()),
        );

        let navigation = Navigation::new(
            book,
            &config.toc_title,
            stylesheet,
            &flat,
            &paths,
            cover_page.as_ref().map(|document| document.path.as_str()),
        );
        let nav = navigation.to_xhtml()?;
        let ncx = navigation.to_ncx()?;

        let (manifest, spine) = manifest::build(&ManifestSources {
            documents: &documents,
            cover_page: cover_page.as_ref(),
            head: head.as_ref(),
            stylesheet: stylesheet.is_some(),
            assets,
            cover: cover.map(Asset::id),
        })?;

        let modified = book.modified().unwrap_or(DateTime::ZIP_EPOCH);
        let opf = package::assemble(&Package {
            book,
            manifest: &manifest,
            spine: &spine,
            cover,
            modified,
        })?;
        let container = package::container_xml()?;

        let mut archive = Archive::new();
        archive
            .push(ocf::CONTAINER_PATH, &container)
            .push(layout::PACKAGE_PATH, &opf)
            .push(layout::NAV_PATH, &nav)
            .push(layout::NCX_PATH, &ncx);
        if let Some(css) = &config.stylesheet {
            archive.push(layout::STYLESHEET_PATH, css.as_bytes());
        }
        for document in cover_page.iter().chain(&head).chain(&documents) {
            archive.push(&document.path, &document.data);
        }
        for asset in assets {
            archive.push(asset.path(), asset.data());
        }

        let nav_targets = navigation.targets().collect::<Vec<_>>();
        archive.write(
            &References {
                manifest: &manifest,
                spine: &spine,
                nav_targets: &nav_targets,
            },
            config.compression,
            modified,
        )
    }

    /// Renders every chapter with content, in reading order.
    fn render_documents(
        &self,
        flat: &[FlatChapter<'_>],
        paths: &[Option<String>],
        ctx: &RenderContext<'_>,
    ) -> EpubResult<Vec<ContentDocument>> {
        let jobs = flat
            .iter()
            .zip(paths)
            .filter_map(|(entry, path)| Some((entry.node, path.as_deref()?)))
            .collect::<Vec<_>>();

        if !self.config.concurrent_rendering || jobs.len() < 2 {
            return render_all(&jobs, ctx);
        }

        let workers = std::thread::available_parallelism()
            .map_or(1, NonZeroUsize::get)
            .min(jobs.len());
        let chunk_size = jobs.len().div_ceil(workers);
        log::debug!("rendering on {workers} threads");

        // Chunks are contiguous, so joining them in order restores reading order
        let results = std::thread::scope(|scope| {
            jobs.chunks(chunk_size)
                .map(|chunk| scope.spawn(move || render_all(chunk, ctx)))
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });

        let mut documents = Vec::with_capacity(jobs.len());
        for result in results {
            let chunk = result.unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
            documents.extend(chunk);
        }
        Ok(documents)
    }
}

fn render_all(
    jobs: &[(&ChapterNode, &str)],
    ctx: &RenderContext<'_>,
) -> EpubResult<Vec<ContentDocument>> {
    jobs.iter()
        .map(|(node, path)| render::render_chapter(node, path, ctx))
        .collect()
}
