//! XML names, namespaces, archive paths and media types.

pub(crate) mod xml {
    pub(crate) const XMLNS: &str = "xmlns";
    pub(crate) const ID: &str = "id";
    pub(crate) const LANG: &str = "xml:lang";
}

/// Open Container Format (`mimetype` + `META-INF/container.xml`).
pub(crate) mod ocf {
    pub(crate) const MIMETYPE_PATH: &str = "mimetype";
    pub(crate) const MIMETYPE: &[u8] = b"application/epub+zip";
    pub(crate) const CONTAINER_PATH: &str = "META-INF/container.xml";
    pub(crate) const CONTAINER_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:container";
    pub(crate) const CONTAINER_VERSION: &str = "1.0";

    pub(crate) const CONTAINER: &str = "container";
    pub(crate) const ROOT_FILES: &str = "rootfiles";
    pub(crate) const ROOT_FILE: &str = "rootfile";
    pub(crate) const VERSION: &str = "version";
    pub(crate) const FULL_PATH: &str = "full-path";
    pub(crate) const MEDIA_TYPE: &str = "media-type";
}

/// Fixed layout of the generated package directory.
pub(crate) mod layout {
    pub(crate) const PACKAGE_DIR: &str = "OEBPS";
    pub(crate) const PACKAGE_PATH: &str = "OEBPS/content.opf";
    pub(crate) const NAV_PATH: &str = "OEBPS/nav.xhtml";
    pub(crate) const NCX_PATH: &str = "OEBPS/toc.ncx";
    pub(crate) const STYLESHEET_PATH: &str = "OEBPS/styles/style.css";
    pub(crate) const TEXT_DIR: &str = "OEBPS/Text";
    pub(crate) const COVER_PAGE_PATH: &str = "OEBPS/Text/cover.xhtml";
    pub(crate) const HEAD_PATH: &str = "OEBPS/Text/head.xhtml";
    pub(crate) const ASSET_DIR: &str = "OEBPS/assets";
}

pub(crate) mod opf {
    pub(crate) const OPF_NS: &str = "http://www.idpf.org/2007/opf";
    pub(crate) const PACKAGE_VERSION: &str = "3.0";

    pub(crate) const PACKAGE: &str = "package";
    pub(crate) const METADATA: &str = "metadata";
    pub(crate) const MANIFEST: &str = "manifest";
    pub(crate) const SPINE: &str = "spine";
    pub(crate) const ITEM: &str = "item";
    pub(crate) const ITEMREF: &str = "itemref";
    pub(crate) const META: &str = "meta";

    pub(crate) const VERSION: &str = "version";
    pub(crate) const UNIQUE_ID: &str = "unique-identifier";
    pub(crate) const HREF: &str = "href";
    pub(crate) const MEDIA_TYPE: &str = "media-type";
    pub(crate) const PROPERTIES: &str = "properties";
    pub(crate) const IDREF: &str = "idref";
    pub(crate) const TOC: &str = "toc";
    pub(crate) const PROPERTY: &str = "property";
    pub(crate) const REFINES: &str = "refines";
    pub(crate) const SCHEME: &str = "scheme";
    pub(crate) const NAME: &str = "name";
    pub(crate) const CONTENT: &str = "content";

    pub(crate) const ROLE: &str = "role";
    pub(crate) const MARC_RELATORS: &str = "marc:relators";
    pub(crate) const COVER: &str = "cover";
    pub(crate) const GENERATOR: &str = "generator";
    pub(crate) const NAV_PROPERTY: &str = "nav";
    pub(crate) const COVER_IMAGE_PROPERTY: &str = "cover-image";
    pub(crate) const SVG_PROPERTY: &str = "svg";
    pub(crate) const MATHML_PROPERTY: &str = "mathml";
}

/// Dublin Core metadata.
pub(crate) mod dc {
    pub(crate) const DUBLIN_CORE_NS: &str = "http://purl.org/dc/elements/1.1/";
    pub(crate) const XMLNS_DC: &str = "xmlns:dc";

    pub(crate) const IDENTIFIER: &str = "dc:identifier";
    pub(crate) const TITLE: &str = "dc:title";
    pub(crate) const LANGUAGE: &str = "dc:language";
    pub(crate) const CREATOR: &str = "dc:creator";
    pub(crate) const CONTRIBUTOR: &str = "dc:contributor";
    pub(crate) const DESCRIPTION: &str = "dc:description";
    pub(crate) const PUBLISHER: &str = "dc:publisher";
    pub(crate) const MODIFIED: &str = "dcterms:modified";
}

pub(crate) mod xhtml {
    pub(crate) const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

    pub(crate) const HTML: &str = "html";
    pub(crate) const HEAD: &str = "head";
    pub(crate) const BODY: &str = "body";
    pub(crate) const TITLE: &str = "title";
    pub(crate) const META: &str = "meta";
    pub(crate) const LINK: &str = "link";
    pub(crate) const NAV: &str = "nav";
    pub(crate) const SECTION: &str = "section";
    pub(crate) const ASIDE: &str = "aside";
    pub(crate) const DIV: &str = "div";
    pub(crate) const H1: &str = "h1";
    pub(crate) const H2: &str = "h2";
    pub(crate) const PARAGRAPH: &str = "p";
    pub(crate) const BLOCKQUOTE: &str = "blockquote";
    pub(crate) const BREAK: &str = "br";
    pub(crate) const IMG: &str = "img";
    pub(crate) const EM: &str = "em";
    pub(crate) const STRONG: &str = "strong";
    pub(crate) const ORDERED_LIST: &str = "ol";
    pub(crate) const LIST_ITEM: &str = "li";
    pub(crate) const ANCHOR: &str = "a";

    pub(crate) const LANG: &str = "lang";
    pub(crate) const CHARSET: &str = "charset";
    pub(crate) const UTF_8: &str = "utf-8";
    pub(crate) const REL: &str = "rel";
    pub(crate) const STYLESHEET: &str = "stylesheet";
    pub(crate) const TYPE: &str = "type";
    pub(crate) const TEXT_CSS: &str = "text/css";
    pub(crate) const HREF: &str = "href";
    pub(crate) const SRC: &str = "src";
    pub(crate) const ALT: &str = "alt";
    pub(crate) const CLASS: &str = "class";
    pub(crate) const HIDDEN: &str = "hidden";
}

/// EPUB structural semantics (`epub:type`).
pub(crate) mod epub {
    pub(crate) const EPUB_NS: &str = "http://www.idpf.org/2007/ops";
    pub(crate) const XMLNS: &str = "xmlns:epub";
    pub(crate) const TYPE: &str = "epub:type";

    pub(crate) const TOC: &str = "toc";
    pub(crate) const LANDMARKS: &str = "landmarks";
    pub(crate) const CHAPTER: &str = "chapter";
    pub(crate) const COVER: &str = "cover";
    pub(crate) const BODYMATTER: &str = "bodymatter";
    pub(crate) const NOTEREF: &str = "noteref";
    pub(crate) const FOOTNOTE: &str = "footnote";
    pub(crate) const FOOTNOTES: &str = "footnotes";
}

/// NCX (EPUB 2 legacy navigation).
pub(crate) mod ncx {
    pub(crate) const NCX_NS: &str = "http://www.daisy.org/z3986/2005/ncx/";
    pub(crate) const NCX_VERSION: &str = "2005-1";

    pub(crate) const NCX: &str = "ncx";
    pub(crate) const HEAD: &str = "head";
    pub(crate) const META: &str = "meta";
    pub(crate) const DOC_TITLE: &str = "docTitle";
    pub(crate) const NAV_MAP: &str = "navMap";
    pub(crate) const NAV_POINT: &str = "navPoint";
    pub(crate) const NAV_LABEL: &str = "navLabel";
    pub(crate) const TEXT: &str = "text";
    pub(crate) const CONTENT: &str = "content";

    pub(crate) const VERSION: &str = "version";
    pub(crate) const NAME: &str = "name";
    pub(crate) const SRC: &str = "src";
    pub(crate) const PLAY_ORDER: &str = "playOrder";

    pub(crate) const DTB_UID: &str = "dtb:uid";
    pub(crate) const DTB_DEPTH: &str = "dtb:depth";
    pub(crate) const DTB_TOTAL_PAGE_COUNT: &str = "dtb:totalPageCount";
    pub(crate) const DTB_MAX_PAGE_NUMBER: &str = "dtb:maxPageNumber";
}

/// Media types.
pub mod mime {
    /// `application/xhtml+xml`
    pub const XHTML: &str = "application/xhtml+xml";
    /// `application/oebps-package+xml`
    pub const OEBPS_PACKAGE: &str = "application/oebps-package+xml";
    /// `application/x-dtbncx+xml`
    pub const NCX: &str = "application/x-dtbncx+xml";
    /// `text/css`
    pub const CSS: &str = "text/css";
    /// `image/png`
    pub const PNG: &str = "image/png";
    /// `image/jpeg`
    pub const JPEG: &str = "image/jpeg";
    /// `image/gif`
    pub const GIF: &str = "image/gif";
    /// `image/svg+xml`
    pub const SVG: &str = "image/svg+xml";
    /// `image/webp`
    pub const WEBP: &str = "image/webp";
    /// `font/ttf`
    pub const TTF: &str = "font/ttf";
    /// `font/otf`
    pub const OTF: &str = "font/otf";
    /// `font/woff`
    pub const WOFF: &str = "font/woff";
    /// `font/woff2`
    pub const WOFF2: &str = "font/woff2";

    /// Returns the media type conventionally associated with a file extension.
    ///
    /// The lookup is case-insensitive and ignores a leading `.`.
    ///
    /// # Examples
    /// ```
    /// use quire::mime;
    ///
    /// assert_eq!(Some(mime::PNG), mime::media_type_for_extension("PNG"));
    /// assert_eq!(Some(mime::JPEG), mime::media_type_for_extension(".jpeg"));
    /// assert_eq!(None, mime::media_type_for_extension("exe"));
    /// ```
    pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();

        Some(match extension.as_str() {
            "png" => PNG,
            "jpg" | "jpeg" => JPEG,
            "gif" => GIF,
            "svg" => SVG,
            "webp" => WEBP,
            "css" => CSS,
            "xhtml" => XHTML,
            "ttf" => TTF,
            "otf" => OTF,
            "woff" => WOFF,
            "woff2" => WOFF2,
            _ => return None,
        })
    }
}
