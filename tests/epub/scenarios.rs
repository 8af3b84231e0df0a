use crate::epub::util::{
    self, attribute_values, book, names, open, publication, read_bytes, read_str, single_chapter,
    toc_depth,
};
use quire::asset::AssetStore;
use quire::chapter::{Block, ChapterNode, ChapterTree};
use quire::errors::MetadataError;
use quire::{EpubError, EpubWriteOptions};
use wasm_bindgen_test::wasm_bindgen_test;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[test]
#[wasm_bindgen_test]
fn test_minimal_book() {
    let bytes = publication(book(), single_chapter(), AssetStore::new())
        .write()
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    #[rustfmt::skip]
    let expected = [
        "mimetype",
        "META-INF/container.xml",
        "OEBPS/content.opf",
        "OEBPS/nav.xhtml",
        "OEBPS/toc.ncx",
        "OEBPS/styles/style.css",
        "OEBPS/Text/part01.xhtml",
    ];
    assert_eq!(expected.to_vec(), names(&container));

    let opf = read_str(&mut container, "OEBPS/content.opf");
    assert_eq!(vec!["Text-part01.xhtml"], attribute_values(&opf, "itemref", "idref"));
    assert_eq!(vec!["toc.ncx"], attribute_values(&opf, "spine", "toc"));
    assert!(opf.contains("<dc:title>Test Book</dc:title>"));
    assert!(opf.contains(r#"<meta property="dcterms:modified">2023-11-14T22:13:20Z</meta>"#));

    let container_xml = read_str(&mut container, "META-INF/container.xml");
    assert_eq!(
        vec!["OEBPS/content.opf"],
        attribute_values(&container_xml, "rootfile", "full-path"),
    );

    let chapter = read_str(&mut container, "OEBPS/Text/part01.xhtml");
    assert!(chapter.contains("<title>Chapter 1</title>"));
    assert!(chapter.contains("<p>Hello, world.</p>"));
    assert!(chapter.contains(r#"<link rel="stylesheet" type="text/css" href="../styles/style.css"/>"#));
}

#[test]
#[wasm_bindgen_test]
fn test_cover() {
    let mut assets = AssetStore::new();
    assets.register("cover.png", PNG, "image/png").unwrap();

    let bytes = publication(book().cover("cover.png"), single_chapter(), assets)
        .write()
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    assert_eq!(PNG, read_bytes(&mut container, "OEBPS/assets/cover.png"));

    let opf = read_str(&mut container, "OEBPS/content.opf");
    assert!(opf.contains(r#"<meta name="cover" content="assets-cover.png"/>"#));
    assert!(opf.contains(
        r#"<item id="assets-cover.png" href="assets/cover.png" media-type="image/png" properties="cover-image"/>"#
    ));
    // No cover page unless requested
    assert_eq!(vec!["Text-part01.xhtml"], attribute_values(&opf, "itemref", "idref"));
}

#[test]
#[wasm_bindgen_test]
fn test_cover_page() {
    let mut assets = AssetStore::new();
    assets.register_inferred("cover.png", PNG).unwrap();

    let bytes = publication(book().cover("cover.png"), single_chapter(), assets)
        .write()
        .cover_page(true)
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    let opf = read_str(&mut container, "OEBPS/content.opf");
    assert_eq!(
        vec!["Text-cover.xhtml", "Text-part01.xhtml"],
        attribute_values(&opf, "itemref", "idref"),
    );

    let cover_page = read_str(&mut container, "OEBPS/Text/cover.xhtml");
    assert!(cover_page.contains(r#"<img src="../assets/cover.png" alt="Test Book"/>"#));

    let nav = read_str(&mut container, "OEBPS/nav.xhtml");
    assert!(nav.contains(r#"<a epub:type="cover" href="Text/cover.xhtml">Cover</a>"#));

    let ncx = read_str(&mut container, "OEBPS/toc.ncx");
    assert_eq!(
        vec!["Text/cover.xhtml", "Text/part01.xhtml"],
        attribute_values(&ncx, "content", "src"),
    );
}

#[test]
#[wasm_bindgen_test]
fn test_nested_chapters() {
    let chapters = ChapterTree::from_iter([ChapterNode::new("root").text("r").children([
        ChapterNode::new("child1")
            .text("c1")
            .children(ChapterNode::new("grandchild").text("g")),
        ChapterNode::new("child2").text("c2"),
    ])]);

    let bytes = publication(book(), chapters, AssetStore::new())
        .write()
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    let nav = read_str(&mut container, "OEBPS/nav.xhtml");
    assert_eq!(3, toc_depth(&nav));
    assert_eq!(
        vec!["Text/part01.xhtml", "Text/part02.xhtml", "Text/part03.xhtml", "Text/part04.xhtml"],
        attribute_values(&nav, "a", "href")[..4].to_vec(),
    );

    #[rustfmt::skip]
    let expected_spine = [
        "Text-part01.xhtml", // root
        "Text-part02.xhtml", // child1
        "Text-part03.xhtml", // grandchild
        "Text-part04.xhtml", // child2
    ];
    let opf = read_str(&mut container, "OEBPS/content.opf");
    assert_eq!(expected_spine.to_vec(), attribute_values(&opf, "itemref", "idref"));

    let grandchild = read_str(&mut container, "OEBPS/Text/part03.xhtml");
    assert!(grandchild.contains("<title>grandchild</title>"));
}

#[test]
#[wasm_bindgen_test]
fn test_section_heading() {
    let chapters = ChapterTree::from_iter([
        ChapterNode::new("Part I").children([
            ChapterNode::new("One").anchor("one").text("1"),
            ChapterNode::new("Two").text("2"),
        ]),
    ]);

    let bytes = publication(book(), chapters, AssetStore::new())
        .write()
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    let nav = read_str(&mut container, "OEBPS/nav.xhtml");
    assert_eq!(
        vec!["Text/part01.xhtml#one", "Text/part01.xhtml#one", "Text/part02.xhtml"],
        attribute_values(&nav, "a", "href")[..3].to_vec(),
    );

    // The heading is not part of the reading order
    let opf = read_str(&mut container, "OEBPS/content.opf");
    assert_eq!(2, attribute_values(&opf, "itemref", "idref").len());
}

#[test]
#[wasm_bindgen_test]
fn test_empty_title() {
    let publication = publication(book().title("  "), single_chapter(), AssetStore::new());
    let mut sink = Vec::new();

    let result = publication.write().write(&mut sink);

    assert!(matches!(
        result,
        Err(EpubError::Metadata(MetadataError::MissingTitle))
    ));
    assert!(sink.is_empty());
}

#[test]
fn test_empty_title_save() {
    let publication = publication(book().title(""), single_chapter(), AssetStore::new());
    let path = std::env::temp_dir().join("quire-empty-title.epub");

    let result = publication.write().save(&path);

    assert!(matches!(
        result,
        Err(EpubError::Metadata(MetadataError::MissingTitle))
    ));
    assert!(!path.exists());
    assert!(!std::env::temp_dir().join("quire-empty-title.epub.quire.tmp").exists());
}

#[test]
#[wasm_bindgen_test]
fn test_dangling_cover() {
    let publication = publication(book().cover("missing.png"), single_chapter(), AssetStore::new());

    assert!(matches!(
        publication.write().to_vec(),
        Err(EpubError::UnknownAsset(id)) if id == "missing.png"
    ));
}

#[test]
#[wasm_bindgen_test]
fn test_links_and_assets() {
    let mut assets = AssetStore::new();
    assets.register_inferred("figures/whale.png", PNG).unwrap();

    let chapters = ChapterTree::from_iter([
        ChapterNode::new("One")
            .key("one")
            .markup(r#"<p><a href="chapter:two#end">Two</a><img src="asset:figures/whale.png" alt=""/></p>"#),
        ChapterNode::new("Two").key("two").text("The end."),
    ]);

    let bytes = publication(book(), chapters, assets)
        .write()
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    let one = read_str(&mut container, "OEBPS/Text/part01.xhtml");
    assert_eq!(vec!["part02.xhtml#end"], attribute_values(&one, "a", "href"));
    assert_eq!(vec!["../assets/figures%252Fwhale.png"], attribute_values(&one, "img", "src"));
    assert_eq!(PNG, read_bytes(&mut container, "OEBPS/assets/figures%2Fwhale.png"));
}

#[test]
#[wasm_bindgen_test]
fn test_unresolved_link() {
    let chapters = ChapterTree::from_iter([
        ChapterNode::new("One").markup(r#"<a href="chapter:nowhere">?</a>"#),
    ]);
    let publication = publication(book(), chapters, AssetStore::new());

    assert!(matches!(
        publication.write().to_vec(),
        Err(EpubError::Packaging(quire::errors::PackagingError::UnresolvedLink { target, .. }))
            if target == "chapter:nowhere"
    ));
}

#[test]
#[wasm_bindgen_test]
fn test_options() {
    let chapters = ChapterTree::from_iter([
        ChapterNode::new("One").text("1").children(ChapterNode::new("Deep").text("2")),
    ]);
    let publication = publication(book(), chapters, AssetStore::new());

    let mut options = EpubWriteOptions::default();
    options
        .stylesheet(None)
        .toc_title("Table of Contents")
        .compression(0);
    let mut container = open(options.to_vec(&publication).unwrap());

    assert!(!util::names(&container).contains(&"OEBPS/styles/style.css"));
    let nav = read_str(&mut container, "OEBPS/nav.xhtml");
    assert!(nav.contains("<title>Table of Contents</title>"));
    assert!(!nav.contains("stylesheet"));

    // Structural limits
    assert!(matches!(
        publication.write().max_depth(1).to_vec(),
        Err(EpubError::Structure(_))
    ));
    assert!(matches!(
        publication.write().max_nodes(1).to_vec(),
        Err(EpubError::Structure(_))
    ));
}

#[test]
#[wasm_bindgen_test]
fn test_head_chapter() {
    let mut chapters = ChapterTree::from_iter([
        ChapterNode::new("One").markup(r#"<p><a href="chapter:foreword">Foreword</a></p>"#),
    ]);
    chapters.set_head(ChapterNode::new("Foreword").key("foreword").text("Before."));

    let mut assets = AssetStore::new();
    assets.register_inferred("cover.png", PNG).unwrap();
    let bytes = publication(book().cover("cover.png"), chapters, assets)
        .write()
        .cover_page(true)
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    // Read after the cover page, before the first chapter
    let opf = read_str(&mut container, "OEBPS/content.opf");
    assert_eq!(
        vec!["Text-cover.xhtml", "Text-head.xhtml", "Text-part01.xhtml"],
        attribute_values(&opf, "itemref", "idref"),
    );
    assert!(opf.contains(r#"<item id="Text-head.xhtml" href="Text/head.xhtml" media-type="application/xhtml+xml"/>"#));

    let head = read_str(&mut container, "OEBPS/Text/head.xhtml");
    assert!(head.contains("<title>Foreword</title>"));
    assert!(head.contains("<p>Before.</p>"));

    let one = read_str(&mut container, "OEBPS/Text/part01.xhtml");
    assert_eq!(vec!["head.xhtml"], attribute_values(&one, "a", "href"));

    // Listed in neither the table of contents nor the NCX
    let nav = read_str(&mut container, "OEBPS/nav.xhtml");
    assert!(!nav.contains("head.xhtml"));
    assert!(!nav.contains("Foreword"));
    let ncx = read_str(&mut container, "OEBPS/toc.ncx");
    assert_eq!(
        vec!["Text/cover.xhtml", "Text/part01.xhtml"],
        attribute_values(&ncx, "content", "src"),
    );

    let names = names(&container);
    let position = |name: &str| names.iter().position(|entry| *entry == name).unwrap();
    assert!(position("OEBPS/Text/cover.xhtml") < position("OEBPS/Text/head.xhtml"));
    assert!(position("OEBPS/Text/head.xhtml") < position("OEBPS/Text/part01.xhtml"));
}

#[test]
#[wasm_bindgen_test]
fn test_head_chapter_without_content() {
    let mut chapters = single_chapter();
    chapters.set_head(ChapterNode::new("Foreword"));

    assert!(matches!(
        publication(book(), chapters, AssetStore::new()).write().to_vec(),
        Err(EpubError::Structure(quire::errors::StructureError::NoContent { title })) if title == "Foreword"
    ));
}

#[test]
#[wasm_bindgen_test]
fn test_tables_and_mathml() {
    let chapters = ChapterTree::from_iter([
        ChapterNode::new("Data").blocks([
            Block::paragraph("Measurements follow."),
            Block::table("<table><tr><th>n</th></tr><tr><td>1</td></tr></table>", "Table 1", "Counted by hand"),
        ]),
        ChapterNode::new("Formula").markup(r#"<p><math xmlns="http://www.w3.org/1998/Math/MathML"><mi>x</mi></math></p>"#),
    ]);

    let bytes = publication(book(), chapters, AssetStore::new())
        .write()
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    let data = read_str(&mut container, "OEBPS/Text/part01.xhtml");
    assert!(data.contains(concat!(
        r#"<div class="alt-wrapper"><p class="title">Table 1</p>"#,
        "<table><tr><th>n</th></tr><tr><td>1</td></tr></table>",
        r#"<p class="caption">Counted by hand</p></div>"#,
    )));

    let opf = read_str(&mut container, "OEBPS/content.opf");
    assert!(opf.contains(r#"<item id="Text-part01.xhtml" href="Text/part01.xhtml" media-type="application/xhtml+xml"/>"#));
    assert!(opf.contains(r#"<item id="Text-part02.xhtml" href="Text/part02.xhtml" media-type="application/xhtml+xml" properties="mathml"/>"#));
}

#[test]
#[wasm_bindgen_test]
fn test_untitled_chapters() {
    let chapters = ChapterTree::from_iter([
        ChapterNode::new("").children(ChapterNode::new("\t").text("x")),
    ]);

    let bytes = publication(book(), chapters, AssetStore::new())
        .write()
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    let nav = read_str(&mut container, "OEBPS/nav.xhtml");
    assert!(!nav.contains("></a>"), "{nav}");
    assert!(nav.contains(r#"<a href="Text/part01.xhtml">Untitled</a>"#));

    let ncx = read_str(&mut container, "OEBPS/toc.ncx");
    assert!(ncx.contains("<text>Untitled</text>"));
    assert!(!ncx.contains("<text></text>"));

    let chapter = read_str(&mut container, "OEBPS/Text/part01.xhtml");
    assert!(chapter.contains("<title>Untitled</title>"));
}

#[test]
#[wasm_bindgen_test]
fn test_similar_asset_ids() {
    let mut assets = AssetStore::new();
    for (id, byte) in [("Cover.png", 1u8), ("cover.png", 2), ("a.png", 3), ("a-png", 4)] {
        assets.register(id, vec![byte], "image/png").unwrap();
    }

    let bytes = publication(book(), single_chapter(), assets)
        .write()
        .to_vec()
        .unwrap();
    let mut container = open(bytes);

    let opf = read_str(&mut container, "OEBPS/content.opf");
    let ids = attribute_values(&opf, "item", "id");
    let unique = ids.iter().collect::<std::collections::HashSet<_>>();
    assert_eq!(ids.len(), unique.len(), "{ids:?}");

    #[rustfmt::skip]
    let expected = [
        ("OEBPS/assets/Cover.png", 1u8),
        ("OEBPS/assets/cover.png", 2),
        ("OEBPS/assets/a.png", 3),
        ("OEBPS/assets/a-png", 4),
    ];
    for (path, byte) in expected {
        assert_eq!(vec![byte], read_bytes(&mut container, path));
    }
}
