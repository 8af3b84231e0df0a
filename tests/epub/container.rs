use crate::epub::util::{book, names, open, publication, read_str, single_chapter};
use quire::Publication;
use quire::asset::AssetStore;
use quire::book::Book;
use quire::datetime::DateTime;
use quire::chapter::{ChapterNode, ChapterTree};
use std::sync::Arc;
use std::thread;
use wasm_bindgen_test::wasm_bindgen_test;
use zip::CompressionMethod;

fn sample(reverse_assets: bool) -> Publication {
    #[rustfmt::skip]
    let mut entries = vec![
        ("a.png", vec![1, 2, 3]),
        ("b.css", b"p { margin: 0; }".to_vec()),
        ("c.woff2", vec![4, 5, 6]),
    ];
    if reverse_assets {
        entries.reverse();
    }

    let mut assets = AssetStore::new();
    for (id, data) in entries {
        assets.register_inferred(id, data).unwrap();
    }

    let chapters = ChapterTree::from_iter([
        ChapterNode::new("Part").children([
            ChapterNode::new("One").text("first\n\nsecond"),
            ChapterNode::new("Two").markup("<p>Two <em>2</em></p>"),
        ]),
        ChapterNode::new("Three").text("third"),
    ]);

    publication(book().cover("a.png"), chapters, assets)
}

#[test]
#[wasm_bindgen_test]
fn test_mimetype_first_and_stored() {
    let bytes = publication(book(), single_chapter(), AssetStore::new())
        .write()
        .compression(9)
        .to_vec()
        .unwrap();

    // Local file header of the first entry
    assert_eq!(b"PK\x03\x04", &bytes[..4]);
    // Compression method: stored
    assert_eq!([0, 0], bytes[8..10]);

    let name_len = u16::from_le_bytes([bytes[26], bytes[27]]) as usize;
    let extra_len = u16::from_le_bytes([bytes[28], bytes[29]]) as usize;
    let name_end = 30 + name_len;
    let data_start = name_end + extra_len;

    assert_eq!(b"mimetype", &bytes[30..name_end]);
    assert_eq!(b"application/epub+zip", &bytes[data_start..data_start + 20]);

    let mut container = open(bytes);
    assert_eq!(CompressionMethod::Stored, container.by_index(0).unwrap().compression());
    assert_eq!(CompressionMethod::Deflated, container.by_index(1).unwrap().compression());
}

#[test]
#[wasm_bindgen_test]
fn test_compression_zero_stores_everything() {
    let bytes = sample(false).write().compression(0).to_vec().unwrap();
    let mut container = open(bytes);

    for i in 0..container.len() {
        assert_eq!(CompressionMethod::Stored, container.by_index(i).unwrap().compression());
    }
}

#[test]
#[wasm_bindgen_test]
fn test_deterministic_output() {
    let publication = sample(false);

    let first = publication.write().to_vec().unwrap();
    let second = publication.write().to_vec().unwrap();
    // Asset registration order does not matter
    let reordered = sample(true).write().to_vec().unwrap();

    assert_eq!(first, second);
    assert_eq!(first, reordered);
}

#[test]
#[wasm_bindgen_test]
fn test_deterministic_output_without_pinned_timestamp() {
    let unpinned = || {
        let book = Book::builder()
            .title("Test Book")
            .identifier("urn:x")
            .language("en")
            .build();
        Publication::new(book, single_chapter(), AssetStore::new())
    };

    let first = unpinned().write().to_vec().unwrap();
    let second = unpinned().write().to_vec().unwrap();
    assert_eq!(first, second);

    let mut container = open(first);
    let opf = read_str(&mut container, "OEBPS/content.opf");
    assert!(opf.contains(r#"<meta property="dcterms:modified">1980-01-01T00:00:00Z</meta>"#));

    for i in 0..container.len() {
        let modified = container.by_index(i).unwrap().last_modified().unwrap();
        assert_eq!((1980, 1, 1), (modified.year(), modified.month(), modified.day()));
        assert_eq!((0, 0, 0), (modified.hour(), modified.minute(), modified.second()));
    }
}

#[test]
fn test_modified_now() {
    let book = Book::builder().modified_now().build();

    assert!(book.modified().is_some_and(|modified| modified > DateTime::ZIP_EPOCH));
}

#[test]
#[wasm_bindgen_test]
fn test_entry_order_and_timestamps() {
    let mut container = open(sample(false).write().to_vec().unwrap());

    #[rustfmt::skip]
    let expected = [
        "mimetype",
        "META-INF/container.xml",
        "OEBPS/content.opf",
        "OEBPS/nav.xhtml",
        "OEBPS/toc.ncx",
        "OEBPS/styles/style.css",
        "OEBPS/Text/part01.xhtml",
        "OEBPS/Text/part02.xhtml",
        "OEBPS/Text/part03.xhtml",
        "OEBPS/assets/a.png",
        "OEBPS/assets/b.css",
        "OEBPS/assets/c.woff2",
    ];
    assert_eq!(expected.to_vec(), names(&container));

    for i in 0..container.len() {
        let modified = container.by_index(i).unwrap().last_modified().unwrap();
        // 2023-11-14T22:13:20Z
        assert_eq!(
            (2023, 11, 14, 22, 13, 20),
            (
                modified.year(),
                modified.month(),
                modified.day(),
                modified.hour(),
                modified.minute(),
                modified.second(),
            ),
        );
    }
}

#[test]
#[wasm_bindgen_test]
fn test_asset_registration_is_idempotent() {
    let mut assets = AssetStore::new();

    let first = assets.register("a.png", vec![1], "image/png").unwrap().to_owned();
    let second = assets.register("a.png", vec![1], "image/png").unwrap().to_owned();

    assert_eq!(first, second);
    assert_eq!(1, assets.len());
    assert!(assets.register("a.png", vec![2], "image/png").is_err());
    assert!(assets.register("a.png", vec![1], "image/gif").is_err());
}

#[test]
fn test_concurrent_writes() {
    let publication = Arc::new(sample(false));
    let expected = publication.write().to_vec().unwrap();

    let handles = (0..4)
        .map(|i| {
            let publication = Arc::clone(&publication);
            thread::spawn(move || {
                publication
                    .write()
                    .concurrent_rendering(i % 2 == 0)
                    .to_vec()
                    .unwrap()
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert_eq!(expected, handle.join().unwrap());
    }
}
