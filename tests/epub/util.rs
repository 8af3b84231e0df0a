use quick_xml::Reader;
use quick_xml::events::Event;
use quire::Publication;
use quire::asset::AssetStore;
use quire::book::{Book, BookBuilder};
use quire::chapter::{ChapterNode, ChapterTree};
use quire::datetime::DateTime;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub type Container = ZipArchive<Cursor<Vec<u8>>>;

/// Fixed so that output is reproducible.
pub const MODIFIED: i64 = 1_700_000_000;

/// A [`BookBuilder`] with every required field set.
pub fn book() -> BookBuilder {
    Book::builder()
        .title("Test Book")
        .identifier("urn:uuid:00000000-0000-0000-0000-000000000000")
        .language("en")
        .creator("Jane Doe")
        .modified(DateTime::from_unix(MODIFIED))
}

pub fn single_chapter() -> ChapterTree {
    ChapterTree::from_iter([ChapterNode::new("Chapter 1").text("Hello, world.")])
}

pub fn publication(book: BookBuilder, chapters: ChapterTree, assets: AssetStore) -> Publication {
    Publication::new(book.build(), chapters, assets)
}

pub fn open(bytes: Vec<u8>) -> Container {
    ZipArchive::new(Cursor::new(bytes)).unwrap()
}

/// Entry names in archive order.
pub fn names(container: &Container) -> Vec<&str> {
    (0..container.len())
        .map(|i| container.name_for_index(i).unwrap())
        .collect()
}

pub fn read_bytes(container: &mut Container, name: &str) -> Vec<u8> {
    let mut data = Vec::new();
    container.by_name(name).unwrap().read_to_end(&mut data).unwrap();
    data
}

pub fn read_str(container: &mut Container, name: &str) -> String {
    String::from_utf8(read_bytes(container, name)).unwrap()
}

/// Values of `attribute` on every `tag` element, in document order.
pub fn attribute_values(xml: &str, tag: &str, attribute: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut values = Vec::new();

    loop {
        match reader.read_event().unwrap() {
            Event::Start(element) | Event::Empty(element)
                if element.name().as_ref() == tag.as_bytes() =>
            {
                if let Some(value) = element.try_get_attribute(attribute).unwrap() {
                    values.push(String::from_utf8(value.value.into_owned()).unwrap());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    values
}

/// Maximum `<ol>` nesting within the `toc` nav of a navigation document.
pub fn toc_depth(nav: &str) -> usize {
    let mut reader = Reader::from_str(nav);
    let mut in_toc = false;
    let mut depth = 0;
    let mut max_depth = 0;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(element) if element.name().as_ref() == b"nav" => {
                in_toc = element
                    .try_get_attribute("epub:type")
                    .unwrap()
                    .is_some_and(|value| value.value.as_ref() == b"toc");
            }
            Event::End(element) if element.name().as_ref() == b"nav" => in_toc = false,
            Event::Start(element) if in_toc && element.name().as_ref() == b"ol" => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            Event::End(element) if in_toc && element.name().as_ref() == b"ol" => depth -= 1,
            Event::Eof => break,
            _ => {}
        }
    }
    max_depth
}

/// Text content of the first `tag` element, without resolving references.
pub fn element_text(xml: &str, tag: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = None::<String>;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(element) if text.is_none() && element.name().as_ref() == tag.as_bytes() => {
                text = Some(String::new());
            }
            Event::Text(content) => {
                if let Some(text) = &mut text {
                    text.push_str(std::str::from_utf8(&content).unwrap());
                }
            }
            Event::End(element) if text.is_some() && element.name().as_ref() == tag.as_bytes() => {
                return text;
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}

/// The `Char` production of XML 1.0.
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

const PREDEFINED_ENTITIES: &[&[u8]] = &[b"lt", b"gt", b"amp", b"apos", b"quot"];

/// Parses the entry `name` to the end, panicking unless it is well-formed
/// and every character, literal or referenced, is one XML allows.
pub fn assert_well_formed(name: &str, xml: &str) {
    if let Some(c) = xml.chars().find(|&c| !is_xml_char(c)) {
        panic!("{name}: forbidden character {c:?}");
    }

    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        let event = reader
            .read_event()
            .unwrap_or_else(|error| panic!("{name}: {error}"));
        let opens = matches!(event, Event::Start(_));

        match event {
            Event::Start(element) | Event::Empty(element) => {
                if depth == 0 {
                    roots += 1;
                }
                if opens {
                    depth += 1;
                }
                for attribute in element.attributes() {
                    attribute.unwrap_or_else(|error| panic!("{name}: {error}"));
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .unwrap_or_else(|| panic!("{name}: unmatched end tag"));
            }
            Event::GeneralRef(reference) => {
                if reference.is_char_ref() {
                    match reference.resolve_char_ref() {
                        Ok(Some(c)) if is_xml_char(c) => {}
                        other => panic!("{name}: forbidden character reference {reference:?} ({other:?})"),
                    }
                } else {
                    assert!(
                        PREDEFINED_ENTITIES.contains(&&*reference),
                        "{name}: undeclared entity {reference:?}",
                    );
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    assert_eq!(0, depth, "{name}: unclosed element");
    assert_eq!(1, roots, "{name}: expected a single root element");
}
