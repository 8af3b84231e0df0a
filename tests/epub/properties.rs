use crate::epub::util::{
    assert_well_formed, attribute_values, book, element_text, names, open, publication, read_str,
    toc_depth,
};
use proptest::prelude::*;
use quire::Publication;
use quire::asset::AssetStore;
use quire::chapter::{Block, ChapterNode, ChapterTree, Inline, Limits};
use std::collections::HashMap;

fn title() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,11}"
}

/// Random trees where every section heading has at least one child,
/// so each one leads to a chapter with content.
fn chapter() -> impl Strategy<Value = ChapterNode> {
    let leaf = title().prop_map(|title| ChapterNode::new(title.clone()).text(title));

    leaf.prop_recursive(4, 40, 4, |inner| {
        (title(), any::<bool>(), prop::collection::vec(inner, 1..4)).prop_map(
            |(title, content, children)| {
                let node = ChapterNode::new(title.clone()).children(children);
                if content { node.text(title) } else { node }
            },
        )
    })
}

fn tree() -> impl Strategy<Value = ChapterTree> {
    prop::collection::vec(chapter(), 1..4).prop_map(ChapterTree::from_iter)
}

/// Recursive pre-order, for comparison with the iterative traversal.
fn pre_order<'a>(nodes: &'a [ChapterNode], depth: usize, out: &mut Vec<(&'a str, usize, bool)>) {
    for node in nodes {
        out.push((node.title(), depth, node.has_content()));
        pre_order(node.sub_chapters(), depth + 1, out);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_flatten_is_pre_order(tree in tree()) {
        let mut expected = Vec::new();
        pre_order(tree.roots(), 1, &mut expected);

        let flat = tree.flatten(Limits::default()).unwrap();
        let actual = flat
            .iter()
            .map(|entry| (entry.node.title(), entry.depth, entry.node.has_content()))
            .collect::<Vec<_>>();

        prop_assert_eq!(expected, actual);

        for (i, entry) in flat.iter().enumerate() {
            let target = &flat[entry.target];
            prop_assert!(target.node.has_content());
            prop_assert!(entry.target >= i);
        }
    }

    #[test]
    fn prop_spine_follows_reading_order(tree in tree()) {
        let mut nodes = Vec::new();
        pre_order(tree.roots(), 1, &mut nodes);
        let expected = nodes
            .iter()
            .filter(|(_, _, content)| *content)
            .map(|(title, ..)| title.to_string())
            .collect::<Vec<_>>();
        let max_depth = nodes.iter().map(|(_, depth, _)| *depth).max().unwrap_or_default();

        let bytes = publication(book(), tree.clone(), AssetStore::new())
            .write()
            .to_vec()
            .unwrap();
        let mut container = open(bytes);

        // Spine idref → manifest href → document title
        let opf = read_str(&mut container, "OEBPS/content.opf");
        let hrefs = attribute_values(&opf, "item", "id")
            .into_iter()
            .zip(attribute_values(&opf, "item", "href"))
            .collect::<HashMap<_, _>>();
        let actual = attribute_values(&opf, "itemref", "idref")
            .iter()
            .map(|idref| {
                let document = read_str(&mut container, &format!("OEBPS/{}", hrefs[idref]));
                element_text(&document, "title").unwrap_or_default()
            })
            .collect::<Vec<_>>();

        prop_assert_eq!(&expected, &actual);

        let nav = read_str(&mut container, "OEBPS/nav.xhtml");
        prop_assert_eq!(max_depth, toc_depth(&nav));

        let ncx = read_str(&mut container, "OEBPS/toc.ncx");
        prop_assert_eq!(expected.len(), attribute_values(&ncx, "navPoint", "playOrder").len());
    }
}

/// Arbitrary text, half of it drawn from markup syntax and characters XML forbids.
fn hostile_text() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[\\x00-\\x1F<>&;#/=\"' a-z\u{D7FF}\u{E000}\u{FFFD}-\u{FFFF}]{0,16}",
    ]
}

/// One chapter per input path: plain text, arbitrary markup, character
/// references, and blocks with a note and a table.
fn hostile_publication(
    title: String,
    text: String,
    note: String,
    reference: u32,
) -> Publication {
    let mut chapters = ChapterTree::from_iter([
        ChapterNode::new(title.clone()).text(text.clone()),
        ChapterNode::new(text.clone()).markup(text.clone()),
        ChapterNode::new("References").markup(format!("<p>&#{reference};</p><p title=\"&#x{reference:X};\">x</p>")),
        ChapterNode::new(note.clone()).blocks([
            Block::paragraph([Inline::text(title.clone()), Inline::note(note.clone())]),
            Block::table(format!("<table><tr><td>{text}</td></tr></table>"), title.clone(), note.clone()),
        ]),
    ]);
    chapters.set_head(ChapterNode::new(note.clone()).text(title.clone()));

    let book = book()
        .title(format!("T{title}"))
        .creator(text)
        .description(note);
    publication(book, chapters, AssetStore::new())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_output_is_well_formed_xml(
        title in hostile_text(),
        text in hostile_text(),
        note in hostile_text(),
        reference in 0u32..0x11_0000,
    ) {
        let bytes = hostile_publication(title, text, note, reference)
            .write()
            .to_vec()
            .unwrap();
        let mut container = open(bytes);

        let entries = names(&container)
            .into_iter()
            .filter(|name| [".xhtml", ".opf", ".ncx", ".xml"].iter().any(|extension| name.ends_with(extension)))
            .map(str::to_owned)
            .collect::<Vec<_>>();
        prop_assert_eq!(9, entries.len(), "{:?}", entries);

        for name in entries {
            assert_well_formed(&name, &read_str(&mut container, &name));
        }
    }
}
