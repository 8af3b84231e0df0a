//! The ordered, nested [`ChapterTree`] and its flattening into reading order.

mod content;

pub use content::{Block, Content, Inline};

use crate::errors::StructureError;
use crate::input::Many;
use std::collections::HashSet;

/// Label used in place of a blank title.
pub(crate) const UNTITLED: &str = "Untitled";

/// A chapter with optional [`Content`] and nested sub-chapters.
///
/// A node without content is a *section heading*: it appears in the
/// table of contents, linking to its first descendant with content,
/// yet is not part of the reading order.
///
/// # Examples
/// ```
/// use quire::chapter::{Block, ChapterNode};
///
/// let part = ChapterNode::new("Part I")
///     .children([
///         ChapterNode::new("Loomings")
///             .key("loomings")
///             .text("Call me Ishmael.\n\nSome years ago..."),
///         ChapterNode::new("The Carpet-Bag")
///             .markup(r#"<p>See <a href="chapter:loomings">Loomings</a>.</p>"#),
///         ChapterNode::new("The Spouter-Inn")
///             .blocks([Block::heading("The Spouter-Inn"), Block::paragraph("...")]),
///     ]);
///
/// assert!(!part.has_content());
/// assert_eq!(3, part.sub_chapters().len());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ChapterNode {
    title: String,
    content: Option<Content>,
    key: Option<String>,
    anchor: Option<String>,
    children: Vec<ChapterNode>,
}

impl ChapterNode {
    /// Creates a section heading with the given title and no content.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
            key: None,
            anchor: None,
            children: Vec::new(),
        }
    }

    /// Sets the content to plain text.
    ///
    /// Paragraphs are separated by blank lines;
    /// single line breaks are retained as `<br/>`.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.content(Content::Text(text.into()))
    }

    /// Sets the content to an XHTML body fragment (e.g., `<p>Hello</p>`).
    ///
    /// Links of the form `chapter:KEY[#fragment]` and `asset:ID` are
    /// rewritten to the generated document and asset locations.
    /// Fragments that are not well-formed are emitted as escaped text.
    pub fn markup(self, fragment: impl Into<String>) -> Self {
        self.content(Content::Markup(fragment.into()))
    }

    /// Sets the content to an undecoded XHTML body fragment.
    ///
    /// The bytes must be UTF-8, or UTF-16 with a byte order mark.
    pub fn markup_bytes(self, fragment: impl Into<Vec<u8>>) -> Self {
        self.content(Content::Bytes(fragment.into()))
    }

    /// Appends structured [`Block`]s, replacing any non-block content.
    pub fn blocks(mut self, blocks: impl Many<Block>) -> Self {
        match &mut self.content {
            Some(Content::Blocks(existing)) => existing.extend(blocks.iter_many()),
            content => *content = Some(Content::Blocks(blocks.iter_many().collect())),
        }
        self
    }

    /// Sets the [`Content`] directly.
    pub fn content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    /// Sets the link key, referenced from other chapters as `chapter:KEY`.
    ///
    /// Keys must be unique within a [`ChapterTree`].
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the `id` of the chapter's `<section>` element.
    ///
    /// Navigation entries targeting this chapter include it as the fragment.
    pub fn anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Appends one or more sub-chapters.
    pub fn children(mut self, children: impl Many<ChapterNode>) -> Self {
        self.children.extend(children.iter_many());
        self
    }

    /// The title shown in navigation and the document `<title>`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The title, or `Untitled` if it is blank.
    ///
    /// Navigation entries and document `<title>`s use this,
    /// so no link is ever left without text.
    pub fn label(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// The content, or [`None`] for a section heading.
    pub fn body(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Returns `true` if this node is part of the reading order.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// The link key, if set.
    pub fn link_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The `<section>` element id, if set.
    pub fn section_id(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Direct sub-chapters in insertion order.
    pub fn sub_chapters(&self) -> &[ChapterNode] {
        &self.children
    }
}

/// Bounds enforced while [flattening](ChapterTree::flatten).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nodes in the tree.
    pub max_nodes: usize,
    /// Maximum nesting depth; top-level chapters are at depth `1`.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_nodes: 10_000,
            max_depth: 32,
        }
    }
}

/// A node positioned within the flattened tree.
#[derive(Copy, Clone, Debug)]
pub struct FlatChapter<'a> {
    /// The node itself.
    pub node: &'a ChapterNode,
    /// Nesting depth, `1` for top-level chapters.
    pub depth: usize,
    /// Index of the node this entry links to in the flattened sequence.
    ///
    /// Equal to its own index when the node has content;
    /// otherwise the first descendant with content.
    pub target: usize,
}

/// The ordered forest of top-level [`ChapterNode`]s.
///
/// Children are exclusively owned by their parent, so the tree is acyclic
/// by construction.
///
/// An optional [head chapter](Self::set_head) precedes the roots in reading
/// order without being listed in navigation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChapterTree {
    roots: Vec<ChapterNode>,
    head: Option<ChapterNode>,
}

impl ChapterTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one or more top-level chapters.
    pub fn push(&mut self, chapters: impl Many<ChapterNode>) -> &mut Self {
        self.roots.extend(chapters.iter_many());
        self
    }

    /// Top-level chapters in insertion order.
    pub fn roots(&self) -> &[ChapterNode] {
        &self.roots
    }

    /// Sets the head chapter, replacing any previous one.
    ///
    /// The head is front matter: it is read before the first top-level
    /// chapter, yet appears in neither the table of contents nor the NCX.
    /// It must have content, and its link key shares the namespace of the
    /// tree's keys. Sub-chapters of the head are not rendered.
    ///
    /// # Examples
    /// ```
    /// use quire::chapter::{ChapterNode, ChapterTree};
    ///
    /// let mut tree = ChapterTree::new();
    /// tree.set_head(ChapterNode::new("Foreword").key("foreword").text("..."))
    ///     .push(ChapterNode::new("Chapter 1").text("..."));
    ///
    /// assert_eq!(Some("Foreword"), tree.head().map(ChapterNode::title));
    /// assert_eq!(1, tree.roots().len());
    /// ```
    pub fn set_head(&mut self, head: ChapterNode) -> &mut Self {
        self.head = Some(head);
        self
    }

    /// The head chapter, if set.
    pub fn head(&self) -> Option<&ChapterNode> {
        self.head.as_ref()
    }

    /// Returns `true` if the tree has no top-level chapters.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Flattens the tree into depth-first pre-order, with depth `1` for
    /// top-level chapters.
    ///
    /// Traversal uses an explicit stack, so deep trees cannot overflow
    /// the call stack.
    ///
    /// # Errors
    /// - [`StructureError::TooManyNodes`]: More than [`Limits::max_nodes`] nodes.
    /// - [`StructureError::TooDeep`]: A node nested deeper than [`Limits::max_depth`].
    /// - [`StructureError::DuplicateKey`]: Two nodes share a [link key](ChapterNode::key).
    /// - [`StructureError::Empty`]: No node has content.
    /// - [`StructureError::NoContent`]: A section heading has no descendant with content,
    ///   or the [head](Self::set_head) has no content.
    ///
    /// The head is validated here but not included in the result.
    ///
    /// # Examples
    /// ```
    /// use quire::chapter::{ChapterNode, ChapterTree, Limits};
    ///
    /// let mut tree = ChapterTree::new();
    /// tree.push([
    ///     ChapterNode::new("root").text("r").children([
    ///         ChapterNode::new("child1").text("c1").children(
    ///             ChapterNode::new("grandchild").text("g"),
    ///         ),
    ///         ChapterNode::new("child2").text("c2"),
    ///     ]),
    /// ]);
    ///
    /// let flat = tree.flatten(Limits::default()).unwrap();
    /// let order = flat
    ///     .iter()
    ///     .map(|entry| (entry.node.title(), entry.depth))
    ///     .collect::<Vec<_>>();
    ///
    /// assert_eq!(
    ///     vec![("root", 1), ("child1", 2), ("grandchild", 3), ("child2", 2)],
    ///     order,
    /// );
    /// ```
    pub fn flatten(&self, limits: Limits) -> Result<Vec<FlatChapter<'_>>, StructureError> {
        let mut flat = Vec::new();
        let mut keys = HashSet::new();

        if let Some(head) = &self.head {
            if !head.has_content() {
                return Err(StructureError::NoContent {
                    title: head.title.clone(),
                });
            }
            if let Some(key) = head.link_key() {
                keys.insert(key);
            }
            if !head.children.is_empty() {
                log::warn!(
                    "head chapter `{}`: {} sub-chapters are not rendered",
                    head.title,
                    head.children.len(),
                );
            }
        }

        // Reversed so that popping yields insertion order
        let mut stack = self.roots.iter().rev().map(|node| (node, 1)).collect::<Vec<_>>();

        while let Some((node, depth)) = stack.pop() {
            if depth > limits.max_depth {
                return Err(StructureError::TooDeep {
                    limit: limits.max_depth,
                });
            }
            if flat.len() == limits.max_nodes {
                return Err(StructureError::TooManyNodes {
                    limit: limits.max_nodes,
                });
            }
            if let Some(key) = node.link_key()
                && !keys.insert(key)
            {
                return Err(StructureError::DuplicateKey {
                    key: key.to_owned(),
                });
            }

            flat.push(FlatChapter {
                node,
                depth,
                target: flat.len(),
            });
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }

        resolve_targets(&mut flat)?;
        Ok(flat)
    }
}

impl<C: Into<ChapterNode>> FromIterator<C> for ChapterTree {
    fn from_iter<T: IntoIterator<Item = C>>(iter: T) -> Self {
        Self {
            roots: iter.into_iter().map(Into::into).collect(),
            head: None,
        }
    }
}

/// Points every section heading at its first descendant with content.
fn resolve_targets(flat: &mut [FlatChapter<'_>]) -> Result<(), StructureError> {
    let len = flat.len();

    // Exclusive end index of each node's subtree
    let mut subtree_end = vec![len; len];
    let mut open: Vec<usize> = Vec::new();
    for (i, entry) in flat.iter().enumerate() {
        while let Some(&parent) = open.last() {
            if flat[parent].depth < entry.depth {
                break;
            }
            subtree_end[parent] = i;
            open.pop();
        }
        open.push(i);
    }

    // Nearest node with content at or after each index
    let mut next_content = vec![None; len + 1];
    for i in (0..len).rev() {
        next_content[i] = if flat[i].node.has_content() {
            Some(i)
        } else {
            next_content[i + 1]
        };
    }

    if next_content[0].is_none() {
        return Err(StructureError::Empty);
    }

    for i in 0..len {
        if flat[i].node.has_content() {
            continue;
        }
        match next_content[i + 1] {
            Some(target) if target < subtree_end[i] => flat[i].target = target,
            _ => {
                return Err(StructureError::NoContent {
                    title: flat[i].node.title.clone(),
                });
            }
        }
    }
    Ok(())
}
