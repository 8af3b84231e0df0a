//! Rewriting of caller-supplied XHTML body fragments.

use crate::errors::EpubError;
use crate::writer::xml::{escape, is_xml_char, replace_invalid};
use quick_xml::Reader;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesRef, BytesStart, BytesText, Event};
use std::borrow::Cow;

/// Attributes holding a link that may need rewriting.
const LINK_ATTRIBUTES: &[&[u8]] = &[b"href", b"src", b"xlink:href"];
/// The only named entities XML defines without a DTD.
const PREDEFINED_ENTITIES: &[&[u8]] = &[b"lt", b"gt", b"amp", b"apos", b"quot"];
const SVG: &[u8] = b"svg";
const MATH: &[u8] = b"math";

/// Embedded vocabularies the package declares as manifest properties.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Features {
    /// An `<svg>` element.
    pub(crate) svg: bool,
    /// A MathML `<math>` element.
    pub(crate) mathml: bool,
}

impl Features {
    fn detect(&mut self, start: &BytesStart<'_>) {
        let name = start.local_name();
        self.svg |= name.as_ref() == SVG;
        self.mathml |= name.as_ref() == MATH;
    }

    pub(crate) fn merge(&mut self, other: Features) {
        self.svg |= other.svg;
        self.mathml |= other.mathml;
    }
}

/// A well-formed fragment with its links rewritten.
#[derive(Debug)]
pub(super) struct Fragment {
    pub(super) xml: String,
    pub(super) features: Features,
}

#[derive(Debug)]
pub(super) enum RewriteError {
    /// The fragment is not well-formed XML.
    Malformed(String),
    /// A link did not resolve, or output failed.
    Fatal(EpubError),
}

/// Re-serializes `fragment`, replacing each link attribute for which
/// `resolve` returns a new value.
///
/// Declarations, processing instructions and doctypes are dropped.
/// Named entities other than the five predefined ones cannot be
/// resolved without a DTD and are kept as literal text, as are character
/// references to characters XML forbids. Forbidden characters in text,
/// comments and attribute values are replaced.
///
/// Malformed input takes precedence over link errors,
/// since a malformed fragment is emitted as text and its links never resolved.
pub(super) fn rewrite(
    chapter: &str,
    fragment: &str,
    mut resolve: impl FnMut(&str) -> Result<Option<String>, EpubError>,
) -> Result<Fragment, RewriteError> {
    let mut reader = Reader::from_str(fragment);
    let mut writer = quick_xml::Writer::new(Vec::with_capacity(fragment.len()));
    let mut link_error = None;
    let mut depth = 0usize;
    let mut features = Features::default();

    loop {
        let event = match reader.read_event().map_err(malformed)? {
            Event::Start(start) => {
                depth += 1;
                features.detect(&start);
                Event::Start(rewrite_links(&start, &mut resolve, &mut link_error)?)
            }
            Event::Empty(start) => {
                features.detect(&start);
                Event::Empty(rewrite_links(&start, &mut resolve, &mut link_error)?)
            }
            Event::End(end) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| RewriteError::Malformed("unmatched end tag".to_owned()))?;
                Event::End(end)
            }
            Event::GeneralRef(reference) => resolve_reference(chapter, reference),
            Event::Text(text) => match sanitized(&text)? {
                Some(clean) => Event::Text(BytesText::from_escaped(clean)),
                None => Event::Text(text),
            },
            Event::CData(data) => match sanitized(&data)? {
                Some(clean) => Event::CData(BytesCData::new(clean)),
                None => Event::CData(data),
            },
            Event::Comment(comment) => match sanitized(&comment)? {
                Some(clean) => Event::Comment(BytesText::from_escaped(clean)),
                None => Event::Comment(comment),
            },
            Event::Eof => break,
            // Declarations, processing instructions, doctypes
            _ => continue,
        };

        writer
            .write_event(event)
            .map_err(|error| RewriteError::Fatal(error.into()))?;
    }

    if depth != 0 {
        return Err(RewriteError::Malformed("unclosed element".to_owned()));
    }
    if let Some(error) = link_error {
        return Err(RewriteError::Fatal(error));
    }

    let xml = String::from_utf8(writer.into_inner()).map_err(malformed)?;
    Ok(Fragment { xml, features })
}

fn malformed(error: impl std::fmt::Display) -> RewriteError {
    RewriteError::Malformed(error.to_string())
}

/// Raw content with forbidden characters replaced, or [`None`] if it has none.
fn sanitized(raw: &[u8]) -> Result<Option<String>, RewriteError> {
    let raw = std::str::from_utf8(raw).map_err(malformed)?;

    Ok(match replace_invalid(raw) {
        Cow::Owned(clean) => Some(clean),
        Cow::Borrowed(_) => None,
    })
}

/// An element or attribute name, which cannot be repaired by replacement.
fn valid_name(name: &[u8]) -> Result<&str, RewriteError> {
    let name = std::str::from_utf8(name).map_err(malformed)?;

    match name.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(RewriteError::Malformed(format!(
            "forbidden character {c:?} in name `{}`",
            name.escape_debug(),
        ))),
        None => Ok(name),
    }
}

/// Copies an element, rewriting its link attributes.
///
/// The first resolution failure is retained in `link_error`;
/// the attribute is then copied unchanged so parsing can continue.
fn rewrite_links(
    start: &BytesStart<'_>,
    resolve: &mut impl FnMut(&str) -> Result<Option<String>, EpubError>,
    link_error: &mut Option<EpubError>,
) -> Result<BytesStart<'static>, RewriteError> {
    let qname = start.name();
    let name = valid_name(qname.as_ref())?;
    let mut rewritten = BytesStart::new(name.to_owned());

    for attribute in start.attributes() {
        let attribute = attribute.map_err(malformed)?;
        valid_name(attribute.key.as_ref())?;

        if LINK_ATTRIBUTES.contains(&attribute.key.as_ref()) {
            let raw = std::str::from_utf8(&attribute.value).map_err(malformed)?;
            let value = quick_xml::escape::unescape(raw).map_err(malformed)?;

            match resolve(&value) {
                Ok(Some(href)) => {
                    rewritten.push_attribute(Attribute {
                        key: attribute.key,
                        value: escape(&href).into_owned().into_bytes().into(),
                    });
                    continue;
                }
                Ok(None) => {}
                Err(error) => {
                    link_error.get_or_insert(error);
                }
            }
        }
        let value = match sanitized(&attribute.value)? {
            Some(clean) => Cow::Owned(clean.into_bytes()),
            None => attribute.value,
        };
        rewritten.push_attribute(Attribute {
            key: attribute.key,
            value,
        });
    }
    Ok(rewritten)
}

fn resolve_reference<'a>(chapter: &str, reference: BytesRef<'a>) -> Event<'a> {
    let keep = if reference.is_char_ref() {
        matches!(reference.resolve_char_ref(), Ok(Some(c)) if is_xml_char(c))
    } else {
        PREDEFINED_ENTITIES.contains(&&*reference)
    };

    if keep {
        return Event::GeneralRef(reference);
    }

    let literal = format!("&{};", String::from_utf8_lossy(&reference));
    log::warn!("chapter `{chapter}`: unresolvable entity `{literal}` kept as text");
    Event::Text(BytesText::from_escaped(escape(&literal).into_owned()))
}
