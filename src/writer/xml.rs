use crate::writer::WriterResult;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::Write;

/// Event-level writer that keeps one start tag open, so attributes can be
/// appended until content, a nested element, or an end tag follows.
pub(crate) struct XmlWriter<'a, W> {
    writer: quick_xml::Writer<W>,
    pending: Option<BytesStart<'a>>,
    indented: bool,
}

impl<'a, W: Write> XmlWriter<'a, W> {
    /// Two-space indentation; for documents without mixed content
    /// (package, container, navigation).
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer: quick_xml::Writer::new_with_indent(writer, b' ', 2),
            pending: None,
            indented: true,
        }
    }

    /// No indentation. Content documents need this, as indentation would
    /// insert whitespace between inline elements (`<em>a</em><b>b</b>`).
    pub(crate) fn compact(writer: W) -> Self {
        Self {
            writer: quick_xml::Writer::new(writer),
            pending: None,
            indented: false,
        }
    }

    pub(crate) fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// `<?xml version="1.0" encoding="UTF-8"?>`
    pub(crate) fn write_utf8_declaration(&mut self) -> WriterResult<&mut Self> {
        let declaration = BytesDecl::new("1.0", Some("UTF-8"), None);

        self.writer.write_event(Event::Decl(declaration))?;
        Ok(self)
    }

    /// `<!DOCTYPE html>`
    pub(crate) fn write_html_doctype(&mut self) -> WriterResult<&mut Self> {
        // The indenting writer breaks lines on its own
        let newline: &[u8] = if self.indented { b"" } else { b"\n" };

        self.writer.get_mut().write_all(newline)?;
        self.writer
            .write_event(Event::DocType(BytesText::from_escaped("html")))?;
        self.writer.get_mut().write_all(newline)?;
        Ok(self)
    }

    /// Writes a pre-escaped event, closing the pending start tag first.
    pub(crate) fn write_event<'e>(&mut self, event: impl Into<Event<'e>>) -> WriterResult<()> {
        self.finish_start_element()?;
        self.writer.write_event(event)?;
        Ok(())
    }

    /// Writes `text`, escaping it.
    pub(crate) fn write_text(&mut self, text: &str) -> WriterResult<()> {
        self.write_event(Event::Text(BytesText::from_escaped(escape(text))))
    }

    /// Writes already serialized markup verbatim.
    pub(crate) fn write_raw(&mut self, markup: &str) -> WriterResult<()> {
        self.finish_start_element()?;
        self.writer.get_mut().write_all(markup.as_bytes())?;
        Ok(())
    }

    /// Opens `<tag`, closing any pending start tag, so that
    /// consecutive calls nest (`<parent><child`).
    pub(crate) fn start_element(&mut self, tag: &'a str) -> WriterResult<&mut Self> {
        self.finish_start_element()?;
        self.pending = Some(BytesStart::new(tag));
        Ok(self)
    }

    /// Appends `name="value"` to the pending start tag.
    ///
    /// A [`None`] value writes nothing.
    pub(crate) fn add_attribute<'v>(
        &mut self,
        name: &str,
        value: impl Into<Option<&'v str>>,
    ) -> &mut Self {
        if let (Some(element), Some(value)) = (&mut self.pending, value.into()) {
            element.push_attribute(Attribute {
                key: QName(name.as_bytes()),
                value: match escape(value.trim()) {
                    Cow::Borrowed(value) => Cow::Borrowed(value.as_bytes()),
                    Cow::Owned(value) => Cow::Owned(value.into_bytes()),
                },
            });
        }
        self
    }

    /// Completes the pending start tag: `<tag>`.
    pub(crate) fn finish_start_element(&mut self) -> WriterResult<()> {
        match self.pending.take() {
            Some(element) => Ok(self.writer.write_event(Event::Start(element))?),
            None => Ok(()),
        }
    }

    /// `</tag>`, completing the pending start tag first.
    ///
    /// Without children, this yields `<tag></tag>` rather than `<tag/>`.
    pub(crate) fn finish_end_element(&mut self, tag: &str) -> WriterResult<()> {
        self.finish_start_element()?;
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// Completes the pending element with escaped `text`: `<tag>text</tag>`.
    pub(crate) fn finish_text_element(&mut self, text: &str) -> WriterResult<()> {
        let Some(element) = self.pending.take() else {
            return Ok(());
        };
        self.writer.write_event(Event::Start(element.borrow()))?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(escape(text))))?;
        self.writer.write_event(Event::End(element.to_end()))?;
        Ok(())
    }

    /// Completes the pending element as self-closing: `<tag/>`.
    pub(crate) fn finish_empty_element(&mut self) -> WriterResult<()> {
        match self.pending.take() {
            Some(element) => Ok(self.writer.write_event(Event::Empty(element))?),
            None => Ok(()),
        }
    }
}

fn entity(c: char) -> Option<&'static str> {
    Some(match c {
        '<' => "&lt;",
        '>' => "&gt;",
        '&' => "&amp;",
        '"' => "&quot;",
        '\'' => "&apos;",
        // Whitespace survives attribute-value normalization
        '\t' => "&#9;",
        '\n' => "&#10;",
        '\r' => "&#13;",
        '\u{00A0}' => "&#160;",
        _ => return None,
    })
}

/// Returns `true` if `c` matches the XML 1.0 `Char` production.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Escapes markup-significant characters for text and attribute values.
///
/// Characters XML cannot represent, even as references, become
/// [`char::REPLACEMENT_CHARACTER`].
pub(crate) fn escape(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find(|c: char| entity(c).is_some() || !is_xml_char(c)) else {
        return Cow::Borrowed(input);
    };
    let mut escaped = String::with_capacity(input.len() + 16);
    escaped.push_str(&input[..first]);

    for c in input[first..].chars() {
        match entity(c) {
            Some(entity) => escaped.push_str(entity),
            None if !is_xml_char(c) => escaped.push(char::REPLACEMENT_CHARACTER),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Replaces characters XML forbids in already escaped content,
/// leaving markup untouched.
pub(crate) fn replace_invalid(input: &str) -> Cow<'_, str> {
    if input.chars().all(is_xml_char) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(
        input
            .chars()
            .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
            .collect(),
    )
}

/// Writes one element and returns the writer's result.
///
/// - Self-closing: `writer: w, tag: t, attributes: { name => value, }`
/// - Text: `writer: w, tag: t, text: s, attributes: { ... }`
/// - Parent: `writer: w, tag: t, attributes: { ... } inner_content: { ... }`
///
/// `attributes` is optional in every form; values may be `Option<&str>`,
/// in which case [`None`] omits the attribute.
macro_rules! write_element {
    (writer: $w:expr, tag: $t:expr, $(attributes: { $($name:expr => $val:expr),* $(,)? })?) => {
        $crate::writer::xml::write_element!(@open $w, $t $($(, $name => $val)*)?)
            .finish_empty_element()
    };
    (writer: $w:expr, tag: $t:expr, text: $text:expr, $(attributes: { $($name:expr => $val:expr),* $(,)? })?) => {
        $crate::writer::xml::write_element!(@open $w, $t $($(, $name => $val)*)?)
            .finish_text_element($text)
    };
    (writer: $w:expr, tag: $t:expr, $(attributes: { $($name:expr => $val:expr),* $(,)? })? inner_content: $inner:block) => {{
        let tag = $t;
        $crate::writer::xml::write_element!(@open $w, tag $($(, $name => $val)*)?);
        $w.finish_start_element()?;
        $inner
        $w.finish_end_element(tag)
    }};
    (@open $w:expr, $t:expr $(, $name:expr => $val:expr)*) => {{
        let element = $w.start_element($t)?;
        $(element.add_attribute($name, $val);)*
        element
    }};
}

pub(crate) use write_element;
