use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::borrow::Cow;

/// Characters escaped when an archive path is written as an href.
///
/// Path separators are retained.
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub(crate) fn parent(href: &str) -> &str {
    href.rfind('/')
        .map_or("", |index| if index == 0 { "/" } else { &href[..index] })
}

/// Percent-encodes an archive path so it can be referenced as an href.
pub(crate) fn encode(path: &str) -> Cow<'_, str> {
    utf8_percent_encode(path, HREF).into()
}

/// Expresses the archive path `target` relative to the directory `from_dir`.
///
/// Both arguments are container-root-relative, decoded paths.
/// The result is percent-encoded.
pub(crate) fn relativize(from_dir: &str, target: &str) -> String {
    let from = from_dir.split('/').filter(|s| !s.is_empty());
    let mut to = target.split('/').filter(|s| !s.is_empty()).peekable();
    let mut from = from.peekable();

    // Skip the shared directory prefix
    while let (Some(a), Some(b)) = (from.peek(), to.peek()) {
        if a != b {
            break;
        }
        from.next();
        to.next();
    }

    let mut relative = String::new();
    for _ in from {
        relative.push_str("../");
    }
    let rest = to.collect::<Vec<_>>().join("/");
    relative.push_str(&encode(&rest));
    relative
}
