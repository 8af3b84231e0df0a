/// Converts an archive path into an XML `id`.
///
/// `Text/part01.xhtml` → `Text-part01.xhtml`
///
/// ASCII letters, digits and `.` are kept and `/` becomes `-`;
/// every other byte is written as `_XX` (uppercase hex), as is a first
/// character that cannot start an XML name.
/// Distinct paths therefore always yield distinct ids.
pub(crate) fn path_to_id(path: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    fn push_escaped(id: &mut String, byte: u8) {
        id.push('_');
        id.push(HEX[usize::from(byte >> 4)] as char);
        id.push(HEX[usize::from(byte & 0xF)] as char);
    }

    if path.is_empty() {
        // Never produced by escaping, which always appends two hex digits
        return "_".to_owned();
    }

    let mut id = String::with_capacity(path.len() + 8);

    for (i, byte) in path.bytes().enumerate() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' => id.push(byte as char),
            b'0'..=b'9' | b'.' if i > 0 => id.push(byte as char),
            b'/' if i > 0 => id.push('-'),
            _ => push_escaped(&mut id, byte),
        }
    }
    id
}
