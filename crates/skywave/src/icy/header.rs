//! ICY response header parsing
//!
//! The response is scanned as raw bytes, not as a string: the header
//! terminator and the first audio bytes can share one network read, and
//! audio is arbitrary binary.

/// Station name header label
pub const ICY_NAME: &[u8] = b"icy-name:";
/// Station genre header label
pub const ICY_GENRE: &[u8] = b"icy-genre:";
/// Bit rate header label
pub const ICY_BR: &[u8] = b"icy-br:";
/// Metadata interval header label
pub const ICY_METAINT: &[u8] = b"icy-metaint:";

const CRLF: &[u8] = b"\r\n";
const TERMINATOR: &[u8] = b"\r\n\r\n";

/// Find the first occurrence of `needle` in `haystack`.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Offset of the first byte after the `\r\n\r\n` header terminator, if the
/// terminator is present in the buffered data.
pub fn end_of_header(data: &[u8]) -> Option<usize> {
    find(data, TERMINATOR).map(|k| k + TERMINATOR.len())
}

/// Extract the value of a `label:` header line: the text after the label up
/// to the next CRLF, leading spaces stripped. Labels are matched
/// case-sensitively. `None` when the label or its line end is absent.
pub fn header_value<'a>(data: &'a [u8], label: &[u8]) -> Option<&'a [u8]> {
    let start = find(data, label)? + label.len();
    let rest = &data[start..];
    let end = find(rest, CRLF)?;
    let mut value = &rest[..end];
    while let [b' ', tail @ ..] = value {
        value = tail;
    }
    Some(value)
}

/// Parse the metadata interval header as a decimal integer.
/// Absent or malformed reads as 0: a plain audio stream.
pub fn meta_interval(data: &[u8]) -> usize {
    header_value(data, ICY_METAINT)
        .and_then(|v| std::str::from_utf8(v).ok())
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &[u8] = b"ICY 200 OK\r\nicy-name: Radio Paradise\r\nicy-genre:eclectic\r\nicy-br:128\r\nicy-metaint:8192\r\n\r\n\xff\xfb\x90";

    #[test]
    fn finds_labels_in_raw_bytes() {
        assert!(find(RESPONSE, ICY_NAME).is_some());
        assert!(find(RESPONSE, b"icy-url:").is_none());
    }

    #[test]
    fn find_tolerates_binary_content() {
        let data = [0u8, 255, 13, 10, 0, 105, 99];
        assert_eq!(find(&data, b"\r\n"), Some(2));
    }

    #[test]
    fn value_strips_leading_spaces() {
        assert_eq!(
            header_value(RESPONSE, ICY_NAME),
            Some(b"Radio Paradise".as_ref())
        );
    }

    #[test]
    fn value_without_spaces() {
        assert_eq!(header_value(RESPONSE, ICY_GENRE), Some(b"eclectic".as_ref()));
        assert_eq!(header_value(RESPONSE, ICY_BR), Some(b"128".as_ref()));
    }

    #[test]
    fn value_missing_line_end_is_incomplete() {
        // header still arriving: label present but no CRLF yet
        assert_eq!(header_value(b"icy-name: Radio", ICY_NAME), None);
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(header_value(b"ICY-NAME: X\r\n", ICY_NAME), None);
    }

    #[test]
    fn meta_interval_parses_decimal() {
        assert_eq!(meta_interval(RESPONSE), 8192);
    }

    #[test]
    fn meta_interval_absent_is_zero() {
        assert_eq!(meta_interval(b"icy-name: X\r\n\r\n"), 0);
    }

    #[test]
    fn meta_interval_malformed_is_zero() {
        assert_eq!(meta_interval(b"icy-metaint: lots\r\n\r\n"), 0);
    }

    #[test]
    fn end_of_header_points_past_terminator() {
        let end = end_of_header(RESPONSE).unwrap();
        assert_eq!(&RESPONSE[end..], b"\xff\xfb\x90");
    }

    #[test]
    fn end_of_header_absent_while_partial() {
        assert_eq!(end_of_header(b"ICY 200 OK\r\nicy-name: X\r\n"), None);
    }
}
