//! Inline metadata extraction
//!
//! ICY metadata blocks are null-padded to a multiple of 16 bytes and carry
//! `StreamTitle='...';` (plus optional fields after it). Extraction is
//! forgiving: a malformed block yields `None` and the caller keeps the
//! previous title, so the display never flickers on garbage.

const TITLE_KEY: &[u8] = b"StreamTitle='";

/// Extract the stream title from a raw metadata block.
///
/// The payload is the text between the quote opening the `StreamTitle` value
/// and the last single quote in the block, which lets titles themselves
/// contain quotes. Null padding is stripped first.
pub fn stream_title(block: &[u8]) -> Option<String> {
    let end = block.iter().rposition(|&b| b != 0).map(|p| p + 1)?;
    let block = &block[..end];

    let start = super::header::find(block, TITLE_KEY)? + TITLE_KEY.len();
    let rest = &block[start..];
    let close = rest.iter().rposition(|&b| b == b'\'')?;

    let title = String::from_utf8_lossy(&rest[..close]);
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Offset just past the `StreamTitle` payload in `block`: the closing quote
/// plus a trailing field separator if one follows. Used to clamp a block
/// whose declared length disagrees with the bytes that actually arrived.
pub fn payload_end(block: &[u8]) -> Option<usize> {
    let start = super::header::find(block, TITLE_KEY)? + TITLE_KEY.len();
    let rest = &block[start..];
    let close = rest.iter().rposition(|&b| b == b'\'')?;
    let mut end = start + close + 1;
    if block.get(end) == Some(&b';') {
        end += 1;
    }
    Some(end)
}
