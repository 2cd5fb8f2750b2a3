//! Byte decoding helpers for word-processor HTML exports.

use std::borrow::Cow;

/// How far into a document to look for a `<meta charset>` declaration.
const CHARSET_SNIFF_LIMIT: usize = 2048;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<meta charset>`)
/// 3. Falls back to Windows-1252 (common in older word-processor exports)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Decode an HTML document, using its own charset declaration as the hint.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    let hint = sniff_charset(bytes);
    decode_text(bytes, hint.as_deref())
}

/// Find a `charset=` declaration near the start of an HTML document.
///
/// Matches both `<meta charset="x">` and the older
/// `<meta http-equiv="content-type" content="text/html; charset=x">`.
pub fn sniff_charset(bytes: &[u8]) -> Option<String> {
    let window = &bytes[..bytes.len().min(CHARSET_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(window).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();

    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();

    if label.is_empty() { None } else { Some(label) }
}

/// Collapse runs of HTML whitespace to a single space. Non-breaking spaces
/// are content and are kept.
///
/// `pending_space` carries whether the text before `s` ended in collapsed
/// whitespace, so collapsing continues across text node boundaries.
pub fn collapse_whitespace(s: &str, pending_space: &mut bool) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_ascii_whitespace() {
            if !*pending_space {
                out.push(' ');
                *pending_space = true;
            }
        } else {
            out.push(ch);
            *pending_space = false;
        }
    }
    out
}

/// Shorten text for diagnostics, on a character boundary.
pub fn excerpt(s: &str, max_chars: usize) -> String {
    let trimmed = s.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars).collect();
    out.push('…');
    out
}
