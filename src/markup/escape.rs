//! Escaping of literal text in NENA markup.

/// Characters with a meaning in NENA markup.
pub const SPECIAL_CHARS: [char; 4] = ['\\', '*', '<', '>'];

/// Backslash-escape the characters that would otherwise read as delimiters.
///
/// # Examples
///
/// ```
/// use nenaconv::markup::escape_markup;
///
/// assert_eq!(escape_markup("2*3"), "2\\*3");
/// assert_eq!(escape_markup("<x>"), "\\<x\\>");
/// ```
pub fn escape_markup(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    for c in text.chars() {
        if SPECIAL_CHARS.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
