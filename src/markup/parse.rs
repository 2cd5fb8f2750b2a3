//! Markup → runs parsing, for linting written texts.
//!
//! Delimiters are read a cluster at a time: a maximal run of unescaped `*`,
//! `<` and `>` between two pieces of text. A cluster closes some of the open
//! roles, innermost first, then opens roles that are not open, in the order
//! of [`Role::ALL`]. The reading that closes the fewest roles is taken; it is
//! the one the renderer produces.

use crate::error::{Error, Result};
use crate::style::Role;

use super::Run;

/// A parsed `.nena` text: header fields and body paragraphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedText {
    pub fields: Vec<(String, String)>,
    pub paragraphs: Vec<Vec<Run>>,
}

impl ParsedText {
    /// Look up a header field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse inline markup into runs. Newlines are kept as text.
pub fn parse(markup: &str) -> Result<Vec<Run>> {
    parse_at(markup, 0)
}

fn parse_at(markup: &str, base: usize) -> Result<Vec<Run>> {
    let mut runs: Vec<Run> = Vec::new();
    let mut open: Vec<Role> = Vec::new();
    let mut text = String::new();
    let mut chars = markup.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => text.push(escaped),
                None => return Err(invalid(base + offset, "dangling escape")),
            },
            '*' | '<' | '>' => {
                let mut cluster = String::from(c);
                while let Some((_, next)) = chars.next_if(|&(_, c)| is_delimiter(c)) {
                    cluster.push(next);
                }
                flush(&mut runs, &mut text, &open);
                apply_delimiters(&mut open, &cluster, base + offset)?;
            }
            _ => text.push(c),
        }
    }

    flush(&mut runs, &mut text, &open);
    if let Some(role) = open.last() {
        return Err(invalid(base + markup.len(), &format!("unclosed {role}")));
    }
    Ok(runs)
}

/// Parse a whole text: `field: value` header lines, a blank line, then
/// paragraphs separated by blank lines.
pub fn parse_text(source: &str) -> Result<ParsedText> {
    let source = source.trim_end_matches('\n');
    let mut parsed = ParsedText::default();

    let mut body_start = 0;
    let header_end = source.find("\n\n").unwrap_or(source.len());
    let header = &source[..header_end];
    if !header.is_empty() && header.lines().all(is_field_line) {
        for line in header.lines() {
            if let Some((key, value)) = line.split_once(": ") {
                parsed.fields.push((key.to_string(), value.to_string()));
            }
        }
        body_start = (header_end + 2).min(source.len());
    }

    let mut offset = body_start;
    for chunk in source[body_start..].split("\n\n") {
        if !chunk.trim().is_empty() {
            parsed.paragraphs.push(parse_at(chunk, offset)?);
        }
        offset += chunk.len() + 2;
    }
    Ok(parsed)
}

fn is_field_line(line: &str) -> bool {
    line.split_once(": ").is_some_and(|(key, _)| {
        !key.is_empty() && key.chars().all(|c| c.is_ascii_lowercase() || c == '_')
    })
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '*' | '<' | '>')
}

fn apply_delimiters(open: &mut Vec<Role>, cluster: &str, offset: usize) -> Result<()> {
    for closed in 0..=open.len() {
        let kept = open.len() - closed;
        let closing: String = open[kept..].iter().rev().map(|r| r.delimiters().1).collect();
        let Some(rest) = cluster.strip_prefix(closing.as_str()) else {
            continue;
        };
        if let Some(opened) = openings(&open[..kept], rest) {
            open.truncate(kept);
            open.extend(opened);
            return Ok(());
        }
    }
    Err(invalid(offset, &format!("unbalanced delimiters {cluster:?}")))
}

/// The roles outside `kept` whose opening delimiters, in canonical order,
/// spell `rest`.
fn openings(kept: &[Role], rest: &str) -> Option<Vec<Role>> {
    let missing: Vec<Role> = Role::ALL
        .into_iter()
        .filter(|role| !kept.contains(role))
        .collect();
    (0..1u32 << missing.len()).find_map(|mask| {
        let roles: Vec<Role> = missing
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, role)| *role)
            .collect();
        let spelled: String = roles.iter().map(|r| r.delimiters().0).collect();
        (spelled == rest).then_some(roles)
    })
}

fn flush(runs: &mut Vec<Run>, text: &mut String, open: &[Role]) {
    if text.is_empty() {
        return;
    }
    let roles = open.iter().copied().collect();
    match runs.last_mut() {
        Some(last) if last.roles == roles => last.text.push_str(text),
        _ => runs.push(Run {
            text: text.clone(),
            roles,
        }),
    }
    text.clear();
}

fn invalid(offset: usize, reason: &str) -> Error {
    Error::InvalidMarkup {
        offset,
        reason: reason.to_string(),
    }
}
