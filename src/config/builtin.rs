//! Built-in document types and their shared tables.

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::normalize::Replacement;
use crate::style::Role;

use super::{Config, ConfigTable};

pub const SECTION_HEADING: &str = "gp-sectionheading-western";
pub const SUBSECTION_HEADING: &str = "gp-subsectionheading-western";
pub const SUBSUBSECTION_HEADING: &str = "gp-subsubsectionheading-western";

/// Letters and combining diacritics, plus the superscript plus.
const LETTER_CLASS: &str = r"[^\W\d_]|[\x{300}-\x{36f}]|\x{207a}";

/// The replacement table shared by all built-in document types.
pub fn default_replacements() -> Vec<Replacement> {
    [
        // stylistic
        ("|", "\u{2c8}"),
        ("+", "\u{207a}"),
        // standardizing
        ("\u{2011}", "-"),
        ("\u{1dd}", "\u{259}"),
        ("\u{f1ea}", "="),
        ("\u{2026}", "..."),
        ("J\u{335}", "\u{248}"),
        ("J\u{336}", "\u{248}"),
        ("<y>", "\u{2b8}"),
        // corrections
        ("-\u{32d}", "\u{32d}-"),
        ("\u{2be}>", ">\u{2be}"),
    ]
    .into_iter()
    .map(|(from, to)| Replacement::new(from, to))
    .collect()
}

/// Allowed characters per role.
pub fn default_role_classes() -> [(Role, &'static str); 3] {
    [
        (Role::Emphasis, LETTER_CLASS),
        (Role::Strong, LETTER_CLASS),
        (Role::Superscript, "[A-Za-z]"),
    ]
}

fn has_text(doc: &Document, id: NodeId) -> bool {
    !doc.text_content(id).trim().is_empty()
}

/// Any `h1`–`h6` element with non-empty text.
pub fn is_heading(doc: &Document, id: NodeId) -> bool {
    matches!(doc.tag(id), Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6")) && has_text(doc, id)
}

/// An `h2` section heading with non-empty text.
pub fn is_section_heading(doc: &Document, id: NodeId) -> bool {
    doc.tag(id) == Some("h2") && doc.has_class(id, SECTION_HEADING) && has_text(doc, id)
}

/// Word-processor form fields (page numbers, dates).
pub fn is_form_field(doc: &Document, id: NodeId) -> bool {
    doc.tag(id) == Some("sdfield")
}

/// Matches no element.
pub fn nothing(_doc: &Document, _id: NodeId) -> bool {
    false
}

/// Single-file text collections: one heading per text, with an informant
/// line below it.
pub fn bar_texts() -> Result<Config> {
    Config::builder("bar text")
        .heading_class(
            SECTION_HEADING,
            &[(&["text_id", "title"], r"^\s*([A-Z]\s*[0-9]+)\s+(.*?)\s*$")],
        )
        .heading_class(
            SUBSECTION_HEADING,
            &[(&["informant", "place"], r"^\s*Informant:\s+(.*)\s+\((.*)\)\s*$")],
        )
        .build()
}

/// Volume 4 of the Christian Urmi texts. The section heading only carries
/// the text id; the title comes from the subsection heading, and some texts
/// come in several versions.
pub fn cu_vol4_texts() -> Result<Config> {
    Config::builder("cu vol 4 texts")
        .heading_class(SECTION_HEADING, &[(&["text_id"], r"^\s*([A-Z]\s*[0-9]+)\s*")])
        .heading_class(
            SUBSECTION_HEADING,
            &[
                (
                    &["title", "informant", "place"],
                    r"^\s*(.*?)\s*\(([^,]*),\s+(.*)\)\s*$",
                ),
                (&["title"], r"^\s*(.*?)\s*$"),
            ],
        )
        .heading_class(
            SUBSUBSECTION_HEADING,
            &[(
                &["version", "informant", "place"],
                r"^\s*(Version\s+[0-9]+):\s+(.*?)\s+\((.*)\)\s?$",
            )],
        )
        .build()
}

/// The built-in table, in resolution order.
pub fn builtin_table() -> Result<ConfigTable> {
    let mut table = ConfigTable::new();
    table.push(r"bar text .*\.html", bar_texts()?)?;
    table.push(r"cu vol 4 texts.html", cu_vol4_texts()?)?;
    Ok(table)
}
