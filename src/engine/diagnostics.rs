//! Recoverable problems found while structuring a document.

use thiserror::Error;

use crate::style::Role;

/// A non-fatal finding. Diagnostics never stop a run; strict mode turns the
/// first one into [`crate::Error::Strict`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Diagnostic {
    #[error("{class} heading {text:?} matches no pattern")]
    HeadingPatternMiss { class: String, text: String },

    #[error("content before the first text was dropped: {excerpt:?}")]
    OrphanContent { excerpt: String },

    #[error("{role} run {run:?} contains characters outside its class: {characters:?}")]
    StyleCharacterViolation {
        role: Role,
        characters: String,
        run: String,
    },

    #[error("title {title:?} is already taken, written as {renamed_to:?}")]
    DuplicateTitle { title: String, renamed_to: String },
}

impl Diagnostic {
    /// Short machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::HeadingPatternMiss { .. } => "heading_pattern_miss",
            Diagnostic::OrphanContent { .. } => "orphan_content",
            Diagnostic::StyleCharacterViolation { .. } => "style_character_violation",
            Diagnostic::DuplicateTitle { .. } => "duplicate_title",
        }
    }
}

/// Pick the first free `"{title} (n)"`, n = 2, 3, ...
pub fn disambiguate(title: &str, taken: impl Fn(&str) -> bool) -> String {
    (2..)
        .map(|n| format!("{title} ({n})"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| title.to_string())
}
