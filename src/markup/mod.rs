//! NENA inline markup.
//!
//! Body text is a sequence of paragraphs separated by blank lines. Inside a
//! paragraph, styled runs are wrapped in role delimiters:
//!
//! | Role | Markup |
//! |---|---|
//! | emphasis | `*ka*` |
//! | strong | `**ka**` |
//! | superscript | `<P>` |
//!
//! Literal `\`, `*`, `<` and `>` are backslash-escaped.
//!
//! - [`escape`]: escaping of literal text
//! - [`render`]: runs → markup with merged runs and source-order nesting
//! - [`parse`]: markup → runs, used to lint written texts
//!
//! ```
//! use nenaconv::markup::Paragraph;
//! use nenaconv::style::{Role, RoleSet};
//!
//! let italic = RoleSet::EMPTY.with(Role::Emphasis);
//! let mut p = Paragraph::default();
//! p.push("k", italic);
//! p.push("a", italic);
//! p.push(" ta", RoleSet::EMPTY);
//! assert_eq!(p.render(), "*ka* ta");
//! ```

mod escape;
mod parse;
mod render;

pub use escape::{SPECIAL_CHARS, escape_markup};
pub use parse::{ParsedText, parse, parse_text};
pub use render::render_line;

use crate::style::RoleSet;

/// Text under one role set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub roles: RoleSet,
}

/// A paragraph being accumulated: lines of runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    lines: Vec<Vec<Run>>,
}

impl Paragraph {
    /// Build a paragraph from runs whose text may contain line breaks.
    pub fn from_runs<I: IntoIterator<Item = Run>>(runs: I) -> Self {
        let mut paragraph = Paragraph::default();
        for run in runs {
            for (i, segment) in run.text.split('\n').enumerate() {
                if i > 0 {
                    paragraph.line_break();
                }
                paragraph.push(segment, run.roles);
            }
        }
        paragraph
    }

    /// Append text. Merges into the previous run when the roles are equal.
    pub fn push(&mut self, text: &str, roles: RoleSet) {
        if text.is_empty() {
            return;
        }
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
        let Some(line) = self.lines.last_mut() else {
            return;
        };
        match line.last_mut() {
            Some(last) if last.roles == roles => last.text.push_str(text),
            _ => line.push(Run {
                text: text.to_string(),
                roles,
            }),
        }
    }

    /// Start a new line within the paragraph.
    pub fn line_break(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
        self.lines.push(Vec::new());
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.lines.iter().flatten()
    }

    /// Check whether the paragraph holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.runs().all(|r| r.text.trim().is_empty())
    }

    /// Unstyled text of the paragraph, lines joined by spaces.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|r| r.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render to markup. Lines are trimmed and empty lines dropped.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| render_line(line))
            .filter_map(|line| {
                let trimmed = line.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Role;
    use proptest::prelude::*;

    #[test]
    fn test_push_merges_equal_roles() {
        let italic = RoleSet::EMPTY.with(Role::Emphasis);
        let mut p = Paragraph::default();
        p.push("k", italic);
        p.push("a", italic);
        assert_eq!(p.runs().count(), 1);
        assert_eq!(p.render(), "*ka*");
    }

    #[test]
    fn test_line_breaks() {
        let mut p = Paragraph::default();
        p.push("one ", RoleSet::EMPTY);
        p.line_break();
        p.push(" two", RoleSet::EMPTY);
        p.line_break();
        p.line_break();
        assert_eq!(p.render(), "one\ntwo");
    }

    #[test]
    fn test_blank_paragraph() {
        let mut p = Paragraph::default();
        assert!(p.is_blank());
        p.push("  ", RoleSet::EMPTY.with(Role::Strong));
        assert!(p.is_blank());
        assert_eq!(p.render(), "");
        p.push("x", RoleSet::EMPTY);
        assert!(!p.is_blank());
    }

    fn role_set() -> impl Strategy<Value = RoleSet> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(s, e, sup)| {
            let mut roles = RoleSet::EMPTY;
            if s {
                roles = roles.with(Role::Strong);
            }
            if e {
                roles = roles.with(Role::Emphasis);
            }
            if sup {
                roles = roles.with(Role::Superscript);
            }
            roles
        })
    }

    fn run_text() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just("a"),
                Just("ə́"),
                Just(" "),
                Just("*"),
                Just("<"),
                Just(">"),
                Just("\\"),
                Just("\n"),
            ],
            0..6,
        )
        .prop_map(|v| v.concat())
    }

    proptest! {
        #[test]
        fn prop_render_parse_render_is_stable(
            runs in prop::collection::vec((run_text(), role_set()), 0..8)
        ) {
            let paragraph = Paragraph::from_runs(
                runs.into_iter().map(|(text, roles)| Run { text, roles }),
            );
            let first = paragraph.render();
            let reparsed = Paragraph::from_runs(parse(&first).unwrap());
            prop_assert_eq!(reparsed.render(), first);
        }
    }
}
