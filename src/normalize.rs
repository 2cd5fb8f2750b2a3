//! Character normalization.
//!
//! A [`Normalizer`] applies an ordered table of literal substring
//! replacements. Rules run in table order, each over the output of the one
//! before it, and the whole table is re-run until the text stops changing.
//!
//! A rule that keeps or shrinks the text is re-applied until it stops
//! matching before the next rule runs. A reordering rule such as
//! `"-\u{32d}"` moves its character one position per application, so it
//! settles inside a single table pass however long the run it walks across.
//! The number of table passes then depends on how rules feed each other,
//! not on the length of the text.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Table passes before giving up on reaching a fixed point.
const MAX_TABLE_PASSES: usize = 64;

/// A table whose output outgrows its input by this factor is not settling.
const MAX_GROWTH: usize = 8;

/// One literal replacement rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

impl Replacement {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Apply the rule, then re-apply it while it still matches if it does
    /// not grow the text. Returns `None` when it never matched.
    fn saturate(&self, text: &str) -> Option<String> {
        let from = self.from.as_str();
        if !text.contains(from) {
            return None;
        }
        let mut current = text.replace(from, &self.to);
        if self.to.len() > from.len() {
            return Some(current);
        }
        // A reordering rule needs at most one application per character.
        for _ in 0..current.chars().count() {
            if !current.contains(from) {
                break;
            }
            current = current.replace(from, &self.to);
        }
        Some(current)
    }
}

/// Ordered replacement table.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: Vec<Replacement>,
}

impl Normalizer {
    /// Build a normalizer. Empty search strings are rejected, as are rules
    /// whose replacement contains their own search string.
    pub fn new(rules: Vec<Replacement>) -> Result<Self> {
        for (index, rule) in rules.iter().enumerate() {
            if rule.from.is_empty() {
                return Err(Error::EmptyReplacement(index));
            }
            if rule.to.contains(rule.from.as_str()) {
                return Err(Error::RecursiveReplacement(index));
            }
        }
        Ok(Self { rules })
    }

    /// Build a normalizer from `(from, to)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(from, to)| Replacement::new(from, to))
                .collect(),
        )
    }

    /// The rules in application order.
    pub fn rules(&self) -> &[Replacement] {
        &self.rules
    }

    /// Normalize a string. Borrows when no rule applies.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut current = match self.apply_pass(text) {
            Some(changed) => changed,
            None => return Cow::Borrowed(text),
        };

        let max_len = text.len().saturating_mul(MAX_GROWTH).max(64);
        for _ in 1..MAX_TABLE_PASSES {
            if current.len() > max_len {
                log::warn!(
                    "replacement table keeps growing on {:?}",
                    crate::util::excerpt(text, 40)
                );
                return Cow::Owned(current);
            }
            match self.apply_pass(&current) {
                Some(changed) => current = changed,
                None => return Cow::Owned(current),
            }
        }

        log::warn!(
            "replacement table did not settle after {MAX_TABLE_PASSES} passes on {:?}",
            crate::util::excerpt(text, 40)
        );
        Cow::Owned(current)
    }

    /// One pass over the table. Returns `None` when nothing changed.
    fn apply_pass(&self, text: &str) -> Option<String> {
        let mut out: Option<String> = None;
        for rule in &self.rules {
            let source = out.as_deref().unwrap_or(text);
            if let Some(changed) = rule.saturate(source) {
                out = Some(changed);
            }
        }
        out.filter(|changed| changed != text)
    }
}
