//! Dialect output sets and the `.nena` writer.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::engine::{Diagnostic, disambiguate};

/// Extension of written texts.
pub const MARKUP_EXTENSION: &str = "nena";

/// Characters replaced by `_` in file names.
const ILLEGAL_FILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Every text of one dialect, title → markup.
#[derive(Debug, Clone, Default)]
pub struct DialectOutput {
    pub dialect: String,
    texts: BTreeMap<String, String>,
}

impl DialectOutput {
    pub fn new(dialect: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            texts: BTreeMap::new(),
        }
    }

    /// Add one file's texts. A title already taken by an earlier file is
    /// renamed, never overwritten.
    pub fn merge(&mut self, texts: BTreeMap<String, String>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (title, markup) in texts {
            let title = if self.texts.contains_key(&title) {
                let renamed_to = disambiguate(&title, |t| self.texts.contains_key(t));
                let diagnostic = Diagnostic::DuplicateTitle {
                    title,
                    renamed_to: renamed_to.clone(),
                };
                log::warn!("[{}] {diagnostic}", self.dialect);
                diagnostics.push(diagnostic);
                renamed_to
            } else {
                title
            };
            self.texts.insert(title, markup);
        }
        diagnostics
    }

    pub fn texts(&self) -> &BTreeMap<String, String> {
        &self.texts
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Write to `<out_root>/<dialect>/`.
    pub fn write(&self, out_root: &Path) -> io::Result<Vec<PathBuf>> {
        write_texts(&out_root.join(&self.dialect), &self.texts)
    }
}

/// File name for a title, with characters that are illegal on common file
/// systems replaced by `_`.
///
/// ```
/// use nenaconv::export::file_name_for;
///
/// assert_eq!(file_name_for("A 12 The Fox"), "A 12 The Fox.nena");
/// assert_eq!(file_name_for("A 3 Yes/No?"), "A 3 Yes_No_.nena");
/// ```
pub fn file_name_for(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if ILLEGAL_FILE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let stem = stem.trim_end_matches(['.', ' ']);
    let stem = if stem.is_empty() { "_" } else { stem };
    format!("{stem}.{MARKUP_EXTENSION}")
}

/// Create `dir` if needed and write one file per text, overwriting existing
/// files. Returns the written paths in title order.
pub fn write_texts(dir: &Path, texts: &BTreeMap<String, String>) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut used: HashSet<String> = HashSet::new();
    let mut written = Vec::with_capacity(texts.len());
    for (title, markup) in texts {
        let mut name = file_name_for(title);
        if used.contains(&name) {
            // Two titles differing only in illegal characters.
            let stem = name.trim_end_matches(&format!(".{MARKUP_EXTENSION}")).to_string();
            name = file_name_for(&disambiguate(&stem, |t| {
                used.contains(&file_name_for(t))
            }));
        }
        let path = dir.join(&name);
        fs::write(&path, markup)?;
        log::debug!("wrote {}", path.display());
        used.insert(name);
        written.push(path);
    }
    Ok(written)
}
