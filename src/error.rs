//! Error types for nenaconv operations.

use thiserror::Error;

use crate::engine::Diagnostic;

/// Errors that abort a configuration build, a file, or a run.
///
/// Recoverable conditions found while structuring a document are not errors;
/// they are reported as [`Diagnostic`]s and only become errors in strict mode.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("pattern {pattern:?} has {groups} capture group(s) but names {fields} field(s)")]
    PatternArity {
        pattern: String,
        groups: usize,
        fields: usize,
    },

    #[error("replacement rule #{0} has an empty search string")]
    EmptyReplacement(usize),

    #[error("replacement rule #{0} reintroduces its own search string")]
    RecursiveReplacement(usize),

    #[error("no document type matches file name {file:?}")]
    ConfigurationNotFound { file: String },

    #[error("heading class {0:?} is declared more than once")]
    DuplicateHeadingClass(String),

    #[error("strict mode: {0}")]
    Strict(Diagnostic),

    #[error("invalid markup at byte {offset}: {reason}")]
    InvalidMarkup { offset: usize, reason: String },

    #[error("configuration file: {0}")]
    ConfigFile(String),
}

pub type Result<T> = std::result::Result<T, Error>;
