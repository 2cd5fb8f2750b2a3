//! # nenaconv
//!
//! Converts word-processor HTML exports of North-Eastern Neo-Aramaic (NENA)
//! text collections into NENA markup: one `.nena` file per text, grouped by
//! dialect.
//!
//! ## Pipeline
//!
//! - [`dom`]: HTML bytes → arena DOM (html5ever)
//! - [`config`]: file name → document type ([`Config`])
//! - [`engine`]: DOM + config → title → markup, with [`Diagnostic`]s
//! - [`export`]: dialect output sets → `<out>/<dialect>/<title>.nena`
//! - [`corpus`]: all of the above over `<root>/<dialect>/*.html`, in parallel
//!
//! Text passes through the [`normalize`] table and the [`style`] resolver on
//! its way into [`markup`].
//!
//! ## Quick Start
//!
//! ```
//! use nenaconv::{ConfigTable, parse_html, structure};
//!
//! let table = ConfigTable::builtin().unwrap();
//! let config = table.resolve("bar text Barwar.html").unwrap();
//! let doc = parse_html(concat!(
//!     r#"<h2 class="gp-sectionheading-western">A 12 The Fox and the Crow</h2>"#,
//!     "<p>ʾ<i>ǝ́θwa</i> ...</p>",
//! ));
//!
//! let extraction = structure(&doc, config);
//! let markup = &extraction.texts["A 12 The Fox and the Crow"];
//! assert!(markup.ends_with("ʾ*ə́θwa* ...\n"));
//! ```

pub mod config;
pub mod corpus;
pub mod dom;
pub mod engine;
pub mod error;
pub mod export;
pub mod markup;
pub mod normalize;
pub mod style;
pub(crate) mod util;

pub use config::{Config, ConfigTable};
pub use corpus::{ConvertOptions, CorpusReport, convert_corpus};
pub use dom::{Document, parse_html};
pub use engine::{Diagnostic, Extraction, structure, structure_strict};
pub use error::{Error, Result};
pub use export::DialectOutput;
pub use normalize::Normalizer;
