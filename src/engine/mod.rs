//! The document structuring engine.
//!
//! One depth-first walk over the parsed document, driven by a two-state
//! machine:
//!
//! - **Seeking**: no text has started yet. Body content found here cannot be
//!   attributed to a title; it is dropped with an
//!   [`OrphanContent`](Diagnostic::OrphanContent) diagnostic.
//! - **In text**: body paragraphs accumulate for the current text.
//!
//! Every classified heading records its metadata frame at its level, which
//! clears all deeper levels. A `text_start` heading additionally closes the
//! current text and opens a new one. The metadata in scope when a text's
//! first body paragraph arrives becomes its header and its title. A heading
//! met after that point is written into the body as a block of
//! `field: value` lines, so a frame is never replaced before it is written.
//!
//! ```
//! use nenaconv::config::bar_texts;
//! use nenaconv::dom::parse_html;
//! use nenaconv::engine::structure;
//!
//! let config = bar_texts().unwrap();
//! let doc = parse_html(concat!(
//!     r#"<h2 class="gp-sectionheading-western">A 12 The Fox and the Crow</h2>"#,
//!     "<p><i>k</i><i>a</i> ta</p>",
//! ));
//! let extraction = structure(&doc, &config);
//! assert_eq!(
//!     extraction.texts["A 12 The Fox and the Crow"],
//!     "text_id: A 12\ntitle: The Fox and the Crow\n\n*ka* ta\n"
//! );
//! ```

mod classify;
mod diagnostics;
mod headings;
mod metadata;

pub use classify::{ElementKind, apply_style, classify, heading_text};
pub use diagnostics::{Diagnostic, disambiguate};
pub use headings::match_heading;
pub use metadata::{Frame, MetadataStack};

use std::collections::BTreeMap;

use crate::config::{Config, HeadingClass};
use crate::dom::{Document, NodeData, NodeId};
use crate::error::{Error, Result};
use crate::markup::{Paragraph, escape_markup};
use crate::style::StyleContext;
use crate::util::{collapse_whitespace, excerpt};

/// Maximum length of content quoted in diagnostics.
const EXCERPT_CHARS: usize = 60;

/// Result of structuring one document.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Title → markup.
    pub texts: BTreeMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Structure a parsed document into titled texts.
pub fn structure(doc: &Document, config: &Config) -> Extraction {
    let mut structurer = Structurer::new(doc, config);
    structurer.walk(doc.root(), StyleContext::default());
    structurer.finish()
}

/// Like [`structure`], but the first diagnostic is an error.
pub fn structure_strict(doc: &Document, config: &Config) -> Result<BTreeMap<String, String>> {
    let extraction = structure(doc, config);
    match extraction.diagnostics.into_iter().next() {
        Some(first) => Err(Error::Strict(first)),
        None => Ok(extraction.texts),
    }
}

#[derive(Debug)]
enum State {
    Seeking,
    InText(TextBuffer),
}

#[derive(Debug, Default)]
struct TextBuffer {
    /// Metadata in scope when the body began; `None` while the body is empty.
    header: Option<Frame>,
    paragraphs: Vec<String>,
}

struct Structurer<'a> {
    doc: &'a Document,
    config: &'a Config,
    state: State,
    metadata: MetadataStack,
    paragraph: Paragraph,
    pending_space: bool,
    untitled: usize,
    extraction: Extraction,
}

impl<'a> Structurer<'a> {
    fn new(doc: &'a Document, config: &'a Config) -> Self {
        Self {
            doc,
            config,
            state: State::Seeking,
            metadata: MetadataStack::new(config.levels()),
            paragraph: Paragraph::default(),
            pending_space: true,
            untitled: 0,
            extraction: Extraction::default(),
        }
    }

    fn walk(&mut self, id: NodeId, style: StyleContext) {
        let doc = self.doc;
        for child in doc.children(id) {
            match doc.get(child).map(|n| &n.data) {
                Some(NodeData::Text(text)) => self.push_text(text, style),
                Some(NodeData::Element { .. }) => {
                    match classify(doc, child, self.config, style) {
                        ElementKind::Skipped => {
                            log::trace!("skipping <{}>", doc.tag(child).unwrap_or_default());
                        }
                        ElementKind::Heading {
                            class,
                            text_start,
                            text,
                        } => self.heading(class, text_start, &text),
                        ElementKind::LineBreak => {
                            self.paragraph.line_break();
                            self.pending_space = true;
                        }
                        ElementKind::Block(inner) => {
                            self.flush_paragraph();
                            self.walk(child, inner);
                            self.flush_paragraph();
                        }
                        ElementKind::Inline(inner) => self.walk(child, inner),
                    }
                }
                _ => {}
            }
        }
    }

    fn push_text(&mut self, raw: &str, style: StyleContext) {
        let collapsed = collapse_whitespace(raw, &mut self.pending_space);
        if collapsed.is_empty() {
            return;
        }
        let text = self.config.normalizer.normalize(&collapsed);
        let roles = self.config.style_map.resolve(style);

        if matches!(self.state, State::InText(_)) {
            for role in roles.iter() {
                let characters = self.config.role_chars.violations(role, &text);
                if !characters.is_empty() {
                    self.report(Diagnostic::StyleCharacterViolation {
                        role,
                        characters,
                        run: excerpt(&text, EXCERPT_CHARS),
                    });
                }
            }
        }

        self.paragraph.push(&text, roles);
    }

    fn flush_paragraph(&mut self) {
        let paragraph = std::mem::take(&mut self.paragraph);
        self.pending_space = true;
        if paragraph.is_blank() {
            return;
        }
        if let State::InText(buffer) = &mut self.state {
            let rendered = paragraph.render();
            if !rendered.is_empty() {
                if buffer.header.is_none() {
                    buffer.header = Some(self.metadata.active());
                }
                buffer.paragraphs.push(rendered);
            }
            return;
        }
        let excerpt = excerpt(&paragraph.plain_text(), EXCERPT_CHARS);
        self.report(Diagnostic::OrphanContent { excerpt });
    }

    fn heading(&mut self, class: &HeadingClass, text_start: bool, text: &str) {
        self.flush_paragraph();

        let frame = match match_heading(class, text) {
            Some(frame) => frame,
            None => {
                self.report(Diagnostic::HeadingPatternMiss {
                    class: class.name.clone(),
                    text: text.to_string(),
                });
                Frame::default()
            }
        };
        log::debug!("{} heading {text:?}: {frame:?}", class.name);

        if text_start {
            self.finish_text();
            self.metadata.set(class.level, frame);
            self.state = State::InText(TextBuffer::default());
            return;
        }
        if let State::InText(buffer) = &mut self.state
            && buffer.header.is_some()
            && !frame.is_empty()
        {
            buffer.paragraphs.push(field_block(&frame));
        }
        self.metadata.set(class.level, frame);
    }

    /// Close the current text, if any, and store it under its title.
    fn finish_text(&mut self) {
        let State::InText(buffer) = std::mem::replace(&mut self.state, State::Seeking) else {
            return;
        };

        let header = buffer.header.unwrap_or_else(|| self.metadata.active());
        let title = header.title().unwrap_or_else(|| {
            self.untitled += 1;
            format!("untitled {}", self.untitled)
        });
        let title = if self.extraction.texts.contains_key(&title) {
            let renamed_to = disambiguate(&title, |t| self.extraction.texts.contains_key(t));
            self.report(Diagnostic::DuplicateTitle {
                title,
                renamed_to: renamed_to.clone(),
            });
            renamed_to
        } else {
            title
        };

        let markup = self.compose(&header, &buffer.paragraphs);
        log::debug!("text {title:?}: {} paragraph(s)", buffer.paragraphs.len());
        self.extraction.texts.insert(title, markup);
    }

    /// Header lines, a blank line, then the body.
    fn compose(&self, header: &Frame, paragraphs: &[String]) -> String {
        let mut markup = String::new();
        for (key, value) in header.iter() {
            markup.push_str(key);
            markup.push_str(": ");
            markup.push_str(value);
            markup.push('\n');
        }

        let body = paragraphs.join("\n\n");
        let body = self.config.normalizer.normalize(&body);
        if !body.is_empty() {
            if !markup.is_empty() {
                markup.push('\n');
            }
            markup.push_str(&body);
            markup.push('\n');
        }
        markup
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("[{}] {diagnostic}", self.config.name);
        self.extraction.diagnostics.push(diagnostic);
    }

    fn finish(mut self) -> Extraction {
        self.flush_paragraph();
        self.finish_text();
        self.extraction
    }
}

/// A frame as body markup: one escaped `field: value` line per field.
fn field_block(frame: &Frame) -> String {
    frame
        .iter()
        .map(|(key, value)| format!("{key}: {}", escape_markup(value)))
        .collect::<Vec<_>>()
        .join("\n")
}
