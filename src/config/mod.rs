//! Per-document-type configuration.
//!
//! A [`Config`] is an immutable record built once and shared read-only by
//! every file of its document type. All regexes are compiled and their
//! capture groups checked against the declared fields when the record is
//! built, so a broken pattern fails before any file is read.
//!
//! A [`ConfigTable`] picks the configuration for a file by matching its
//! name against an ordered list of patterns; the first match wins.

mod builtin;
#[cfg(feature = "serde")]
mod file;

pub use builtin::{
    SECTION_HEADING, SUBSECTION_HEADING, SUBSUBSECTION_HEADING, bar_texts, builtin_table,
    cu_vol4_texts, default_replacements, default_role_classes, is_form_field, is_heading,
    is_section_heading, nothing,
};
#[cfg(feature = "serde")]
pub use file::{ConfigFile, DocumentTypeSpec, load_table};

use std::fmt;

use regex::Regex;

use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::normalize::{Normalizer, Replacement};
use crate::style::{Role, RoleCharClasses, StyleMap};

/// Predicate over an element of a parsed document.
pub type ElementPredicate = fn(&Document, NodeId) -> bool;

/// Compile a pattern that must match at the start of the text.
fn compile_prefix(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{pattern})"))?)
}

/// A heading pattern and the metadata fields its capture groups fill.
#[derive(Debug, Clone)]
pub struct PatternRule {
    fields: Vec<String>,
    regex: Regex,
    source: String,
}

impl PatternRule {
    /// Compile a rule. The pattern must have exactly one capture group per
    /// field.
    pub fn new<S: AsRef<str>>(fields: &[S], pattern: &str) -> Result<Self> {
        let regex = compile_prefix(pattern)?;
        let groups = regex.captures_len() - 1;
        if groups != fields.len() {
            return Err(Error::PatternArity {
                pattern: pattern.to_string(),
                groups,
                fields: fields.len(),
            });
        }
        Ok(Self {
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            regex,
            source: pattern.to_string(),
        })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The pattern as written.
    pub fn pattern(&self) -> &str {
        &self.source
    }
}

/// One level of the heading hierarchy and its ordered patterns.
#[derive(Debug, Clone)]
pub struct HeadingClass {
    pub name: String,
    /// 0 for sections, 1 for subsections, and so on.
    pub level: usize,
    pub patterns: Vec<PatternRule>,
}

/// Everything the structuring engine needs to know about a document type.
#[derive(Clone)]
pub struct Config {
    pub name: String,
    /// Heading classes, shallowest first.
    pub heading_classes: Vec<HeadingClass>,
    pub is_heading: ElementPredicate,
    pub text_start: ElementPredicate,
    pub element_filter: ElementPredicate,
    pub normalizer: Normalizer,
    pub style_map: StyleMap,
    pub role_chars: RoleCharClasses,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("name", &self.name)
            .field("heading_classes", &self.heading_classes)
            .field("style_map", &self.style_map)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn builder(name: &str) -> ConfigBuilder {
        ConfigBuilder::new(name)
    }

    /// Look up a heading class by name.
    pub fn class(&self, name: &str) -> Option<&HeadingClass> {
        self.heading_classes.iter().find(|c| c.name == name)
    }

    /// The shallowest configured heading class an element carries.
    pub fn class_of(&self, doc: &Document, id: NodeId) -> Option<&HeadingClass> {
        self.heading_classes
            .iter()
            .find(|c| doc.has_class(id, &c.name))
    }

    /// Depth of the heading hierarchy.
    pub fn levels(&self) -> usize {
        self.heading_classes.len()
    }
}

/// Builder for [`Config`]. Defaults to the shared tables of the built-in
/// document types.
pub struct ConfigBuilder {
    name: String,
    classes: Vec<(String, Vec<(Vec<String>, String)>)>,
    is_heading: ElementPredicate,
    text_start: ElementPredicate,
    element_filter: ElementPredicate,
    replacements: Vec<Replacement>,
    style_map: StyleMap,
    role_chars: Vec<(Role, String)>,
}

impl ConfigBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            classes: Vec::new(),
            is_heading,
            text_start: is_section_heading,
            element_filter: is_form_field,
            replacements: default_replacements(),
            style_map: StyleMap::default(),
            role_chars: default_role_classes()
                .into_iter()
                .map(|(role, class)| (role, class.to_string()))
                .collect(),
        }
    }

    /// Add the next heading level with its `(fields, pattern)` rules, most
    /// specific first.
    pub fn heading_class(mut self, name: &str, patterns: &[(&[&str], &str)]) -> Self {
        self.classes.push((
            name.to_string(),
            patterns
                .iter()
                .map(|(fields, pattern)| {
                    (
                        fields.iter().map(|f| f.to_string()).collect(),
                        pattern.to_string(),
                    )
                })
                .collect(),
        ));
        self
    }

    pub fn is_heading(mut self, predicate: ElementPredicate) -> Self {
        self.is_heading = predicate;
        self
    }

    pub fn text_start(mut self, predicate: ElementPredicate) -> Self {
        self.text_start = predicate;
        self
    }

    pub fn element_filter(mut self, predicate: ElementPredicate) -> Self {
        self.element_filter = predicate;
        self
    }

    pub fn replacements(mut self, replacements: Vec<Replacement>) -> Self {
        self.replacements = replacements;
        self
    }

    pub fn style_map(mut self, style_map: StyleMap) -> Self {
        self.style_map = style_map;
        self
    }

    pub fn role_chars(mut self, role_chars: Vec<(Role, String)>) -> Self {
        self.role_chars = role_chars;
        self
    }

    /// Compile and validate.
    pub fn build(self) -> Result<Config> {
        let mut heading_classes: Vec<HeadingClass> = Vec::with_capacity(self.classes.len());
        for (level, (name, patterns)) in self.classes.into_iter().enumerate() {
            if heading_classes.iter().any(|c| c.name == name) {
                return Err(Error::DuplicateHeadingClass(name));
            }
            let patterns = patterns
                .iter()
                .map(|(fields, pattern)| PatternRule::new(fields, pattern))
                .collect::<Result<Vec<_>>>()?;
            heading_classes.push(HeadingClass {
                name,
                level,
                patterns,
            });
        }

        let role_chars = RoleCharClasses::new(
            self.role_chars
                .iter()
                .map(|(role, class)| (*role, class.as_str())),
        )?;

        Ok(Config {
            name: self.name,
            heading_classes,
            is_heading: self.is_heading,
            text_start: self.text_start,
            element_filter: self.element_filter,
            normalizer: Normalizer::new(self.replacements)?,
            style_map: self.style_map,
            role_chars,
        })
    }
}

/// Ordered file-name patterns and their document types.
#[derive(Debug, Default)]
pub struct ConfigTable {
    entries: Vec<(Regex, Config)>,
}

impl ConfigTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in document types.
    pub fn builtin() -> Result<Self> {
        builtin_table()
    }

    /// Append a document type. `pattern` must match at the start of the
    /// file name.
    pub fn push(&mut self, pattern: &str, config: Config) -> Result<()> {
        self.entries.push((compile_prefix(pattern)?, config));
        Ok(())
    }

    /// Consult `fallback` after this table's own entries.
    pub fn then(mut self, fallback: ConfigTable) -> Self {
        self.entries.extend(fallback.entries);
        self
    }

    /// Pick the configuration for a file name.
    pub fn resolve(&self, file_name: &str) -> Result<&Config> {
        self.entries
            .iter()
            .find(|(pattern, _)| pattern.is_match(file_name))
            .map(|(_, config)| config)
            .ok_or_else(|| Error::ConfigurationNotFound {
                file: file_name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn configs(&self) -> impl Iterator<Item = &Config> {
        self.entries.iter().map(|(_, config)| config)
    }
}
