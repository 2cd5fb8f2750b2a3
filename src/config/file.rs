//! JSON configuration files describing additional document types.
//!
//! ```json
//! {
//!   "document_types": [
//!     {
//!       "name": "urmi texts",
//!       "file_pattern": "urmi .*\\.html",
//!       "heading_classes": [
//!         { "name": "gp-sectionheading-western",
//!           "patterns": [ { "fields": ["text_id", "title"],
//!                           "pattern": "^\\s*([A-Z]\\s*[0-9]+)\\s+(.*?)\\s*$" } ] }
//!       ],
//!       "replacements": "default"
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::normalize::Replacement;
use crate::style::{Role, StyleMap};

use super::{
    Config, ConfigTable, ElementPredicate, default_replacements, is_form_field, is_heading,
    is_section_heading, nothing,
};

/// Top level of a configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub document_types: Vec<DocumentTypeSpec>,
}

/// One document type as written in a configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentTypeSpec {
    pub name: String,
    pub file_pattern: String,
    pub heading_classes: Vec<HeadingClassSpec>,
    #[serde(default = "PredicateName::any_heading")]
    pub is_heading: PredicateName,
    #[serde(default = "PredicateName::section_heading")]
    pub text_start: PredicateName,
    #[serde(default = "PredicateName::form_fields")]
    pub element_filter: PredicateName,
    #[serde(default)]
    pub replacements: ReplacementSpec,
    #[serde(default)]
    pub style_map: StyleMap,
    #[serde(default)]
    pub role_chars: Option<BTreeMap<Role, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadingClassSpec {
    pub name: String,
    pub patterns: Vec<PatternSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternSpec {
    pub fields: Vec<String>,
    pub pattern: String,
}

/// Built-in element predicates, chosen by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredicateName {
    AnyHeading,
    SectionHeading,
    FormFields,
    Nothing,
}

impl PredicateName {
    fn any_heading() -> Self {
        PredicateName::AnyHeading
    }

    fn section_heading() -> Self {
        PredicateName::SectionHeading
    }

    fn form_fields() -> Self {
        PredicateName::FormFields
    }

    pub fn predicate(self) -> ElementPredicate {
        match self {
            PredicateName::AnyHeading => is_heading,
            PredicateName::SectionHeading => is_section_heading,
            PredicateName::FormFields => is_form_field,
            PredicateName::Nothing => nothing,
        }
    }
}

/// Either the name of a shared table or explicit `[from, to]` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReplacementSpec {
    Named(String),
    Pairs(Vec<(String, String)>),
}

impl Default for ReplacementSpec {
    fn default() -> Self {
        ReplacementSpec::Named("default".to_string())
    }
}

impl ReplacementSpec {
    fn resolve(&self) -> Result<Vec<Replacement>> {
        match self {
            ReplacementSpec::Named(name) if name == "default" => Ok(default_replacements()),
            ReplacementSpec::Named(name) if name == "none" => Ok(Vec::new()),
            ReplacementSpec::Named(name) => Err(Error::ConfigFile(format!(
                "unknown replacement table {name:?}"
            ))),
            ReplacementSpec::Pairs(pairs) => Ok(pairs
                .iter()
                .map(|(from, to)| Replacement::new(from.as_str(), to.as_str()))
                .collect()),
        }
    }
}

impl DocumentTypeSpec {
    /// Compile into a [`Config`].
    pub fn build(&self) -> Result<Config> {
        let mut builder = Config::builder(&self.name)
            .is_heading(self.is_heading.predicate())
            .text_start(self.text_start.predicate())
            .element_filter(self.element_filter.predicate())
            .replacements(self.replacements.resolve()?)
            .style_map(self.style_map);

        if let Some(role_chars) = &self.role_chars {
            builder = builder.role_chars(
                role_chars
                    .iter()
                    .map(|(role, class)| (*role, class.clone()))
                    .collect(),
            );
        }

        for class in &self.heading_classes {
            let patterns: Vec<(Vec<&str>, &str)> = class
                .patterns
                .iter()
                .map(|p| (p.fields.iter().map(String::as_str).collect(), p.pattern.as_str()))
                .collect();
            let borrowed: Vec<(&[&str], &str)> = patterns
                .iter()
                .map(|(fields, pattern)| (fields.as_slice(), *pattern))
                .collect();
            builder = builder.heading_class(&class.name, &borrowed);
        }

        builder.build()
    }
}

impl ConfigFile {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigFile(e.to_string()))
    }

    /// Compile every document type, in file order.
    pub fn into_table(self) -> Result<ConfigTable> {
        let mut table = ConfigTable::new();
        for spec in &self.document_types {
            table.push(&spec.file_pattern, spec.build()?)?;
        }
        Ok(table)
    }
}

/// Read and compile a configuration file.
pub fn load_table(path: &Path) -> Result<ConfigTable> {
    let json = std::fs::read_to_string(path)?;
    let table = ConfigFile::parse(&json)?.into_table()?;
    log::debug!(
        "loaded {} document type(s) from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URMI: &str = r#"{
        "document_types": [{
            "name": "urmi texts",
            "file_pattern": "urmi .*\\.html",
            "heading_classes": [
                { "name": "gp-sectionheading-western",
                  "patterns": [{ "fields": ["text_id", "title"],
                                 "pattern": "^\\s*([A-Z]\\s*[0-9]+)\\s+(.*?)\\s*$" }] }
            ],
            "element_filter": "nothing",
            "replacements": [["ǝ", "ə"]],
            "style_map": { "italic": "emphasis", "bold": null },
            "role_chars": { "superscript": "[A-Z]" }
        }]
    }"#;

    #[test]
    fn test_load_document_type() {
        let table = ConfigFile::parse(URMI).unwrap().into_table().unwrap();
        let config = table.resolve("urmi 1.html").unwrap();
        assert_eq!(config.name, "urmi texts");
        assert_eq!(config.levels(), 1);
        assert_eq!(config.normalizer.rules().len(), 1);
        assert_eq!(config.style_map.bold, None);
        assert!(!config.role_chars.allows(Role::Superscript, 'a'));
    }

    #[test]
    fn test_defaults_follow_builtin_types() {
        let json = r#"{ "document_types": [{
            "name": "plain", "file_pattern": "x", "heading_classes": [] }] }"#;
        let table = ConfigFile::parse(json).unwrap().into_table().unwrap();
        let config = table.resolve("x.html").unwrap();
        assert_eq!(config.normalizer.rules(), default_replacements().as_slice());
        assert_eq!(config.style_map, StyleMap::default());
    }

    #[test]
    fn test_arity_error_surfaces() {
        let json = r#"{ "document_types": [{
            "name": "bad", "file_pattern": "x",
            "heading_classes": [{ "name": "h", "patterns": [{ "fields": ["a", "b"], "pattern": "(x)" }] }] }] }"#;
        let err = ConfigFile::parse(json).unwrap().into_table().unwrap_err();
        assert!(matches!(err, Error::PatternArity { .. }));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = r#"{ "document_types": [], "extra": 1 }"#;
        assert!(matches!(ConfigFile::parse(json), Err(Error::ConfigFile(_))));
    }

    #[test]
    fn test_unknown_replacement_table() {
        let json = r#"{ "document_types": [{
            "name": "p", "file_pattern": "x", "heading_classes": [], "replacements": "fancy" }] }"#;
        let err = ConfigFile::parse(json).unwrap().into_table().unwrap_err();
        assert!(matches!(err, Error::ConfigFile(msg) if msg.contains("fancy")));
    }

    #[test]
    fn test_load_table_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.json");
        std::fs::write(&path, URMI).unwrap();
        assert_eq!(load_table(&path).unwrap().len(), 1);
    }
}
