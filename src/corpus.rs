//! Corpus conversion: `<root>/<dialect>/*.html` → dialect output sets.
//!
//! Files are independent, so they are structured in parallel. Results are
//! merged per dialect in discovery order, which keeps titles and duplicate
//! renaming deterministic whatever the scheduling.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::ConfigTable;
use crate::dom::parse_html;
use crate::engine::{Diagnostic, Extraction, disambiguate, structure, structure_strict};
use crate::error::{Error, Result};
use crate::export::DialectOutput;
use crate::markup::{ParsedText, parse_text};
use crate::util::decode_html;

/// Extension of input documents.
pub const SOURCE_EXTENSION: &str = "html";

/// An input document and the dialect it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub dialect: String,
    pub path: PathBuf,
}

impl SourceFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Options for [`convert_corpus`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Fail a file on its first diagnostic.
    pub strict: bool,
}

/// Outcome for one input file.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileReport {
    pub dialect: String,
    pub file: PathBuf,
    /// Document type the file resolved to.
    pub config: Option<String>,
    pub texts: usize,
    pub diagnostics: Vec<Diagnostic>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl FileReport {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Everything a corpus run produced.
#[derive(Debug, Default)]
pub struct CorpusReport {
    pub dialects: Vec<DialectOutput>,
    pub files: Vec<FileReport>,
}

impl CorpusReport {
    pub fn failed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.failed())
    }

    pub fn diagnostic_count(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    pub fn text_count(&self) -> usize {
        self.dialects.iter().map(DialectOutput::len).sum()
    }

    /// Write every dialect under `out_root`.
    pub fn write(&self, out_root: &Path) -> Result<usize> {
        let mut written = 0;
        for dialect in &self.dialects {
            written += dialect.write(out_root)?.len();
        }
        Ok(written)
    }
}

/// List dialect directories and their HTML files, both sorted by name.
pub fn discover(root: &Path) -> Result<Vec<SourceFile>> {
    let dialects = list_dir(root, |path| path.is_dir())?;

    let mut files = Vec::new();
    for dir in dialects {
        let dialect = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let paths = list_dir(&dir, |path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
        })?;
        log::debug!("dialect {dialect}: {} file(s)", paths.len());
        files.extend(paths.into_iter().map(|path| SourceFile {
            dialect: dialect.clone(),
            path,
        }));
    }
    Ok(files)
}

/// Sorted entries of `dir` accepted by `keep`. An unreadable entry is an
/// error.
fn list_dir(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.retain(|path| keep(path));
    paths.sort();
    Ok(paths)
}

/// Read, decode, parse and structure one file.
///
/// Returns the name of the resolved document type with the extraction. In
/// strict mode the extraction never carries diagnostics.
pub fn process_file(path: &Path, table: &ConfigTable, strict: bool) -> Result<(String, Extraction)> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let config = table.resolve(&file_name)?;

    let bytes = fs::read(path)?;
    let html = decode_html(&bytes);
    let doc = parse_html(&html);

    let extraction = if strict {
        Extraction {
            texts: structure_strict(&doc, config)?,
            diagnostics: Vec::new(),
        }
    } else {
        structure(&doc, config)
    };
    log::info!(
        "{file_name}: {} text(s) as {:?}",
        extraction.texts.len(),
        config.name
    );
    Ok((config.name.clone(), extraction))
}

/// Convert a whole corpus. Per-file failures are recorded in the report and
/// do not stop the run.
pub fn convert_corpus(
    root: &Path,
    table: &ConfigTable,
    options: ConvertOptions,
) -> Result<CorpusReport> {
    let files = discover(root)?;
    log::info!("converting {} file(s) under {}", files.len(), root.display());

    let results: Vec<(SourceFile, Result<(String, Extraction)>)> = files
        .into_par_iter()
        .map(|file| {
            let result = process_file(&file.path, table, options.strict);
            (file, result)
        })
        .collect();

    let mut report = CorpusReport::default();
    for (file, result) in results {
        if report.dialects.last().is_none_or(|d| d.dialect != file.dialect) {
            report.dialects.push(DialectOutput::new(file.dialect.clone()));
        }
        let Some(output) = report.dialects.last_mut() else {
            continue;
        };

        let mut file_report = FileReport {
            dialect: file.dialect.clone(),
            file: file.path.clone(),
            config: None,
            texts: 0,
            diagnostics: Vec::new(),
            error: None,
        };

        let merged = result.and_then(|(config, extraction)| {
            file_report.config = Some(config);
            if options.strict {
                reject_duplicates(output, &extraction)?;
            }
            Ok(extraction)
        });

        match merged {
            Ok(extraction) => {
                file_report.texts = extraction.texts.len();
                file_report.diagnostics = extraction.diagnostics;
                file_report.diagnostics.extend(output.merge(extraction.texts));
            }
            Err(err) => {
                log::error!("{}: {err}", file.path.display());
                file_report.error = Some(err.to_string());
            }
        }
        report.files.push(file_report);
    }

    log::info!(
        "{} text(s) in {} dialect(s), {} diagnostic(s), {} failed file(s)",
        report.text_count(),
        report.dialects.len(),
        report.diagnostic_count(),
        report.failed_files().count()
    );
    Ok(report)
}

fn reject_duplicates(output: &DialectOutput, extraction: &Extraction) -> Result<()> {
    let taken = |t: &str| output.texts().contains_key(t);
    match extraction.texts.keys().find(|title| taken(title.as_str())) {
        Some(title) => Err(Error::Strict(Diagnostic::DuplicateTitle {
            title: title.clone(),
            renamed_to: disambiguate(title, taken),
        })),
        None => Ok(()),
    }
}

/// Parse a written `.nena` file, reporting unbalanced markup.
pub fn lint_file(path: &Path) -> Result<ParsedText> {
    let source = fs::read_to_string(path)?;
    parse_text(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_sorted_and_filtered() {
        let root = tempfile::tempdir().unwrap();
        for (dir, file) in [
            ("Urmi_C", "cu vol 4 texts.html"),
            ("Barwar", "bar text b.html"),
            ("Barwar", "bar text a.html"),
            ("Barwar", "notes.txt"),
        ] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
            fs::write(root.path().join(dir).join(file), "").unwrap();
        }
        fs::write(root.path().join("stray.html"), "").unwrap();

        let files = discover(root.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| (f.dialect.as_str(), f.file_name()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Barwar", "bar text a.html".to_string()),
                ("Barwar", "bar text b.html".to_string()),
                ("Urmi_C", "cu vol 4 texts.html".to_string()),
            ]
        );
    }

    #[test]
    fn test_discover_reports_listing_errors() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("corpus.html");
        fs::write(&file, "").unwrap();
        assert!(matches!(discover(&file), Err(Error::Io(_))));
        assert!(matches!(
            discover(&root.path().join("absent")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_process_file_without_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.html");
        fs::write(&path, "<p>x</p>").unwrap();
        let err = process_file(&path, &ConfigTable::builtin().unwrap(), false).unwrap_err();
        assert!(matches!(err, Error::ConfigurationNotFound { .. }));
    }

    #[test]
    fn test_process_file_decodes_legacy_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bar text x.html");
        let mut html = br#"<h2 class="gp-sectionheading-western">A 1 Caf"#.to_vec();
        html.extend_from_slice(b"\xe9</h2><p>x</p>");
        fs::write(&path, html).unwrap();

        let (config, extraction) =
            process_file(&path, &ConfigTable::builtin().unwrap(), false).unwrap();
        assert_eq!(config, "bar text");
        assert!(extraction.texts.contains_key("A 1 Café"));
    }

    #[test]
    fn test_lint_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.nena");
        let bad = dir.path().join("bad.nena");
        fs::write(&good, "title: Fox\n\n*ka* ta\n").unwrap();
        fs::write(&bad, "title: Fox\n\n*ka ta\n").unwrap();

        assert_eq!(lint_file(&good).unwrap().field("title"), Some("Fox"));
        assert!(matches!(lint_file(&bad), Err(Error::InvalidMarkup { .. })));
    }
}
