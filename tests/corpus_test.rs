//! Whole-corpus conversion tests over a temporary `<root>/<dialect>/*.html`
//! tree.

use std::fs;
use std::path::Path;

use nenaconv::config::load_table;
use nenaconv::corpus::lint_file;
use nenaconv::{ConfigTable, ConvertOptions, Diagnostic, convert_corpus};

fn write(root: &Path, dialect: &str, file: &str, body: &str) {
    let dir = root.join(dialect);
    fs::create_dir_all(&dir).unwrap();
    let html = format!(
        "<html><head><meta charset=\"utf-8\"></head><body>{body}</body></html>"
    );
    fs::write(dir.join(file), html).unwrap();
}

fn section(text: &str) -> String {
    format!(r#"<h2 class="gp-sectionheading-western">{text}</h2>"#)
}

/// Two dialects, a duplicate title across files and one unconfigured file.
fn sample_corpus(root: &Path) {
    write(
        root,
        "Barwar",
        "bar text a.html",
        &format!(
            "{}<p>ʾ<i>ǝ́θwa</i> xa</p>{}<p>second</p>",
            section("A 1 The Fox"),
            section("A 2 The Crow")
        ),
    );
    write(
        root,
        "Barwar",
        "bar text b.html",
        &format!("{}<p>again</p>", section("A 1 The Fox")),
    );
    write(root, "Barwar", "notes.html", "<p>not a text collection</p>");
    write(
        root,
        "Urmi_C",
        "cu vol 4 texts.html",
        &format!(
            r#"{}<h3 class="gp-subsectionheading-western">The Wolf (Yulia, Urmi)</h3><p>x</p>"#,
            section("B 4")
        ),
    );
}

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn test_convert_and_write_corpus() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    sample_corpus(root.path());

    let table = ConfigTable::builtin().unwrap();
    let report = convert_corpus(root.path(), &table, ConvertOptions::default()).unwrap();

    let dialects: Vec<_> = report.dialects.iter().map(|d| d.dialect.as_str()).collect();
    assert_eq!(dialects, vec!["Barwar", "Urmi_C"]);
    assert_eq!(report.text_count(), 4);
    assert_eq!(report.files.len(), 4);

    let written = report.write(out.path()).unwrap();
    assert_eq!(written, 4);

    let fox = fs::read_to_string(out.path().join("Barwar/A 1 The Fox.nena")).unwrap();
    assert_eq!(
        fox,
        "text_id: A 1\ntitle: The Fox\n\nʾ*ə́θwa* xa\n"
    );
    let renamed = fs::read_to_string(out.path().join("Barwar/A 1 The Fox (2).nena")).unwrap();
    assert!(renamed.ends_with("\n\nagain\n"));
    assert!(out.path().join("Barwar/A 2 The Crow.nena").is_file());
    assert!(out.path().join("Urmi_C/B 4 The Wolf.nena").is_file());
}

#[test]
fn test_cross_file_duplicate_reported_on_later_file() {
    let root = tempfile::tempdir().unwrap();
    sample_corpus(root.path());

    let table = ConfigTable::builtin().unwrap();
    let report = convert_corpus(root.path(), &table, ConvertOptions::default()).unwrap();

    let second = report
        .files
        .iter()
        .find(|f| f.file.ends_with("bar text b.html"))
        .unwrap();
    assert_eq!(
        second.diagnostics,
        vec![Diagnostic::DuplicateTitle {
            title: "A 1 The Fox".into(),
            renamed_to: "A 1 The Fox (2)".into(),
        }]
    );
}

#[test]
fn test_unconfigured_file_recorded_as_failure() {
    let root = tempfile::tempdir().unwrap();
    sample_corpus(root.path());

    let table = ConfigTable::builtin().unwrap();
    let report = convert_corpus(root.path(), &table, ConvertOptions::default()).unwrap();

    let failed: Vec<_> = report.failed_files().collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].file.ends_with("notes.html"));
    assert!(failed[0].config.is_none());
}

#[test]
fn test_strict_corpus_rejects_cross_file_duplicates() {
    let root = tempfile::tempdir().unwrap();
    sample_corpus(root.path());

    let table = ConfigTable::builtin().unwrap();
    let report = convert_corpus(root.path(), &table, ConvertOptions { strict: true }).unwrap();

    let failed: Vec<_> = report
        .failed_files()
        .map(|f| f.file.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(failed, vec!["bar text b.html", "notes.html"]);
    assert_eq!(report.text_count(), 3);
}

#[test]
fn test_missing_corpus_root_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let table = ConfigTable::builtin().unwrap();
    assert!(convert_corpus(&root.path().join("absent"), &table, ConvertOptions::default()).is_err());
}

// ============================================================================
// Configuration files
// ============================================================================

#[test]
fn test_config_file_consulted_before_builtin() {
    let root = tempfile::tempdir().unwrap();
    write(
        root.path(),
        "Urmi_C",
        "urmi stories.html",
        &format!("{}<p>x</p>", section("Story 3: The Bear")),
    );

    let config_path = root.path().join("types.json");
    fs::write(
        &config_path,
        r#"{
          "document_types": [
            {
              "name": "urmi stories",
              "file_pattern": "urmi .*\\.html",
              "heading_classes": [
                { "name": "gp-sectionheading-western",
                  "patterns": [ { "fields": ["text_id", "title"],
                                  "pattern": "Story\\s+([0-9]+):\\s+(.*?)\\s*$" } ] }
              ]
            }
          ]
        }"#,
    )
    .unwrap();

    let table = load_table(&config_path)
        .unwrap()
        .then(ConfigTable::builtin().unwrap());
    let report = convert_corpus(root.path(), &table, ConvertOptions::default()).unwrap();

    assert_eq!(report.failed_files().count(), 0);
    assert_eq!(report.files[0].config.as_deref(), Some("urmi stories"));
    assert!(report.dialects[0].texts().contains_key("3 The Bear"));
}

// ============================================================================
// Lint
// ============================================================================

#[test]
fn test_written_texts_pass_lint() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write(
        root.path(),
        "Barwar",
        "bar text a.html",
        &format!(
            "{}<p><i>ʾə́θwa <b>ʾ</b></i><b>ka</b> <sup>P</sup>xa 2*3 &lt;x&gt;</p>",
            section("A 1 Fox")
        ),
    );

    let table = ConfigTable::builtin().unwrap();
    let report = convert_corpus(root.path(), &table, ConvertOptions::default()).unwrap();
    report.write(out.path()).unwrap();

    let parsed = lint_file(&out.path().join("Barwar/A 1 Fox.nena")).unwrap();
    assert_eq!(parsed.field("text_id"), Some("A 1"));
    assert_eq!(parsed.field("title"), Some("Fox"));
    assert_eq!(parsed.paragraphs.len(), 1);
    let plain: String = parsed.paragraphs[0].iter().map(|r| r.text.as_str()).collect();
    assert_eq!(plain, "ʾə́θwa ʾka Pxa 2*3 <x>");
}
