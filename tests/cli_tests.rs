//! Command-Line Interface Tests
//!
//! Runs the `bible-ref` binary end to end: parsing, finding, rendering and
//! catalog inspection, in all output formats.

use assert_cmd::Command;
use predicates::prelude::*;

fn bible_ref() -> Command {
    Command::cargo_bin("bible-ref").expect("binary is built")
}

/// Parse a German reference with the default scheme
#[test]
fn test_parse_text_output() {
    bible_ref()
        .args(["parse", "Röm 3,22"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book:     Rm"))
        .stdout(predicate::str::contains("Chapter:  3"))
        .stdout(predicate::str::contains("Verse:    22"))
        .stdout(predicate::str::contains("Sort key: 0x370316"));
}

/// JSON output carries the structured fields
#[test]
fn test_parse_json_output() {
    let output = bible_ref()
        .args(["parse", "Gen 1,1", "Ex 3,2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["book"], "Gn");
    assert_eq!(results[0]["input"], "Gen 1,1");
    assert_eq!(results[1]["book"], "Ex");
    assert_eq!(results[1]["chapter"], 3);
    assert_eq!(results[1]["verse"], 2);
    assert_eq!(results[1]["naming_scheme"], "RGG_abbr");
}

/// Several schemes in priority order, rendered into another one
#[test]
fn test_parse_with_schemes_and_render_as() {
    bible_ref()
        .args([
            "parse",
            "Rom 3:22",
            "--scheme",
            "RGG_abbr",
            "--scheme",
            "SBL_abbr",
            "--render-as",
            "Luther84",
            "--format",
            "tsv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("input\trendered\tbook"))
        .stdout(predicate::str::contains("Rom 3:22\tRömer 3,22\tRm\t3\t22\t3,22"));
}

/// Unparseable input fails with a helpful message
#[test]
fn test_parse_failure() {
    bible_ref()
        .args(["parse", "kein Bibelzitat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot parse 'kein Bibelzitat'"));
}

/// Unknown naming schemes are reported by name
#[test]
fn test_unknown_scheme() {
    bible_ref()
        .args(["parse", "Gen 1,1", "--scheme", "Klingon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown naming scheme 'Klingon'"));
}

/// Find references in a file, in text order and in canonical order
#[test]
fn test_find_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("predigt.txt");
    std::fs::write(
        &path,
        "Wie Paulus in Röm 3,22 schreibt,\nvgl. schon Gen 15,6 und Röm 3,22.\n",
    )
    .unwrap();

    let output = bible_ref()
        .args(["find", path.to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let books: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["book"].as_str().unwrap())
        .collect();
    assert_eq!(books, vec!["Rm", "Gn", "Rm"]);
    assert_eq!(json[1]["line"], 2);
    assert_eq!(json[1]["shape"], "verse");

    let output = bible_ref()
        .args([
            "find",
            path.to_str().unwrap(),
            "--sort",
            "--unique",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rendered: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rendered"].as_str().unwrap())
        .collect();
    assert_eq!(rendered, vec!["Gen 15,6", "Röm 3,22"]);
}

/// Find reads stdin when given '-'
#[test]
fn test_find_from_stdin() {
    bible_ref()
        .args(["find", "-", "--format", "tsv"])
        .write_stdin("Siehe Joh 1,14 und 1Kor 13,4-7.")
        .assert()
        .success()
        .stdout(predicate::str::contains("Joh 1,14\tJoh 1,14\tJn"))
        .stdout(predicate::str::contains("1Kor 13,4-7\t1Kor 13,4–7\t1Cor"));
}

/// References chained with "; " are reported separately
#[test]
fn test_find_chained_references() {
    let output = bible_ref()
        .args(["find", "-", "--scheme", "RGG_abbr", "--scheme", "Luther84", "--format", "json"])
        .write_stdin("Vgl. Röm 3,22; 1Kor 13,4 und Gen 1,1; 2. Mose 3,14.")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let texts: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["Röm 3,22", "1Kor 13,4", "Gen 1,1", "2. Mose 3,14"]);
    assert_eq!(json[3]["book"], "Ex");
}

/// Text without references is not an error
#[test]
fn test_find_nothing() {
    bible_ref()
        .arg("find")
        .write_stdin("Ein ganz gewöhnlicher Satz.")
        .assert()
        .success()
        .stdout(predicate::str::contains("No references found"));
}

/// Missing input files are reported
#[test]
fn test_find_missing_file() {
    bible_ref()
        .args(["find", "/nonexistent/predigt.txt"])
        .assert()
        .failure();
}

/// Render translates between schemes, recognizing all schemes by default
#[test]
fn test_render() {
    bible_ref()
        .args(["render", "1Kor 13,4", "--render-as", "SBL"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1 Corinthians 13:4\n"));

    bible_ref()
        .args(["render", "1 Cor 13:4", "--render-as", "Luther84"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1. Korinther 13,4\n"));
}

/// Rendering a book the target scheme does not know fails
#[test]
fn test_render_unknown_in_target() {
    bible_ref()
        .args(["render", "3Makk 1,1", "--render-as", "Luther84"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Luther84"));
}

/// Catalog listing shows canons and schemes
#[test]
fn test_catalog_list() {
    bible_ref()
        .args(["catalog", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KingJames"))
        .stdout(predicate::str::contains("SBL_abbr"));

    bible_ref()
        .args(["catalog", "list", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("canon\tdefault\t75"))
        .stdout(predicate::str::contains("naming_scheme\tLuther84\t73"));
}

/// Scheme names ordered by a canon
#[test]
fn test_catalog_names() {
    let output = bible_ref()
        .args([
            "catalog", "names", "SBL_abbr", "--canon", "KingJames", "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names = json["names"].as_array().unwrap();
    assert_eq!(names[0], "Gen");
    // Matthew follows Malachi in the Protestant order
    assert_eq!(names[38], "Mal");
    assert_eq!(names[39], "Matt");
}

/// Canon contents in order
#[test]
fn test_catalog_canon() {
    bible_ref()
        .args(["catalog", "canon", "BHS", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("position\tbook\n1\tGn\n2\tEx\n"));

    bible_ref()
        .args(["catalog", "canon", "Vulgata"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown canon 'Vulgata'"));
}

/// An exported catalog can be loaded again with --catalog
#[test]
fn test_catalog_export_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    bible_ref()
        .args(["catalog", "export", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 4 canons and 7 naming schemes"));
    assert!(path.exists());

    bible_ref()
        .args(["--catalog", path.to_str().unwrap(), "parse", "Röm 3,22"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book:     Rm"));
}

/// A custom catalog directory replaces the embedded one
#[test]
fn test_custom_catalog_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("manifest.json"),
        r#"{
            "version": "1.0.0",
            "canons": [{"name": "default", "file": "torah.canon"}],
            "naming_schemes": [{
                "name": "RGG_abbr",
                "file": "hebrew.names",
                "ordinal_delimiter": "",
                "verse_delimiter": ","
            }]
        }"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("torah.canon"), "Gn\nEx\nLv\nNm\nDt\n").unwrap();
    std::fs::write(
        dir.path().join("hebrew.names"),
        "# book id; display name\nGn; Bereshit\nEx; Shemot\n",
    )
    .unwrap();

    bible_ref()
        .args([
            "--catalog",
            dir.path().to_str().unwrap(),
            "parse",
            "Shemot 20,2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book:     Ex"));
}

/// Verbose mode reports progress on stderr only
#[test]
fn test_verbose_keeps_stdout_clean() {
    let output = bible_ref()
        .args(["--verbose", "parse", "Gen 1,1", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(serde_json::from_slice::<serde_json::Value>(&output.stdout).is_ok());
    assert!(!output.stderr.is_empty());
}
