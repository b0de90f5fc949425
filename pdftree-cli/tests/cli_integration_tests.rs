//! Integration tests for the pdftree CLI
//!
//! Runs the built binary against PDFs written to a temporary directory and
//! checks the JSON printed on stdout and the exit status.

use anyhow::Result;
use lopdf::{dictionary, Document, Object, ObjectId};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Test helper to get the CLI binary path
fn get_cli_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove "deps" directory
    }
    path.push("pdftree");
    #[cfg(windows)]
    path.set_extension("exe");
    path
}

/// Test helper to run CLI command and return output
fn run_cli_command(args: &[&str]) -> Result<std::process::Output> {
    let output = Command::new(get_cli_path()).args(args).output()?;
    Ok(output)
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Writes a catalog, a pages node and one page; returns the page id
fn write_pdf(dir: &Path) -> (PathBuf, ObjectId) {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join("input.pdf");
    doc.save(&path).expect("failed to save test PDF");
    (path, page_id)
}

fn setup() -> (TempDir, PathBuf, ObjectId) {
    let dir = tempdir().expect("Failed to create temp directory");
    let (path, page) = write_pdf(dir.path());
    (dir, path, page)
}

#[test]
fn test_cli_tree_lazy() {
    let (_dir, path, _) = setup();
    let output = run_cli_command(&["tree", path.to_str().unwrap()]).unwrap();

    assert!(output.status.success(), "Command should succeed");
    let value = stdout_json(&output);
    assert_eq!(value["result"]["type"], "dict");
    assert_eq!(
        value["result"]["value"]["/Type"],
        json!({"type": "name", "value": "/Catalog"})
    );
    assert!(value.get("indirect_objects").is_none());
}

#[test]
fn test_cli_tree_full_with_path() {
    let (_dir, path, _) = setup();
    let output = run_cli_command(&[
        "--compact",
        "tree",
        path.to_str().unwrap(),
        "--mode",
        "full",
        "--path",
        "Pages.Kids.0.MediaBox.2",
    ])
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim().lines().count(), 1, "compact output is one line");

    let value = stdout_json(&output);
    assert_eq!(value["result"], json!({"type": "number", "value": 612}));
    assert!(value["indirect_objects"].as_object().unwrap().len() >= 2);
}

#[test]
fn test_cli_resolve() {
    let (_dir, path, page) = setup();
    let id = format!("{}-{}", page.0, page.1);
    let output = run_cli_command(&["resolve", path.to_str().unwrap(), &id, "--depth", "deep"])
        .unwrap();

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["object_id"], json!(id));
    assert_eq!(
        value["content"]["value"]["/Type"],
        json!({"type": "name", "value": "/Page"})
    );
    assert!(value["indirect_objects"].is_object());
}

#[test]
fn test_cli_invalid_object_id() {
    let (_dir, path, _) = setup();
    let output = run_cli_command(&["resolve", path.to_str().unwrap(), "1 0"]).unwrap();

    assert!(!output.status.success(), "Command should fail");
    assert_eq!(
        stdout_json(&output),
        json!({
            "error": "Invalid object ID format: 1 0. Expected format: '1-0'",
            "details": null
        })
    );
}

#[test]
fn test_cli_bad_path() {
    let (_dir, path, _) = setup();
    let output =
        run_cli_command(&["tree", path.to_str().unwrap(), "--path", "Pages.Kids.3"]).unwrap();

    assert!(!output.status.success());
    let value = stdout_json(&output);
    assert_eq!(
        value["error"],
        "Failed to navigate path 'Pages.Kids.3' at step '3'"
    );
    assert_eq!(
        value["details"],
        "Error at 'Pages.Kids.3': Array index 3 out of range. Array length: 1"
    );
}

#[test]
fn test_cli_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.pdf");
    let output = run_cli_command(&["tree", missing.to_str().unwrap()]).unwrap();

    assert!(!output.status.success());
    assert_eq!(
        stdout_json(&output)["error"],
        json!(format!("PDF file not found: {}", missing.display()))
    );
}

#[test]
fn test_cli_help() {
    let output = run_cli_command(&["--help"]).unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tree"));
    assert!(stdout.contains("resolve"));
}
