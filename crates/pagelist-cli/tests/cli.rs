//! End-to-end tests of the pagelist binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const INDEX: &str = r#"{
  "total": 5, "offset": 0, "limit": 5,
  "data": [
    {"path": "/en/blog/intro", "title": "Intro", "tags": "Rust, Web", "releaseDate": "2024-01-15"},
    {"path": "/en/blog/deep-dive", "title": "Deep dive", "tags": "Rust", "releaseDate": "2024-03-02"},
    {"path": "/en/blog/hidden", "title": "Hidden", "tags": "Rust", "robots": "noindex"},
    {"path": "/en/events/old", "title": "Old meetup", "tags": "Rust", "offDateTime": "2001-05-05"},
    {"path": "/en/news/release", "title": "Release", "tags": "Web", "releaseDate": "2024-02-01"}
  ]
}"#;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pagelist"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run pagelist")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "pagelist failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn titles(json: &str) -> Vec<String> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json).unwrap();
    records
        .iter()
        .map(|r| r["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("en-index.json"), INDEX).unwrap();
    dir
}

#[test]
fn query_with_flags() {
    let dir = setup();
    let output = run(
        dir.path(),
        &[
            "query",
            "--index",
            "en-index.json",
            "--folder",
            "/en/blog/",
            "--filter",
            "tags=rust",
            "--sort-by",
            "releaseDate",
            "--order",
            "desc",
        ],
    );
    assert_eq!(titles(&stdout(&output)), ["Deep dive", "Intro"]);
}

#[test]
fn query_from_block_and_language_directory() {
    let dir = setup();
    fs::write(
        dir.path().join("block.json"),
        r#"[
            {"key": "options", "value": "filter=or, sortBy=title, noindex=show"},
            {"key": "TAGS", "value": "web"},
            {"key": "title", "value": "hidden"}
        ]"#,
    )
    .unwrap();

    let output = run(
        dir.path(),
        &[
            "query",
            "--index-dir",
            ".",
            "--page-path",
            "/en/blog",
            "--block",
            "block.json",
        ],
    );
    assert_eq!(titles(&stdout(&output)), ["Hidden", "Intro", "Release"]);
}

#[test]
fn csv_output() {
    let dir = setup();
    let output = run(
        dir.path(),
        &[
            "query",
            "--index",
            "en-index.json",
            "--prefix",
            "path=/en/news/",
            "--output",
            "csv",
        ],
    );
    let csv = stdout(&output);
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("path,releaseDate,tags,title"));
    assert_eq!(lines.next(), Some("/en/news/release,2024-02-01,Web,Release"));
    assert_eq!(lines.next(), None);
}

#[test]
fn or_without_filters_fails() {
    let dir = setup();
    let output = run(dir.path(), &["query", "--index", "en-index.json", "--or"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at least one condition"), "{stderr}");
}

#[test]
fn missing_index_fails() {
    let dir = setup();
    let output = run(dir.path(), &["query", "--index", "nope.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
}

#[test]
fn index_path_command() {
    let dir = setup();
    let output = run(dir.path(), &["index-path", "--page-path", "/de/produkte"]);
    assert_eq!(stdout(&output), "/de-index.json\n");

    let output = run(
        dir.path(),
        &["index-path", "--page-path", "/de/produkte", "--language", "fr"],
    );
    assert_eq!(stdout(&output), "/fr-index.json\n");
}

#[test]
fn site_command_reads_config() {
    let dir = setup();
    fs::write(
        dir.path().join("site.yaml"),
        "supported_languages: [en, ja]\nindex_files:\n  ja: ja-pages.json\n",
    )
    .unwrap();
    let output = run(
        dir.path(),
        &["site", "--page-path", "/ja/about", "--site-config", "site.yaml"],
    );
    let summary: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(summary["language"], "ja");
    assert_eq!(summary["index"], "/ja-pages.json");
    assert_eq!(summary["nav"], "/ja/navigation/header");
    assert!(summary.get("candidates").is_none());
}

#[test]
fn block_config_command() {
    let dir = setup();
    fs::write(
        dir.path().join("hero.json"),
        r#"[
            {"key": "Options", "value": "Layout=Wide, Dark"},
            {"key": "image", "cells": [{"type": "image", "src": "/media/hero.jpg"}]},
            {"key": "links", "cells": [
                {"type": "link", "href": "/en/a", "text": "A"},
                {"type": "link", "href": "/en/b", "text": "B"}
            ]}
        ]"#,
    )
    .unwrap();
    let output = run(dir.path(), &["block-config", "--block", "hero.json"]);
    let config: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(config["Options"]["layout"], "wide");
    assert_eq!(config["Options"]["dark"], true);
    assert_eq!(config["image"], "/media/hero.jpg");
    assert_eq!(config["links"], serde_json::json!(["/en/a", "/en/b"]));
}
