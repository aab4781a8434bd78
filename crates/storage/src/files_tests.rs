// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn write_read_remove() {
    let dir = TempDir::new().unwrap();
    let files = JsonFiles::new(dir.path());

    files.write("actions/a-1.json", &json!({ "id": "a-1" })).await.unwrap();
    let value: Option<serde_json::Value> = files.read("actions/a-1.json").await.unwrap();
    assert_eq!(value, Some(json!({ "id": "a-1" })));
    assert!(files.exists("actions/a-1.json").await.unwrap());

    assert!(files.remove("actions/a-1.json").await.unwrap());
    assert!(!files.remove("actions/a-1.json").await.unwrap());
    let gone: Option<serde_json::Value> = files.read("actions/a-1.json").await.unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn list_stems_ignores_temp_and_foreign_files() {
    let dir = TempDir::new().unwrap();
    let files = JsonFiles::new(dir.path());

    files.write("states/v1.json", &json!({})).await.unwrap();
    files.write("states/v2.json", &json!({})).await.unwrap();
    std::fs::write(dir.path().join("states/.v3.json.tmp"), b"{").unwrap();
    std::fs::write(dir.path().join("states/notes.txt"), b"hi").unwrap();

    let mut stems = files.list_stems("states").await.unwrap();
    stems.sort();
    assert_eq!(stems, vec!["v1", "v2"]);
    assert!(files.list_stems("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn write_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let files = JsonFiles::new(dir.path());
    files.write("blueprint/world-rules.json", &json!({ "v": 1 })).await.unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path().join("blueprint"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["world-rules.json"]);
}

#[tokio::test]
async fn unparseable_record_is_json_error() {
    let dir = TempDir::new().unwrap();
    let files = JsonFiles::new(dir.path());
    std::fs::create_dir_all(dir.path().join("actions")).unwrap();
    std::fs::write(dir.path().join("actions/bad.json"), b"{ not json").unwrap();

    let result: Result<Option<serde_json::Value>, _> = files.read("actions/bad.json").await;
    assert!(matches!(result, Err(StoreError::Json(_))));
}
