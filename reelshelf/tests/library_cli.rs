use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

#[test]
fn library_replay_reports_final_window() {
    let dir = TempDir::new().unwrap();
    let library = dir.path().join("library.json");
    let entries: Vec<_> = (0..100)
        .map(|id| serde_json::json!({ "id": id, "title": format!("Entry {id}") }))
        .collect();
    std::fs::write(&library, serde_json::to_vec(&entries).unwrap()).unwrap();

    let mut cmd = cargo_bin_cmd!("reelshelf");
    let output = cmd
        .current_dir(dir.path())
        .env("REELSHELF_CONFIG_JSON", r#"{"window": {"page_size": 20, "max_pages": 3}}"#)
        .arg("library")
        .arg(&library)
        .arg("--scroll")
        .arg("45")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);

    assert!(text.contains("resident pages: [2, 3, 4]"), "{text}");
    assert!(text.contains("merged items: 60"), "{text}");
    assert!(text.contains("first: Entry 20"), "{text}");
    assert!(text.contains("last: Entry 79"), "{text}");
}
