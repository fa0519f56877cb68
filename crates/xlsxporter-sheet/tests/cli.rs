use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ITEMS: &str = "\
id,name,hp
int,string,\"int,100\"
Item,,server
,,
1,sword,
2,shield,250
";

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn lint() -> Command {
    Command::cargo_bin("xlsx-lint").unwrap()
}

#[test]
fn summarizes_a_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "item.csv", ITEMS);
    write(dir.path(), "notes.txt", "not a table");
    lint()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Item (item[Sheet1]): 2 records, 0 skipped"))
        .stdout(predicate::str::contains("notes").not());
}

#[test]
fn failing_sheet_sets_exit_code() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "dup.csv", "id\nint\nDup\nreserved\n1\n1\n");
    lint()
        .arg(dir.path().join("dup.csv"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("record id 1 already used on row 5"));
}

#[test]
fn tag_flag_prunes_tree_output() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "item.csv", ITEMS);
    lint()
        .args(["--tag", "client", "--format", "tree"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Item.name : string"))
        .stdout(predicate::str::contains("Item.hp").not());
}

#[test]
fn config_file_supplies_sources_and_format() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "item.csv", ITEMS);
    let config = dir.path().join("lint.yaml");
    fs::write(
        &config,
        format!(
            "sources:\n  - {}\ndump: json\n",
            dir.path().join("item.csv").display()
        ),
    )
    .unwrap();
    let output = lint().arg("--config").arg(&config).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sheet = &json[0]["sheets"][0]["outcome"];
    assert_eq!(json[0]["file"], "item.csv");
    assert_eq!(sheet["status"], "parsed");
    assert_eq!(sheet["class_name"], "Item");
    assert_eq!(sheet["records"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_inputs_is_an_error() {
    lint()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no input paths"));
}
