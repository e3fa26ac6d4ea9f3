use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn unitstore(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("unitstore"));
    cmd.env_remove("NVC_LIBPATH")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root)
        .arg("--data-dir")
        .arg(root.join("share"));
    cmd
}

#[test]
fn new_creates_marked_directory() {
    let temp = tempdir().unwrap();

    let assert = unitstore(temp.path()).arg("new").arg("Work").assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "library");
    assert_eq!(items[0]["name"], "WORK");
    assert!(temp.path().join("work").join("_NVC_LIB").is_file());
}

#[test]
fn new_over_existing_path_fails() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("work"), "taken").unwrap();

    unitstore(temp.path())
        .arg("new")
        .arg("work")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn put_then_units_lists_in_name_order() {
    let temp = tempdir().unwrap();
    unitstore(temp.path()).arg("new").arg("work").assert().success();

    let source = temp.path().join("top.vhd");
    fs::write(&source, "entity top is end entity;\n").unwrap();

    unitstore(temp.path())
        .args(["put", "work", "WORK.TOP", "--kind", "entity", "--depends", "WORK.PKG"])
        .arg("--source")
        .arg(&source)
        .assert()
        .success();
    unitstore(temp.path())
        .args(["put", "WORK", "WORK.PKG", "--kind", "package"])
        .assert()
        .success();

    let assert = unitstore(temp.path()).args(["units", "work"]).assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let names: Vec<_> = items
        .iter()
        .map(|v| v["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["WORK.PKG", "WORK.TOP"]);
    assert_eq!(items[1]["data"]["depends"][0], "WORK.PKG");
    assert_eq!(items[1]["data"]["source"], "entity top is end entity;\n");
    assert_eq!(items[1]["meta"]["dirty"], false);
}

#[test]
fn show_missing_unit_fails() {
    let temp = tempdir().unwrap();
    unitstore(temp.path()).arg("new").arg("work").assert().success();

    unitstore(temp.path())
        .args(["show", "work", "WORK.NONE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WORK.NONE"));
}

#[test]
fn find_verbose_lists_searched_directories() {
    let temp = tempdir().unwrap();
    let a = temp.path().join("a");
    let b = temp.path().join("b");

    unitstore(temp.path())
        .env("NVC_LIBPATH", format!("{}:{}", a.display(), b.display()))
        .args(["find", "missing", "--search", "-v"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("library missing not found in:"))
        .stderr(predicate::str::contains(format!("  {}", a.display())))
        .stderr(predicate::str::contains(format!("  {}", b.display())))
        .stderr(predicate::str::contains(format!(
            "  {}",
            temp.path().join("share").display()
        )));
}

#[test]
fn find_uses_search_path_only_when_asked() {
    let temp = tempdir().unwrap();
    let share = temp.path().join("share");
    fs::create_dir_all(&share).unwrap();
    unitstore(&share).arg("new").arg("ieee").assert().success();

    unitstore(temp.path())
        .args(["find", "ieee"])
        .assert()
        .failure();

    let assert = unitstore(temp.path())
        .args(["find", "IEEE", "--search"])
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["name"], "IEEE");
    assert!(items[0]["path"].as_str().unwrap().ends_with("ieee"));
}

#[test]
fn path_points_inside_library() {
    let temp = tempdir().unwrap();
    unitstore(temp.path()).arg("new").arg("work").assert().success();

    let assert = unitstore(temp.path())
        .args(["path", "work", "WORK.TOP"])
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let expected = temp.path().join("work").canonicalize().unwrap().join("WORK.TOP");
    assert_eq!(items[0]["path"], &*expected.to_string_lossy());
}

#[test]
fn destroy_removes_library() {
    let temp = tempdir().unwrap();
    unitstore(temp.path()).arg("new").arg("work").assert().success();
    unitstore(temp.path())
        .args(["put", "work", "WORK.E", "--kind", "entity"])
        .assert()
        .success();

    unitstore(temp.path()).args(["destroy", "work"]).assert().success();
    assert!(!temp.path().join("work").exists());

    unitstore(temp.path()).args(["find", "work"]).assert().failure();
}

#[test]
fn markdown_output() {
    let temp = tempdir().unwrap();
    unitstore(temp.path())
        .args(["--format", "md", "new", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Libraries"))
        .stdout(predicate::str::contains("**WORK**"));
}

#[test]
fn put_rejects_unit_name_outside_library() {
    let temp = tempdir().unwrap();
    unitstore(temp.path()).arg("new").arg("work").assert().success();
    let outside = temp.path().join("outside");

    unitstore(temp.path())
        .args(["put", "work"])
        .arg(&outside)
        .args(["--kind", "entity"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid unit name"));
    unitstore(temp.path())
        .args(["put", "work", "../outside", "--kind", "entity"])
        .assert()
        .code(1);

    assert!(!outside.exists());
    unitstore(temp.path())
        .args(["path", "work", "../outside"])
        .assert()
        .code(1);
}

#[test]
fn cache_limit_is_an_invariant_error() {
    let temp = tempdir().unwrap();
    unitstore(temp.path()).arg("new").arg("work").assert().success();

    unitstore(temp.path())
        .args(["--max-units", "0", "put", "work", "WORK.A", "--kind", "entity"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is full"));
}

#[cfg(unix)]
#[test]
fn unreadable_library_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().unwrap();
    unitstore(temp.path()).arg("new").arg("work").assert().success();
    unitstore(temp.path())
        .args(["put", "work", "WORK.A", "--kind", "entity"])
        .assert()
        .success();

    let lib = temp.path().join("work");
    fs::set_permissions(&lib, fs::Permissions::from_mode(0o311)).unwrap();
    let listable = fs::read_dir(&lib).is_ok();

    let assert = unitstore(temp.path()).args(["units", "work"]).assert();
    fs::set_permissions(&lib, fs::Permissions::from_mode(0o755)).unwrap();

    // Privileged users can list the directory regardless of its mode.
    if !listable {
        assert.code(3);
    }
}

#[test]
fn destroy_reports_entries_left_behind() {
    let temp = tempdir().unwrap();
    unitstore(temp.path()).arg("new").arg("work").assert().success();
    fs::create_dir(temp.path().join("work").join("nested")).unwrap();

    let assert = unitstore(temp.path()).args(["destroy", "work"]).assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["kind"], "library");
    assert_eq!(items[1]["kind"], "error");
    assert_eq!(items[1]["errors"][0]["code"], "DESTROY_INCOMPLETE");
    assert!(temp.path().join("work").join("nested").is_dir());
}

#[cfg(unix)]
#[test]
fn destroy_removes_non_utf8_entries() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = tempdir().unwrap();
    unitstore(temp.path()).arg("new").arg("work").assert().success();
    let lib = temp.path().join("work");
    fs::write(lib.join(OsStr::from_bytes(b"WORK.\xff")), "junk").unwrap();

    let assert = unitstore(temp.path()).args(["destroy", "work"]).assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 1);
    assert!(!lib.exists());
}

#[test]
fn invalid_format_is_rejected() {
    let temp = tempdir().unwrap();
    unitstore(temp.path())
        .args(["--format", "yaml", "new", "work"])
        .assert()
        .failure();
    assert!(!temp.path().join("work").exists());
}
