// SPDX-License-Identifier: MIT OR Apache-2.0
//! Invokes the `ogham` binary end to end

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

fn ogham() -> Command {
    Command::cargo_bin("ogham").unwrap()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_format_compact_and_pretty() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "doc.json", r#" { "a" : [1, 2], "b": null } "#);
    assert_eq!(
        stdout_of(ogham().arg("format").arg("-c").arg(&file)),
        "{\"a\":[1,2],\"b\":null}\n"
    );
    assert_eq!(
        stdout_of(ogham().args(["format", "--indent", "1"]).arg(&file)),
        "{\n \"a\": [\n  1,\n  2\n ],\n \"b\": null\n}\n"
    );
}

#[test]
fn test_format_from_stdin() {
    let out = stdout_of(ogham().args(["format", "-c"]).write_stdin("[ true ,false ]"));
    assert_eq!(out, "[true,false]\n");
}

#[test]
fn test_diff_then_patch() {
    let dir = TempDir::new().unwrap();
    let source = write(&dir, "a.json", r#"{"a":1,"b":[1,2]}"#);
    let target = write(&dir, "b.json", r#"{"a":2,"b":[1],"c":true}"#);
    let patch = stdout_of(ogham().arg("diff").arg("-c").arg(&source).arg(&target));
    assert_eq!(
        patch,
        "[{\"op\":\"replace\",\"path\":\"/a\",\"value\":2},{\"op\":\"remove\",\"path\":\"/b/1\"},{\"op\":\"add\",\"path\":\"/c\",\"value\":true}]\n"
    );
    let patch_file = write(&dir, "patch.json", &patch);
    let patched = stdout_of(ogham().args(["patch", "-c"]).arg(&source).arg(&patch_file));
    assert_eq!(patched, "{\"a\":2,\"b\":[1],\"c\":true}\n");
}

#[test]
fn test_failed_patch_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "doc.json", r#"{"a":2}"#);
    let patch = write(
        &dir,
        "patch.json",
        r#"[{"op":"test","path":"/a","value":1},{"op":"replace","path":"/a","value":9}]"#,
    );
    let output = ogham().arg("patch").arg(&doc).arg(&patch).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("test failed"));
}

#[test]
fn test_merge_and_merge_diff() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.json", r#"{"a":1,"b":{"c":2}}"#);
    let overlay = write(&dir, "overlay.json", r#"{"a":null,"b":{"d":3}}"#);
    let merged = stdout_of(ogham().args(["merge", "-c"]).arg(&base).arg(&overlay));
    assert_eq!(merged, "{\"b\":{\"c\":2,\"d\":3}}\n");

    let target = write(&dir, "target.json", &merged);
    let diff = stdout_of(ogham().args(["merge-diff", "-c"]).arg(&base).arg(&target));
    assert_eq!(diff, "{\"a\":null,\"b\":{\"d\":3}}\n");
}

#[test]
fn test_pointer() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "doc.json", r#"{"users":[{"name":"Aoife","a/b":1}]}"#);
    assert_eq!(
        stdout_of(ogham().args(["pointer", "/users/0/name"]).arg(&doc)),
        "\"Aoife\"\n"
    );
    assert_eq!(stdout_of(ogham().args(["pointer", "/users/0/a~1b"]).arg(&doc)), "1\n");
    let missing = ogham().args(["pointer", "/users/1"]).arg(&doc).output().unwrap();
    assert!(!missing.status.success());
}

#[test]
fn test_validate() {
    let out = stdout_of(ogham().arg("validate").write_stdin(r#"{"ok": true}"#));
    assert_eq!(out, "JSON is valid\n");
    let bad = ogham().arg("validate").write_stdin("{\"ok\": tru}").output().unwrap();
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stderr).starts_with("Error:"));
}

#[test]
fn test_duplicate_key_flag() {
    let out = stdout_of(
        ogham()
            .args(["format", "-c", "--duplicate-keys", "first"])
            .write_stdin(r#"{"a":1,"a":2}"#),
    );
    assert_eq!(out, "{\"a\":1}\n");
    let fail = ogham()
        .args(["validate", "--duplicate-keys", "fail"])
        .write_stdin(r#"{"a":1,"a":2}"#)
        .output()
        .unwrap();
    assert!(!fail.status.success());
}

#[test]
fn test_max_depth_flag() {
    let nested = "[[[[]]]]";
    assert_eq!(stdout_of(ogham().args(["format", "-c"]).write_stdin(nested)), "[[[[]]]]\n");
    let shallow = ogham()
        .args(["validate", "--max-depth", "3"])
        .write_stdin(nested)
        .output()
        .unwrap();
    assert!(!shallow.status.success());

    let deep = "[".repeat(100_000);
    let out = ogham().arg("validate").write_stdin(deep).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nested deeper than 128"));
}

#[test]
fn test_utf16_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wide.json");
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend("[\"é\"]".encode_utf16().flat_map(u16::to_le_bytes));
    fs::write(&path, bytes).unwrap();
    assert_eq!(stdout_of(ogham().args(["format", "-c"]).arg(&path)), "[\"é\"]\n");
}

#[test]
fn test_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.json");
    ogham()
        .args(["format", "-c", "-o"])
        .arg(&out)
        .write_stdin("[1]")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(out).unwrap(), "[1]\n");
}
