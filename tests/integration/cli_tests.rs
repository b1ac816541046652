use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Binary with an empty config file so the user's own settings stay out.
fn dirdupe(config_dir: &TempDir) -> Command {
    let config = config_dir.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dirdupe"));
    cmd.env_remove("RUST_LOG")
        .env_remove("DIRDUPE_OUTPUT")
        .env_remove("DIRDUPE_MIN_DEPTH")
        .env_remove("DIRDUPE_IGNORE")
        .env_remove("DIRDUPE_IO_THREADS");
    cmd.arg("--no-color");
    cmd
}

fn scan(cmd: &mut Command, root: &Path, config_dir: &TempDir) {
    cmd.arg("scan")
        .arg(root)
        .arg("--config")
        .arg(config_dir.path().join("config.toml"));
}

fn pair_tree() -> TempDir {
    let dir = tempdir().unwrap();
    for p in ["one/docs/img", "two/docs/img", "three/misc"] {
        fs::create_dir_all(dir.path().join(p)).unwrap();
    }
    dir
}

#[test]
fn test_help() {
    Command::new(env!("CARGO_BIN_EXE_dirdupe"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dirdupe"));
}

#[test]
fn test_text_report() {
    let root = pair_tree();
    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, root.path(), &config);

    let one = root.path().join("one").display().to_string();
    let two = root.path().join("two").display().to_string();
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Found 1 duplicate directory group"))
        .stdout(predicate::str::contains(one))
        .stdout(predicate::str::contains(two))
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_json_report() {
    let root = pair_tree();
    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, root.path(), &config);
    cmd.args(["--output", "json"]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let groups = json["duplicates"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["depth"], 2);
    assert_eq!(groups[0]["directories"].as_array().unwrap().len(), 2);
    assert_eq!(json["summary"]["directories_scanned"], 9);
    assert_eq!(json["summary"]["exit_code_name"], "DD000");
}

#[test]
fn test_csv_report() {
    let root = pair_tree();
    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, root.path(), &config);
    cmd.args(["-o", "csv"]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "group_id,fingerprint,depth,entry_count,path");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1,"));
}

#[test]
fn test_no_duplicates_is_success() {
    let root = tempdir().unwrap();
    fs::create_dir(root.path().join("only")).unwrap();
    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, root.path(), &config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No duplicate directories found."));
}

#[test]
fn test_config_file_sets_output() {
    let root = pair_tree();
    let config = tempdir().unwrap();
    fs::write(config.path().join("config.toml"), "output = \"csv\"\n").unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, root.path(), &config);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("group_id,"));
}

#[test]
fn test_env_sets_min_depth() {
    let root = pair_tree();
    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, root.path(), &config);
    cmd.env("DIRDUPE_MIN_DEPTH", "3");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No duplicate directories found."))
        .stdout(predicate::str::contains("1 shallower groups hidden"));
}

#[test]
fn test_missing_root_exit_code() {
    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, Path::new("/non/existent/path/12345"), &config);

    cmd.assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[DD002] Error:"))
        .stderr(predicate::str::contains("/non/existent/path/12345"));
}

#[test]
fn test_root_is_file_exit_code() {
    let root = tempdir().unwrap();
    let file = root.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, &file, &config);

    cmd.assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Not a directory"));
}

#[test]
fn test_json_errors() {
    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, Path::new("/non/existent/path/12345"), &config);
    cmd.arg("--json-errors");

    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(2));

    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["code"], "DD002");
    assert_eq!(err["exit_code"], 2);
    assert_eq!(err["path"], "/non/existent/path/12345");
}

#[test]
fn test_missing_config_file_exit_code() {
    let root = pair_tree();
    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    cmd.arg("scan")
        .arg(root.path())
        .arg("--config")
        .arg(config.path().join("missing.toml"));

    cmd.assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[DD001]"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_aborts_without_output() {
    use std::os::unix::fs::PermissionsExt;

    let root = pair_tree();
    let locked = root.path().join("three/misc");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Running with privileges that ignore permissions.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let config = tempdir().unwrap();
    let mut cmd = dirdupe(&config);
    scan(&mut cmd, root.path(), &config);
    let assert = cmd.assert();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Permission denied"));
}
