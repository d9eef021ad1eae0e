//! End-to-end tests for the `crab` binary.
//!
//! None of these enable `--venv`, `--setup-git` or a successful `--install`,
//! so no external tools are needed.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// `crab` running in `dir` with user settings isolated from the host.
fn crab(dir: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("crab");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("HOME", dir)
        .env_remove("CRAB_AUTHOR")
        .env_remove("CRAB_TEMPLATES_DIR")
        .env_remove("CRAB_NO_COLOR")
        .env_remove("RUST_LOG");
    cmd
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    crab(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    crab(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_init_help_lists_step_flags() {
    let temp = TempDir::new().unwrap();
    crab(temp.path())
        .args(["init", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--venv"))
        .stdout(predicate::str::contains("--setup-git"))
        .stdout(predicate::str::contains("--install"));
}

#[test]
fn test_init_creates_basic_project() {
    let temp = TempDir::new().unwrap();

    crab(temp.path())
        .args(["init", "test-project", "--author", "Test Author"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project initialized"));

    let project = temp.path().join("test-project");
    assert!(project.join("pyproject.toml").is_file());
    assert!(project.join("README.md").is_file());
    assert!(project.join("src").is_dir());
    assert!(project.join("tests").is_dir());
    assert!(project.join("docs").is_dir());

    let pyproject = fs::read_to_string(project.join("pyproject.toml")).unwrap();
    assert!(pyproject.contains("test-project"));
    assert!(pyproject.contains("Test Author"));
}

#[test]
fn test_init_without_optional_steps() {
    let temp = TempDir::new().unwrap();

    crab(temp.path())
        .args([
            "init",
            "test-project",
            "--yes",
            "--no-install",
            "--no-setup-git",
        ])
        .assert()
        .success();

    let project = temp.path().join("test-project");
    assert!(project.join("pyproject.toml").exists());
    assert!(!project.join(".venv").exists());
    assert!(!project.join(".git").exists());
}

#[test]
fn test_init_preserves_existing_files() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("test-project");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("existing_file.txt"), "keep me").unwrap();

    crab(temp.path())
        .args(["init", "test-project", "--yes"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(project.join("existing_file.txt")).unwrap(),
        "keep me"
    );
    assert!(project.join("pyproject.toml").exists());
}

#[test]
fn test_init_rejects_invalid_name() {
    let temp = TempDir::new().unwrap();
    let before = entries(temp.path());

    crab(temp.path())
        .args(["init", "../invalid", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project name"));

    assert_eq!(entries(temp.path()), before);
}

#[test]
fn test_init_unknown_template_is_not_found() {
    let temp = TempDir::new().unwrap();

    crab(temp.path())
        .args(["init", "demo", "--template", "nonexistent", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("nonexistent"));

    assert!(!temp.path().join("demo").exists());
}

#[test]
fn test_init_template_from_project_config() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("pyproject.toml"),
        "[tool.crab]\ntemplate = \"missing-set\"\n",
    )
    .unwrap();

    crab(temp.path())
        .args(["init", "demo", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing-set"));
}

#[test]
fn test_install_without_environment_fails() {
    let temp = TempDir::new().unwrap();

    crab(temp.path())
        .args(["init", "demo", "--yes", "--install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No environment"));

    // Rendering happened before the failing step.
    assert!(temp.path().join("demo/pyproject.toml").exists());
}

#[test]
fn test_custom_templates_dir() {
    let temp = TempDir::new().unwrap();
    let set = temp.path().join("templates/tiny");
    fs::create_dir_all(&set).unwrap();
    fs::write(set.join("hello.txt.j2"), "hello {{ project_name }} by {{ author }}").unwrap();

    crab(temp.path())
        .args(["init", "demo", "-t", "tiny", "-a", "Ada", "--templates-dir", "templates"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("demo/hello.txt")).unwrap(),
        "hello demo by Ada"
    );
}

#[test]
fn test_list_shows_basic() {
    let temp = TempDir::new().unwrap();
    crab(temp.path())
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("basic"));
}

#[test]
fn test_malformed_dotenv_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".env"), "NOT VALID\n").unwrap();

    crab(temp.path())
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("basic"))
        .stderr(predicate::str::contains(".env"));
}

#[test]
fn test_list_json_is_parseable() {
    let temp = TempDir::new().unwrap();
    let output = crab(temp.path())
        .args(["--quiet", "list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"basic".to_string()));
}

#[test]
fn test_config_get_reads_standalone_document() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("crab.toml"), "[paths]\nsource = \"lib\"\n").unwrap();

    crab(temp.path())
        .args(["config", "get", "paths.source"])
        .assert()
        .success()
        .stdout("lib\n");

    crab(temp.path())
        .args(["config", "get", "paths.tests"])
        .assert()
        .success()
        .stdout("tests\n");
}

#[test]
fn test_config_get_unknown_key() {
    let temp = TempDir::new().unwrap();
    crab(temp.path())
        .args(["config", "get", "no.such.key"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_invalid_value_exits_with_four() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("pyproject.toml"),
        "[tool.crab.test.coverage]\nthreshold = 250\n",
    )
    .unwrap();

    crab(temp.path())
        .args(["config", "show"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("threshold"));
}

#[test]
fn test_missing_explicit_config_exits_with_three() {
    let temp = TempDir::new().unwrap();
    crab(temp.path())
        .args(["--config", "nope.toml", "config", "show"])
        .assert()
        .code(3);
}

#[test]
fn test_unknown_subcommand_exits_with_two() {
    let temp = TempDir::new().unwrap();
    crab(temp.path()).arg("frobnicate").assert().code(2);
}

#[test]
fn test_completions_bash() {
    let temp = TempDir::new().unwrap();
    crab(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("crab"));
}
