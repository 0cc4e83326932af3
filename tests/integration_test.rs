use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get the binary command, isolated to the test's config directory
fn proji_cmd(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_proji"));
    cmd.env("PROJI_CONFIG_DIR", config_dir)
        .env_remove("PROJI_STORAGE_PATH")
        .env_remove("PROJI_IMPORT_EXCLUDE_FOLDERS");
    cmd
}

/// Temp root with a config dir, a workspace and a template directory to import
fn setup() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join("config");
    let workspace = temp_dir.path().join("workspace");
    fs::create_dir_all(&config_dir).unwrap();
    fs::create_dir_all(&workspace).unwrap();

    let template = temp_dir.path().join("web-starter");
    fs::create_dir_all(template.join("src")).unwrap();
    fs::create_dir_all(template.join("node_modules/left-pad")).unwrap();
    fs::write(template.join("src/index.js"), "console.log('hi')").unwrap();
    fs::write(template.join("package.json"), "{}").unwrap();

    (temp_dir, config_dir, workspace)
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = TempDir::new().unwrap();
    proji_cmd(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("package"))
        .stdout(predicate::str::contains("project"));
}

#[test]
fn test_import_requires_a_source() {
    let (_temp_dir, config_dir, _) = setup();
    proji_cmd(&config_dir)
        .args(["package", "import"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to import"));
}

#[test]
fn test_empty_package_list() {
    let (_temp_dir, config_dir, _) = setup();
    proji_cmd(&config_dir)
        .args(["package", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages found"));
}

#[test]
fn test_import_directory_then_create_project() {
    let (temp_dir, config_dir, workspace) = setup();
    let template = temp_dir.path().join("web-starter");

    proji_cmd(&config_dir)
        .args(["package", "import", "--exclude", "node_modules", "--directory"])
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported package 'ws'"));

    assert!(config_dir.join("db/proji.json").is_file());

    proji_cmd(&config_dir)
        .args(["package", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web-starter"))
        .stdout(predicate::str::contains("Total: 1 package"));

    proji_cmd(&config_dir)
        .args(["package", "show", "ws"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/index.js"))
        .stdout(predicate::str::contains("node_modules").not());

    proji_cmd(&config_dir)
        .current_dir(&workspace)
        .args(["project", "create", "ws", "site-a", "site-b"])
        .assert()
        .success();

    for name in ["site-a", "site-b"] {
        let root = workspace.join(name);
        assert!(root.join("src").is_dir());
        assert!(root.join("src/index.js").is_file());
        assert!(root.join("package.json").is_file());
        assert!(!root.join("node_modules").exists());
    }

    proji_cmd(&config_dir)
        .args(["project", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("site-a"))
        .stdout(predicate::str::contains("site-b"));
}

#[test]
fn test_create_into_existing_directory_fails() {
    let (temp_dir, config_dir, workspace) = setup();
    let template = temp_dir.path().join("web-starter");
    fs::create_dir(workspace.join("taken")).unwrap();

    proji_cmd(&config_dir)
        .args(["package", "import", "--directory"])
        .arg(&template)
        .assert()
        .success();

    proji_cmd(&config_dir)
        .current_dir(&workspace)
        .args(["project", "create", "ws", "taken"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to create project 'taken'"));
}

#[test]
fn test_export_and_remove_package() {
    let (temp_dir, config_dir, workspace) = setup();
    let template = temp_dir.path().join("web-starter");

    proji_cmd(&config_dir)
        .args(["package", "import", "--directory"])
        .arg(&template)
        .assert()
        .success();

    proji_cmd(&config_dir)
        .args(["package", "export", "ws", "--destination"])
        .arg(&workspace)
        .assert()
        .success();
    let exported = fs::read_to_string(workspace.join("proji-web-starter.toml")).unwrap();
    assert!(exported.contains("label = \"ws\""));

    proji_cmd(&config_dir)
        .args(["package", "rm", "ws"])
        .assert()
        .success();

    proji_cmd(&config_dir)
        .args(["package", "show", "ws"])
        .assert()
        .failure();

    // The label is free again after removal
    proji_cmd(&config_dir)
        .args(["package", "import", "--config"])
        .arg(workspace.join("proji-web-starter.toml"))
        .assert()
        .success();
}

#[test]
fn test_project_add_and_set_path() {
    let (temp_dir, config_dir, workspace) = setup();
    let template = temp_dir.path().join("web-starter");
    let existing = workspace.join("legacy");
    fs::create_dir(&existing).unwrap();

    proji_cmd(&config_dir)
        .args(["package", "import", "--directory"])
        .arg(&template)
        .assert()
        .success();

    proji_cmd(&config_dir)
        .args(["project", "add", "ws"])
        .arg(&existing)
        .assert()
        .success();

    let moved = workspace.join("modern");
    proji_cmd(&config_dir)
        .args(["project", "set-path"])
        .arg(&existing)
        .arg(&moved)
        .assert()
        .success();

    proji_cmd(&config_dir)
        .args(["project", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modern"))
        .stdout(predicate::str::contains("legacy").not());

    proji_cmd(&config_dir)
        .args(["project", "rm"])
        .arg(&moved)
        .assert()
        .success();
}
