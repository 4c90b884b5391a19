// Integration testing can be done either by calling library functions directly or by invoking your CLI as a subprocess.
use predicates::prelude::*;
use std::fs;

fn command(cwd: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("vue-scaffold").unwrap();

    cmd.current_dir(cwd).env_remove("npm_config_user_agent");

    cmd
}

#[test]
fn scaffold_default_project() {
    let cwd = tempfile::tempdir().unwrap();

    command(cwd.path())
        .arg("my-app")
        .arg("--default")
        .assert()
        .success()
        .stdout(predicate::str::contains("cd my-app"))
        .stdout(predicate::str::contains("npm run dev"));

    let root = cwd.path().join("my-app");
    let manifest = fs::read_to_string(root.join("package.json")).unwrap();

    assert!(manifest.contains("\"name\": \"my-app\""));
    assert!(root.join("src/App.vue").exists());
    assert!(root.join(".gitignore").exists());
    assert!(!root.join("src/router").exists());
    assert!(!root.join("vite.config.js.tera").exists());
}

#[test]
fn scaffold_with_feature_aliases() {
    let cwd = tempfile::tempdir().unwrap();

    command(cwd.path())
        .args(["my-app", "--ts", "--vue-router", "--pinia", "--tests"])
        .assert()
        .success();

    let root = cwd.path().join("my-app");

    assert!(root.join("src/main.ts").exists());
    assert!(root.join("src/router/index.ts").exists());
    assert!(root.join("cypress.config.ts").exists());
    assert!(root.join("vitest.config.ts").exists());
    assert!(!root.join("src/main.js").exists());
}

#[test]
fn unknown_flags_are_ignored() {
    let cwd = tempfile::tempdir().unwrap();

    command(cwd.path())
        .args(["my-app", "--default", "--bare", "--no-such-flag=1"])
        .assert()
        .success();

    assert!(cwd.path().join("my-app/package.json").exists());
}

#[test]
fn repeated_flags_and_aliases_are_accepted() {
    let cwd = tempfile::tempdir().unwrap();

    command(cwd.path())
        .args([
            "my-app",
            "--ts",
            "--typescript",
            "--router",
            "--vue-router",
            "--tests",
            "--with-tests",
            "--force",
            "--force",
        ])
        .assert()
        .success();

    let root = cwd.path().join("my-app");

    assert!(root.join("src/main.ts").exists());
    assert!(root.join("src/router/index.ts").exists());
    assert!(root.join("cypress.config.ts").exists());
}

#[test]
fn prettier_adds_format_step() {
    let cwd = tempfile::tempdir().unwrap();

    command(cwd.path())
        .args(["my-app", "--eslint-with-prettier"])
        .env("npm_config_user_agent", "pnpm/9.15.0 npm/? node/v22.0.0 linux x64")
        .assert()
        .success()
        .stdout(predicate::str::contains("pnpm install"))
        .stdout(predicate::str::contains("pnpm format"));

    assert!(cwd.path().join("my-app/.prettierrc.json").exists());

    let eslint_config = fs::read_to_string(cwd.path().join("my-app/eslint.config.js")).unwrap();
    assert!(eslint_config.contains("@vue/eslint-config-prettier/skip-formatting"));
    assert!(eslint_config.contains("  skipFormatting,"));
}

#[test]
fn target_that_is_a_file_fails_untouched() {
    let cwd = tempfile::tempdir().unwrap();
    fs::write(cwd.path().join("my-app"), "not a directory").unwrap();

    command(cwd.path())
        .args(["my-app", "--default", "--force"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));

    assert_eq!(
        fs::read_to_string(cwd.path().join("my-app")).unwrap(),
        "not a directory"
    );
}

#[test]
fn force_overwrites_non_empty_directory() {
    let cwd = tempfile::tempdir().unwrap();
    let root = cwd.path().join("my-app");
    fs::create_dir_all(root.join("old")).unwrap();
    fs::write(root.join("old/stale.txt"), "stale").unwrap();

    command(cwd.path())
        .args(["my-app", "--default", "--force"])
        .assert()
        .success();

    assert!(!root.join("old").exists());
    assert!(root.join("package.json").exists());
}

#[test]
fn non_empty_directory_without_terminal_fails_untouched() {
    let cwd = tempfile::tempdir().unwrap();
    let root = cwd.path().join("my-app");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("keep.txt"), "keep").unwrap();

    command(cwd.path())
        .args(["my-app", "--default"])
        .assert()
        .failure()
        .code(1);

    assert_eq!(fs::read_to_string(root.join("keep.txt")).unwrap(), "keep");
    assert!(!root.join("package.json").exists());
}

#[test]
fn missing_template_root_fails() {
    let cwd = tempfile::tempdir().unwrap();

    command(cwd.path())
        .args(["my-app", "--default", "--template-root"])
        .arg(cwd.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fragment not found"));
}
