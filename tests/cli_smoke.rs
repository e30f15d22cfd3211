use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    // init on `main` regardless of init.defaultBranch, plus basic identity
    git(dir, &["init"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

fn commit_all(dir: &Path, message: &str, date: &str) {
    git(dir, &["add", "-A"]);
    let stamp = format!("{date}T12:00:00");
    assert!(Command::new("git")
        .args(["commit", "-m", message])
        .env("GIT_AUTHOR_DATE", &stamp)
        .env("GIT_COMMITTER_DATE", &stamp)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn commit_file(dir: &Path, name: &str, content: &str, message: &str, date: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    commit_all(dir, message, date);
}

fn delete_file(dir: &Path, name: &str, message: &str, date: &str) {
    fs::remove_file(dir.join(name)).unwrap();
    commit_all(dir, message, date);
}

fn toolbox(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("git-toolbox").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn stdout_of(cmd: &mut Command, code: i32) -> String {
    let out = cmd.assert().code(code).get_output().stdout.clone();
    String::from_utf8(out).unwrap()
}

#[test]
fn changelog_groups_by_date_and_is_idempotent() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n", "initial import", "2024-01-01");
    commit_file(dir.path(), "b.txt", "b\n", "add b | with pipe", "2024-01-02");
    commit_file(dir.path(), "c.txt", "c\n", "add c", "2024-01-02");

    let stdout = stdout_of(toolbox(dir.path()).arg("changelog"), 0);
    assert!(stdout.contains("CHANGELOG.md updated."), "{stdout}");

    let first = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(first.starts_with("# CHANGELOG\n\n## Summary (Last 5 Commits)\n\n"));
    assert!(first.contains("- 2024-01-02 — add c — Author: Your Name\n"));
    assert!(first.contains("- add b | with pipe — Your Name\n"));

    let newer = first.find("### 2024-01-02").unwrap();
    let older = first.find("### 2024-01-01").unwrap();
    assert!(newer < older);
    assert_eq!(first.matches("### 2024-01-02").count(), 1);

    toolbox(dir.path()).arg("changelog").assert().success();
    let second = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn manifest_tracks_additions_and_deletions() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n", "add a", "2024-02-01");
    commit_file(dir.path(), "src/b.rs", "fn b() {}\n", "add b", "2024-02-02");
    delete_file(dir.path(), "a.txt", "remove a", "2024-02-03");

    toolbox(dir.path()).arg("manifest").assert().success();
    let manifest = fs::read_to_string(dir.path().join("MANIFEST.md")).unwrap();

    let current = &manifest[manifest.find("## Current Files").unwrap()..manifest.find("## Recent Changes").unwrap()];
    assert!(current.contains("📄 src/b.rs\n  Added: 2024-02-02 — add b\n"));
    assert!(!current.contains("a.txt"));

    let history = &manifest[manifest.find("## Full File History").unwrap()..];
    assert!(history.contains(
        "📄 a.txt\n  Added: 2024-02-01 — add a\n  Deleted: 2024-02-03 — remove a\n"
    ));
    assert!(manifest.contains("- 2024-02-03 — Deleted a.txt — \"remove a\"\n"));

    toolbox(dir.path()).arg("manifest").assert().success();
    assert_eq!(manifest, fs::read_to_string(dir.path().join("MANIFEST.md")).unwrap());
}

#[test]
fn manifest_json_lists_current_files() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "z.txt", "z\n", "add z", "2024-03-01");
    commit_file(dir.path(), "m.txt", "m\n", "add m", "2024-03-02");

    let stdout = stdout_of(
        toolbox(dir.path()).args(["manifest", "--json", "--recent-limit", "1"]),
        0,
    );
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["current_files"], serde_json::json!(["m.txt", "z.txt"]));
    assert_eq!(v["recent_changes"].as_array().unwrap().len(), 1);
    assert!(!dir.path().join("MANIFEST.md").exists());
}

#[test]
fn check_wip_blocks_push() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n", "release", "2024-01-01");
    commit_file(dir.path(), "b.txt", "b\n", "WIP: draft", "2024-01-02");
    commit_file(dir.path(), "c.txt", "c\n", "fix bug", "2024-01-03");

    let stdout = stdout_of(toolbox(dir.path()).arg("check-wip"), 1);
    assert!(
        stdout.contains("Push blocked due to WIP commit: WIP: draft"),
        "{stdout}"
    );
}

#[test]
fn check_wip_passes_clean_history() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n", "release", "2024-01-01");
    commit_file(dir.path(), "b.txt", "b\n", "fix bug", "2024-01-02");

    let stdout = stdout_of(toolbox(dir.path()).arg("CHECK-WIP"), 0);
    assert!(stdout.contains("No WIP commits found."), "{stdout}");
}

#[test]
fn missing_branch_fails_without_writing() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n", "init", "2024-01-01");

    toolbox(dir.path())
        .args(["changelog", "--branch", "does-not-exist"])
        .assert()
        .failure();
    assert!(!dir.path().join("CHANGELOG.md").exists());
}

#[test]
fn failed_run_leaves_existing_documents_untouched() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n", "init", "2024-01-01");
    fs::write(dir.path().join("CHANGELOG.md"), "previous changelog\n").unwrap();
    fs::write(dir.path().join("MANIFEST.md"), "previous manifest\n").unwrap();

    for action in ["changelog", "manifest"] {
        toolbox(dir.path())
            .args([action, "--branch", "does-not-exist"])
            .assert()
            .code(1);
    }

    assert_eq!(
        fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
        "previous changelog\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("MANIFEST.md")).unwrap(),
        "previous manifest\n"
    );
}

#[test]
fn manifest_subjects_ignore_author_delimiters() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    git(dir.path(), &["config", "user.name", "Ann|Lee"]);
    commit_file(dir.path(), "a.txt", "a\n", "init", "2024-01-01");

    toolbox(dir.path()).arg("manifest").assert().success();
    let manifest = fs::read_to_string(dir.path().join("MANIFEST.md")).unwrap();
    assert!(manifest.contains("- 2024-01-01 — Added a.txt — \"init\"\n"), "{manifest}");
    assert!(manifest.contains("  Added: 2024-01-01 — init\n"), "{manifest}");
    assert!(!manifest.contains("Lee"), "{manifest}");
}

#[test]
fn output_flag_and_repo_flag() {
    let repo = tempdir().unwrap();
    let out = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(repo.path());
    commit_file(repo.path(), "a.txt", "a\n", "init", "2024-01-01");

    let target = out.path().join("docs").join("HISTORY.md");
    toolbox(out.path())
        .arg("--repo")
        .arg(repo.path())
        .arg("--output")
        .arg(&target)
        .arg("Changelog")
        .assert()
        .success();
    let doc = fs::read_to_string(&target).unwrap();
    assert!(doc.contains("### 2024-01-01\n\n- init — Your Name\n"));
}

#[test]
fn usage_errors_exit_with_one() {
    let dir = tempdir().unwrap();

    let stdout = stdout_of(&mut toolbox(dir.path()), 1);
    assert!(stdout.contains("Usage: git-toolbox [manifest|changelog|check-wip]"));

    let stdout = stdout_of(toolbox(dir.path()).args(["manifest", "changelog"]), 1);
    assert!(stdout.contains("Usage:"));

    let stdout = stdout_of(toolbox(dir.path()).arg("deploy"), 1);
    assert!(stdout.contains("Invalid command. Use one of: manifest, changelog, check-wip"));

    let stdout = stdout_of(toolbox(dir.path()).arg("--help"), 1);
    assert!(stdout.contains("Usage: git-toolbox"), "{stdout}");

    toolbox(dir.path()).arg("--version").assert().code(1);
    assert!(!dir.path().join("CHANGELOG.md").exists());
    assert!(!dir.path().join("MANIFEST.md").exists());
}
