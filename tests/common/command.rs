use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit on master: `a.txt = "hello"`, message "first"
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_minigit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "hello".to_string(),
    ));

    run_minigit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    minigit_commit(repository_dir.path(), "first").assert().success();

    repository_dir
}

pub fn run_minigit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("minigit").expect("Failed to find minigit binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn minigit_commit(dir: &Path, message: &str) -> Command {
    use fake::Fake;
    use fake::faker::name::en::Name;

    let author = Name().fake::<String>().replace(" ", "_");
    commit_as(dir, message, &author)
}

pub fn commit_as(dir: &Path, message: &str, author: &str) -> Command {
    let mut cmd = run_minigit_command(dir, &["commit", "-m", message]);
    cmd.env("MINIGIT_AUTHOR", author);
    cmd
}

/// Contents of a branch ref file, trimmed
pub fn read_branch_ref(dir: &Path, branch: &str) -> String {
    let ref_path = dir.join(".minigit").join("refs").join("heads").join(branch);
    std::fs::read_to_string(&ref_path)
        .unwrap_or_else(|e| panic!("Failed to read ref {:?}: {}", ref_path, e))
        .trim()
        .to_string()
}

/// Contents of the HEAD file, trimmed
pub fn read_head(dir: &Path) -> String {
    let head_path = dir.join(".minigit").join("HEAD");
    std::fs::read_to_string(&head_path)
        .unwrap_or_else(|e| panic!("Failed to read HEAD {:?}: {}", head_path, e))
        .trim()
        .to_string()
}

/// Raw bytes of an object in the store, as text
pub fn read_object(dir: &Path, oid: &str) -> String {
    let object_path = dir.join(".minigit").join("objects").join(oid);
    std::fs::read_to_string(&object_path)
        .unwrap_or_else(|e| panic!("Failed to read object {:?}: {}", object_path, e))
}

/// Captured stdout of `minigit log`
pub fn log_output(dir: &Path) -> String {
    let output = run_minigit_command(dir, &["log"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).expect("log output was not UTF-8")
}
