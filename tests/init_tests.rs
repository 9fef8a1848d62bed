use crate::common::command::{repository_dir, run_minigit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn init_creates_the_metadata_layout(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;

    run_minigit_command(dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty minigit repository",
        ));

    let vcs_path = dir.path().join(".minigit");
    assert!(vcs_path.join("objects").is_dir());
    assert!(vcs_path.join("refs").join("heads").is_dir());

    let head_content = std::fs::read_to_string(vcs_path.join("HEAD"))?;
    assert_eq!(head_content.trim(), "ref: refs/heads/master");

    let index_content = std::fs::read_to_string(vcs_path.join("index"))?;
    assert_eq!(index_content, "");

    let ignore_content = std::fs::read_to_string(dir.path().join(".gitignore"))?;
    assert_eq!(ignore_content, ".minigit/\n");

    Ok(())
}

#[rstest]
fn init_twice_fails_without_damaging_the_repository(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;

    run_minigit_command(dir.path(), &["init"]).assert().success();
    run_minigit_command(dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    let head_content = std::fs::read_to_string(dir.path().join(".minigit").join("HEAD"))?;
    assert_eq!(head_content.trim(), "ref: refs/heads/master");

    Ok(())
}

#[rstest]
fn init_does_not_overwrite_an_existing_ignore_file(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    std::fs::write(dir.path().join(".gitignore"), "custom-entry\n")?;

    run_minigit_command(dir.path(), &["init"]).assert().success();

    let ignore_content = std::fs::read_to_string(dir.path().join(".gitignore"))?;
    assert_eq!(ignore_content, "custom-entry\n");

    Ok(())
}

#[rstest]
fn log_before_any_commit_reports_none(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;

    run_minigit_command(dir.path(), &["init"]).assert().success();
    run_minigit_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No commits yet."));

    Ok(())
}

#[rstest]
fn commands_outside_a_repository_fail(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;

    run_minigit_command(dir.path(), &["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a minigit repository"));

    Ok(())
}
