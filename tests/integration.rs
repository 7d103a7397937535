//! Integration tests for deepwalk


use harness::{TreeFixture, cwd_lock, run_deepwalk};

use assert_cmd::Command;
use predicates::prelude::*;

/// Position of `needle` as an exact line of `stdout`.
fn line_pos(stdout: &str, needle: &str) -> usize {
    stdout
        .lines()
        .position(|line| line == needle)
        .unwrap_or_else(|| panic!("no line {:?} in output:\n{}", needle, stdout))
}

#[test]
fn test_lists_every_entry() {
    let fixture = TreeFixture::new();
    fixture.add_file("src/main.txt", "top");
    fixture.add_file("src/nested/inner.txt", "deep");
    fixture.add_file("plain.txt", "flat");

    let (stdout, _stderr, success) = run_deepwalk(fixture.path(), &[]);
    assert!(success, "deepwalk should succeed");
    assert_eq!(line_pos(&stdout, "."), 0, "root first: {}", stdout);
    line_pos(&stdout, "./src");
    line_pos(&stdout, "./src/main.txt");
    line_pos(&stdout, "./src/nested/inner.txt");
    line_pos(&stdout, "./plain.txt");
    assert_eq!(stdout.lines().count(), 6, "one line per entry: {}", stdout);
}

#[test]
fn test_directories_precede_their_contents() {
    let fixture = TreeFixture::new();
    fixture.add_file("sub/inner.txt", "");
    fixture.add_file("sub/deeper/more.txt", "");

    let (stdout, _stderr, success) = run_deepwalk(fixture.path(), &[]);
    assert!(success);
    assert!(line_pos(&stdout, "./sub") < line_pos(&stdout, "./sub/inner.txt"));
    assert!(line_pos(&stdout, "./sub/deeper") < line_pos(&stdout, "./sub/deeper/more.txt"));
    assert!(line_pos(&stdout, "./sub") < line_pos(&stdout, "./sub/deeper"));
}

#[test]
fn test_reported_paths_extend_the_given_root() {
    let fixture = TreeFixture::new();
    fixture.add_file("child/one.txt", "");

    let (stdout, _stderr, success) = run_deepwalk(fixture.path(), &["child"]);
    assert!(success);
    assert_eq!(line_pos(&stdout, "child"), 0);
    line_pos(&stdout, "child/one.txt");
    assert_eq!(stdout.lines().count(), 2, "nothing outside the root: {}", stdout);
}

#[test]
fn test_absolute_root_prints_absolute_paths() {
    let fixture = TreeFixture::new();
    let file = fixture.add_file("leaf.txt", "");

    let root = fixture.path().to_str().expect("temp path is utf-8");
    let (stdout, _stderr, success) = run_deepwalk(fixture.path(), &[root]);
    assert!(success);
    line_pos(&stdout, root);
    line_pos(&stdout, file.to_str().expect("temp path is utf-8"));
}

#[test]
fn test_multiple_roots_walked_in_argument_order() {
    let fixture = TreeFixture::new();
    fixture.add_file("one/a.txt", "");
    fixture.add_file("two/b.txt", "");

    let (stdout, _stderr, success) = run_deepwalk(fixture.path(), &["one", "two"]);
    assert!(success);
    assert!(
        line_pos(&stdout, "one/a.txt") < line_pos(&stdout, "two"),
        "first root finishes before the second starts: {}",
        stdout
    );
}

#[test]
fn test_file_root_prints_just_the_file() {
    let fixture = TreeFixture::new();
    fixture.add_file("solo.txt", "alone");

    let (stdout, _stderr, success) = run_deepwalk(fixture.path(), &["solo.txt"]);
    assert!(success);
    assert_eq!(stdout.trim_end(), "solo.txt");
}

#[test]
fn test_empty_directory_prints_only_itself() {
    let fixture = TreeFixture::new();
    fixture.add_dir("hollow");

    let (stdout, _stderr, success) = run_deepwalk(fixture.path(), &["hollow"]);
    assert!(success);
    assert_eq!(stdout.trim_end(), "hollow");
}

#[test]
fn test_missing_path_is_reported_and_remaining_roots_still_walk() {
    let fixture = TreeFixture::new();
    fixture.add_file("real/here.txt", "");

    let (stdout, stderr, success) = run_deepwalk(fixture.path(), &["missing", "real"]);
    assert!(success, "per-entry failures are not fatal: {}", stderr);
    assert!(
        stderr.contains("missing:"),
        "failure goes to stderr as path: error: {}",
        stderr
    );
    assert!(stderr.contains("No such file"), "carries the OS error: {}", stderr);
    line_pos(&stdout, "real/here.txt");
    assert!(!stdout.contains("missing"), "failed root produces no stdout line");
}

#[test]
fn test_color_never_emits_no_escapes() {
    let fixture = TreeFixture::new();

    let (_stdout, stderr, success) =
        run_deepwalk(fixture.path(), &["--color", "never", "missing"]);
    assert!(success);
    assert!(stderr.contains("missing:"));
    assert!(
        !stderr.contains('\u{1b}'),
        "no ANSI escapes with --color never: {:?}",
        stderr
    );
}

#[test]
fn test_verbose_logs_walker_activity() {
    let fixture = TreeFixture::new();
    fixture.add_file("sub/f.txt", "");

    let (stdout, stderr, success) = run_deepwalk(fixture.path(), &["-v", "sub"]);
    assert!(success);
    line_pos(&stdout, "sub/f.txt");
    assert!(
        stderr.contains("entered"),
        "-v shows descents on stderr: {}",
        stderr
    );
}

#[test]
fn test_quiet_by_default() {
    let fixture = TreeFixture::new();
    fixture.add_file("sub/f.txt", "");

    let (_stdout, stderr, success) = run_deepwalk(fixture.path(), &["sub"]);
    assert!(success);
    assert!(stderr.is_empty(), "clean walks say nothing on stderr: {}", stderr);
}

#[test]
fn test_help_shows_usage() {
    Command::cargo_bin("deepwalk")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("unbounded depth"))
        .stdout(predicate::str::contains("--color"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("deepwalk")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("deepwalk"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    Command::cargo_bin("deepwalk")
        .unwrap()
        .arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// Library surface, driven the way an external caller would.

#[test]
fn test_library_reports_metadata_for_each_entry() {
    let _cwd = cwd_lock();
    let fixture = TreeFixture::new();
    fixture.add_file("dir/file.txt", "x");
    let root = fixture.path().join("dir");

    let mut kinds = Vec::new();
    deepwalk::walk(&root, |path, meta, err| {
        assert!(err.is_none(), "unexpected error at {}: {:?}", path.display(), err);
        let meta = meta.expect("metadata present on clean visits");
        kinds.push((path.to_path_buf(), meta.is_dir()));
        Ok(())
    })
    .expect("walk failed");

    assert_eq!(
        kinds,
        vec![(root.clone(), true), (root.join("file.txt"), false)]
    );
}

#[test]
fn test_library_skip_dir_prunes_subtree() {
    let _cwd = cwd_lock();
    let fixture = TreeFixture::new();
    fixture.add_file("top/skipme/buried.txt", "");
    fixture.add_file("top/kept.txt", "");
    let root = fixture.path().join("top");

    let mut seen = Vec::new();
    deepwalk::walk(&root, |path, _meta, _err| {
        seen.push(path.to_path_buf());
        if path.ends_with("skipme") {
            return Err(deepwalk::WalkError::SkipDir);
        }
        Ok(())
    })
    .expect("skipping is not a failure");

    assert!(seen.contains(&root.join("kept.txt")));
    assert!(!seen.iter().any(|p| p.ends_with("buried.txt")));
}
