mod utils;

use hugo_preproc::error::Error;
use hugo_preproc::history::History;
use std::fs;
use tempfile::TempDir;
use utils::{
    commit_file, commit_raw, commit_with_parents, init_repo, repo_with_commits, BASE_TIME,
};

#[test]
fn test_head_is_latest_commit() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, ids) = repo_with_commits(temp_dir.path(), &["first", "second", "third"]);

    let history = History::open(temp_dir.path()).unwrap();
    let head = history.head().unwrap();

    assert_eq!(head.hash, ids[2].to_string());
    assert_eq!(head.short_hash, &ids[2].to_string()[..7]);
    assert_eq!(head.index, 0);
    assert_eq!(head.message, "third");
    assert_eq!(head.summary, "third");
    assert_eq!(head.author.name, "Test Author");
    assert_eq!(head.author.email, "author@example.com");
    assert_eq!(head.author.timestamp, BASE_TIME + 2 * 3600);
    assert_eq!(head.author.when, "2023-11-15T00:13:20+00:00");
    assert_eq!(head.parents, vec![ids[1].to_string()]);
}

#[test]
fn test_each_walks_head_to_root() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, ids) = repo_with_commits(temp_dir.path(), &["first", "second", "third"]);

    let history = History::open(temp_dir.path()).unwrap();
    let records = history.each().unwrap().collect::<Result<Vec<_>, _>>().unwrap();

    let hashes: Vec<_> = records.iter().map(|r| r.hash.clone()).collect();
    let expected: Vec<_> = ids.iter().rev().map(|id| id.to_string()).collect();
    assert_eq!(hashes, expected);

    let indexes: Vec<_> = records.iter().map(|r| r.index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
    assert!(records.last().unwrap().parents.is_empty());
}

#[test]
fn test_all_matches_each() {
    let temp_dir = TempDir::new().unwrap();
    repo_with_commits(temp_dir.path(), &["first", "second", "third", "fourth"]);

    let history = History::open(temp_dir.path()).unwrap();
    let snapshot = history.all().unwrap();
    let walked = history.each().unwrap().count();

    assert_eq!(snapshot.commits.len(), 4);
    assert_eq!(snapshot.commits.len(), walked);
    assert_eq!(snapshot.head, history.head().unwrap());
    assert_eq!(snapshot.commits[0], snapshot.head);
}

#[test]
fn test_file_stats_against_parent() {
    let temp_dir = TempDir::new().unwrap();
    let repo = init_repo(temp_dir.path());
    commit_file(&repo, "notes.txt", "a\nb\n", "add notes", BASE_TIME);
    commit_file(&repo, "notes.txt", "a\nc\nd\n", "edit notes", BASE_TIME + 60);

    let history = History::open(temp_dir.path()).unwrap();
    let records = history.each().unwrap().collect::<Result<Vec<_>, _>>().unwrap();

    let edit = &records[0];
    assert_eq!(edit.files_changed, 1);
    assert_eq!(edit.stats[0].name, "notes.txt");
    assert_eq!(edit.stats[0].addition, 2);
    assert_eq!(edit.stats[0].deletion, 1);
    assert_eq!((edit.insertions, edit.deletions), (2, 1));

    let root = &records[1];
    assert_eq!(root.stats[0].addition, 2);
    assert_eq!(root.stats[0].deletion, 0);
}

#[test]
fn test_merge_commit_is_visited_once() {
    let temp_dir = TempDir::new().unwrap();
    let repo = init_repo(temp_dir.path());
    let root = commit_file(&repo, "base.txt", "base\n", "root", BASE_TIME);
    let side = commit_with_parents(&repo, "side.txt", "side\n", "side", BASE_TIME + 60, &[root], false);
    let main = commit_file(&repo, "main.txt", "main\n", "main", BASE_TIME + 120);
    let merge = commit_with_parents(
        &repo,
        "merge.txt",
        "merge\n",
        "merge",
        BASE_TIME + 180,
        &[main, side],
        true,
    );

    let history = History::open(temp_dir.path()).unwrap();
    let records = history.each().unwrap().collect::<Result<Vec<_>, _>>().unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].hash, merge.to_string());
    assert_eq!(records[0].parents.len(), 2);
    assert_eq!(records[3].hash, root.to_string());
    let mut seen: Vec<_> = records.iter().map(|r| r.hash.clone()).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 4);
}

#[test]
fn test_open_from_subdirectory() {
    let temp_dir = TempDir::new().unwrap();
    repo_with_commits(temp_dir.path(), &["only"]);
    let nested = temp_dir.path().join("content/posts");
    fs::create_dir_all(&nested).unwrap();

    let history = History::open(&nested).unwrap();
    assert_eq!(history.head().unwrap().message, "only");
}

#[test]
fn test_non_utf8_commit_text_is_kept() {
    let temp_dir = TempDir::new().unwrap();
    let repo = init_repo(temp_dir.path());
    commit_raw(&repo, b"Jos\xe9", b"caf\xe9 au lait\n\nbody\n", BASE_TIME);

    let head = History::open(temp_dir.path()).unwrap().head().unwrap();

    assert_eq!(head.summary, "caf\u{fffd} au lait");
    assert_eq!(head.message, "caf\u{fffd} au lait\n\nbody\n");
    assert_eq!(head.author.name, "Jos\u{fffd}");
    assert_eq!(head.committer.name, "Jos\u{fffd}");
    assert_eq!(head.files_changed, 1);
}

#[test]
fn test_empty_repository_has_no_head() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());

    let history = History::open(temp_dir.path()).unwrap();
    assert!(matches!(history.head(), Err(Error::EmptyRepositoryError { .. })));
    assert!(history.each().is_err());
    assert!(history.all().is_err());
}

#[test]
fn test_open_outside_repository_fails() {
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(History::open(temp_dir.path()), Err(Error::Git2Error(_))));
}
