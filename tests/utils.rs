#![allow(dead_code)]

use git2::{Commit, ObjectType, Oid, Repository, Signature, Time};
use std::fs;
use std::path::Path;

/// Base time for fixture commits; each commit is one hour later than the previous.
pub const BASE_TIME: i64 = 1_700_000_000;

pub fn init_repo<P: AsRef<Path>>(dir: P) -> Repository {
    Repository::init(dir).unwrap()
}

fn signature(time: i64) -> Signature<'static> {
    Signature::new("Test Author", "author@example.com", &Time::new(time, 0)).unwrap()
}

fn stage(repo: &Repository, name: &str, content: &str) -> Oid {
    let workdir = repo.workdir().unwrap();
    let path = workdir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    index.write_tree().unwrap()
}

/// Writes `name`, stages it and commits on HEAD.
pub fn commit_file(
    repo: &Repository,
    name: &str,
    content: &str,
    message: &str,
    time: i64,
) -> Oid {
    let tree_id = stage(repo, name, content);
    let tree = repo.find_tree(tree_id).unwrap();
    let parents: Vec<Commit> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => vec![],
    };
    let parent_refs: Vec<&Commit> = parents.iter().collect();
    let sig = signature(time);
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs).unwrap()
}

/// Commits with explicit parents; `update_head` decides whether HEAD moves.
pub fn commit_with_parents(
    repo: &Repository,
    name: &str,
    content: &str,
    message: &str,
    time: i64,
    parents: &[Oid],
    update_head: bool,
) -> Oid {
    let tree_id = stage(repo, name, content);
    let tree = repo.find_tree(tree_id).unwrap();
    let parents: Vec<Commit> = parents.iter().map(|id| repo.find_commit(*id).unwrap()).collect();
    let parent_refs: Vec<&Commit> = parents.iter().collect();
    let sig = signature(time);
    let update_ref = if update_head { Some("HEAD") } else { None };
    repo.commit(update_ref, &sig, &sig, message, &tree, &parent_refs).unwrap()
}

/// One commit per message, oldest first, each touching its own file.
pub fn repo_with_commits<P: AsRef<Path>>(dir: P, messages: &[&str]) -> (Repository, Vec<Oid>) {
    let repo = init_repo(dir);
    let mut ids = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        let id = commit_file(
            &repo,
            &format!("file{i}.txt"),
            &format!("line for {message}\n"),
            message,
            BASE_TIME + i as i64 * 3600,
        );
        ids.push(id);
    }
    (repo, ids)
}

/// Writes a root commit object from raw bytes and detaches HEAD onto it.
///
/// Lets fixtures carry author names and messages that are not valid UTF-8.
pub fn commit_raw(repo: &Repository, author: &[u8], message: &[u8], time: i64) -> Oid {
    let tree_id = stage(repo, "raw.txt", "raw\n");
    let mut buffer = format!("tree {tree_id}\n").into_bytes();
    for role in ["author", "committer"] {
        buffer.extend_from_slice(role.as_bytes());
        buffer.push(b' ');
        buffer.extend_from_slice(author);
        buffer.extend_from_slice(format!(" <author@example.com> {time} +0000\n").as_bytes());
    }
    buffer.push(b'\n');
    buffer.extend_from_slice(message);

    let id = repo.odb().unwrap().write(ObjectType::Commit, &buffer).unwrap();
    repo.set_head_detached(id).unwrap();
    id
}
