//! Commit history access for git processors.
//! Opens a local repository read-only and turns its commits into serializable
//! records that templates and scripts can consume.

use crate::constants::SHORT_HASH_LEN;
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset};
use git2::{Commit, DiffOptions, ErrorCode, Oid, Patch, Repository, Revwalk, Sort};
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Author or committer of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: String,
    pub email: String,
    /// RFC 3339 time in the signature's own offset
    pub when: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
}

/// Line changes of one file within one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStat {
    pub name: String,
    pub addition: usize,
    pub deletion: usize,
}

/// A commit plus the changes it introduced relative to its first parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub hash: String,
    pub short_hash: String,
    /// Position in the head-to-root walk; the head commit is 0
    pub index: usize,
    pub author: Person,
    pub committer: Person,
    pub message: String,
    pub summary: String,
    pub parents: Vec<String>,
    pub stats: Vec<FileStat>,
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

/// The whole history, collected before anything is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySnapshot {
    pub head: CommitRecord,
    pub commits: Vec<CommitRecord>,
}

/// An open repository with its head resolved.
pub struct History {
    repo: Repository,
    path: PathBuf,
    head: Option<Oid>,
}

impl History {
    /// Opens the repository containing `path`, searching parent directories for `.git`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)?;
        let head = match repo.head() {
            Ok(reference) => Some(reference.peel_to_commit()?.id()),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        debug!("Opened repository {} at head {:?}", path.display(), head);
        Ok(Self { repo, path: path.to_path_buf(), head })
    }

    fn head_oid(&self) -> Result<Oid> {
        self.head.ok_or_else(|| Error::EmptyRepositoryError { path: self.path.display().to_string() })
    }

    /// Returns the record of the head commit.
    pub fn head(&self) -> Result<CommitRecord> {
        let oid = self.head_oid()?;
        self.record(oid, 0)
    }

    /// Returns a lazy walk from head to the root commit, newest first.
    ///
    /// Each record's stats are computed when it is yielded. Dropping the walk
    /// releases it.
    pub fn each(&self) -> Result<Commits<'_>> {
        let oid = self.head_oid()?;
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push(oid)?;
        Ok(Commits { history: self, walk, index: 0 })
    }

    /// Returns the head record together with the fully collected walk.
    pub fn all(&self) -> Result<HistorySnapshot> {
        let head = self.head()?;
        let commits = self.each()?.collect::<Result<Vec<_>>>()?;
        debug!("Collected {} commit(s)", commits.len());
        Ok(HistorySnapshot { head, commits })
    }

    fn record(&self, oid: Oid, index: usize) -> Result<CommitRecord> {
        let commit = self.repo.find_commit(oid)?;
        let stats = self.file_stats(&commit)?;
        let hash = oid.to_string();
        let author = person(&commit.author());
        let committer = person(&commit.committer());

        let record = CommitRecord {
            short_hash: hash.chars().take(SHORT_HASH_LEN).collect(),
            hash,
            index,
            author,
            committer,
            message: lossy(commit.message_bytes()),
            summary: commit.summary_bytes().map(lossy).unwrap_or_default(),
            parents: commit.parent_ids().map(|id| id.to_string()).collect(),
            files_changed: stats.len(),
            insertions: stats.iter().map(|s| s.addition).sum(),
            deletions: stats.iter().map(|s| s.deletion).sum(),
            stats,
        };
        Ok(record)
    }

    /// Diffs the commit against its first parent, or the empty tree for a root commit.
    fn file_stats(&self, commit: &Commit<'_>) -> Result<Vec<FileStat>> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };
        let mut options = DiffOptions::new();
        let diff =
            self.repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut options))?;

        let mut stats = Vec::new();
        for (idx, delta) in diff.deltas().enumerate() {
            let name = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let (addition, deletion) = match Patch::from_diff(&diff, idx)? {
                Some(patch) => {
                    let (_, additions, deletions) = patch.line_stats()?;
                    (additions, deletions)
                }
                None => (0, 0),
            };
            stats.push(FileStat { name, addition, deletion });
        }
        Ok(stats)
    }
}

/// Forward-only walk over the history, yielding one record per commit.
pub struct Commits<'repo> {
    history: &'repo History,
    walk: Revwalk<'repo>,
    index: usize,
}

impl Iterator for Commits<'_> {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = match self.walk.next()? {
            Ok(oid) => oid,
            Err(e) => return Some(Err(e.into())),
        };
        let record = self.history.record(oid, self.index);
        self.index += 1;
        Some(record)
    }
}

fn person(signature: &git2::Signature<'_>) -> Person {
    let when = signature.when();
    let timestamp = when.seconds();
    let rendered = FixedOffset::east_opt(when.offset_minutes() * 60)
        .zip(DateTime::from_timestamp(timestamp, 0))
        .map(|(offset, time)| time.with_timezone(&offset).to_rfc3339())
        .unwrap_or_default();

    Person {
        name: lossy(signature.name_bytes()),
        email: lossy(signature.email_bytes()),
        when: rendered,
        timestamp,
    }
}

/// Commit text is not guaranteed to be UTF-8; invalid sequences become U+FFFD.
fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
