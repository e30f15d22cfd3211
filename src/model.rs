use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// Date format produced by `git log --date=short`.
pub const SHORT_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub hash: String,
    pub date: NaiveDate,
    pub author: String,
    pub subject: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeStatus {
    Added,
    Deleted,
}

impl ChangeStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(ChangeStatus::Added),
            "D" => Some(ChangeStatus::Deleted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "Added",
            ChangeStatus::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single status line attached to the commit header above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub status: ChangeStatus,
    pub path: String,
}

/// One commit as read from the log, with its file changes when the query asked for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub commit: CommitRecord,
    pub changes: Vec<FileChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChangeEvent {
    pub path: String,
    pub status: ChangeStatus,
    pub date: NaiveDate,
    pub subject: String,
}

impl FileChangeEvent {
    pub fn new(commit: &CommitRecord, change: &FileChange) -> Self {
        Self {
            path: change.path.clone(),
            status: change.status,
            date: commit.date,
            subject: commit.subject.clone(),
        }
    }
}

/// Added and deleted events per path, each list in log order (newest first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathHistory {
    pub added: BTreeMap<String, Vec<FileChangeEvent>>,
    pub deleted: BTreeMap<String, Vec<FileChangeEvent>>,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: FileChangeEvent) {
        let bucket = match event.status {
            ChangeStatus::Added => &mut self.added,
            ChangeStatus::Deleted => &mut self.deleted,
        };
        bucket.entry(event.path.clone()).or_default().push(event);
    }

    pub fn added_for(&self, path: &str) -> &[FileChangeEvent] {
        self.added.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn deleted_for(&self, path: &str) -> &[FileChangeEvent] {
        self.deleted.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every path that was ever added or deleted, sorted and deduplicated.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .added
            .keys()
            .chain(self.deleted.keys())
            .map(String::as_str)
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}
