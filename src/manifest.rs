use crate::config::ReportConfig;
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{FileChangeEvent, LogEntry, PathHistory, SCHEMA_VERSION, SHORT_DATE};
use crate::util::{recent, write_document, SEP};
use anyhow::Context;
use console::style;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

pub const MANIFEST_FILE: &str = "MANIFEST.md";

const FILE_MARKER: &str = "📄";

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub version: u32,
    pub recent_limit: usize,
    /// Paths in the branch tip, sorted and unique.
    pub current_files: Vec<String>,
    pub recent_changes: Vec<FileChangeEvent>,
    pub history: PathHistory,
}

pub fn exec(config: &ReportConfig, output: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let repo = GitRepo::open(config.repo.as_ref()).context("Failed to open git repository")?;
    let entries = repo
        .read_history(&config.branch, true)
        .with_context(|| format!("Failed to read file history of branch '{}'", config.branch))?;
    let tracked = repo
        .list_tree(&config.branch)
        .with_context(|| format!("Failed to list files of branch '{}'", config.branch))?;

    let manifest = build_manifest(&entries, tracked, config.recent_limit);

    if json {
        println!("{}", manifest.to_json()?);
        return Ok(());
    }

    let path = output.unwrap_or(Path::new(MANIFEST_FILE));
    write_document(path, &manifest.to_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{}", style(format!("✅ {} updated.", path.display())).green());
    Ok(())
}

/// Cross-reference the add/delete log with the current tree listing.
pub fn build_manifest(
    entries: &[LogEntry],
    tracked: impl IntoIterator<Item = String>,
    recent_limit: usize,
) -> Manifest {
    let mut history = PathHistory::new();
    let mut changes = Vec::new();

    for entry in entries {
        for change in &entry.changes {
            let event = FileChangeEvent::new(&entry.commit, change);
            history.record(event.clone());
            changes.push(event);
        }
    }

    let current_files: BTreeSet<String> = tracked.into_iter().collect();

    Manifest {
        version: SCHEMA_VERSION,
        recent_limit,
        current_files: current_files.into_iter().collect(),
        recent_changes: recent(&changes, recent_limit).to_vec(),
        history,
    }
}

impl Manifest {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn write_events(f: &mut fmt::Formatter<'_>, events: &[FileChangeEvent]) -> fmt::Result {
    for event in events {
        writeln!(
            f,
            "  {}: {}{SEP}{}",
            event.status,
            event.date.format(SHORT_DATE),
            event.subject
        )?;
    }
    Ok(())
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# MANIFEST\n")?;

        writeln!(f, "## Current Files\n")?;
        for path in &self.current_files {
            writeln!(f, "{FILE_MARKER} {path}")?;
            write_events(f, self.history.added_for(path))?;
            writeln!(f)?;
        }

        writeln!(f, "## Recent Changes (Last {})\n", self.recent_limit)?;
        for event in &self.recent_changes {
            writeln!(
                f,
                "- {}{SEP}{} {}{SEP}\"{}\"",
                event.date.format(SHORT_DATE),
                event.status,
                event.path,
                event.subject
            )?;
        }
        writeln!(f)?;

        writeln!(f, "## Full File History\n")?;
        for path in self.history.paths() {
            writeln!(f, "{FILE_MARKER} {path}")?;
            write_events(f, self.history.added_for(path))?;
            write_events(f, self.history.deleted_for(path))?;
            writeln!(f)?;
        }
        Ok(())
    }
}
