use crate::config::ReportConfig;
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{CommitRecord, SCHEMA_VERSION, SHORT_DATE};
use crate::util::{recent, write_document, SEP};
use anyhow::Context;
use chrono::NaiveDate;
use console::style;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub subject: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub entries: Vec<ChangelogEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Changelog {
    pub version: u32,
    pub recent_limit: usize,
    pub summary: Vec<CommitRecord>,
    /// Newest date first; entries keep log order within a date.
    pub history: Vec<DateGroup>,
}

pub fn exec(config: &ReportConfig, output: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let repo = GitRepo::open(config.repo.as_ref()).context("Failed to open git repository")?;
    let commits = repo
        .fetch_commits(&config.branch)
        .with_context(|| format!("Failed to read history of branch '{}'", config.branch))?;

    let changelog = build_changelog(&commits, config.recent_limit);

    if json {
        println!("{}", changelog.to_json()?);
        return Ok(());
    }

    let path = output.unwrap_or(Path::new(CHANGELOG_FILE));
    write_document(path, &changelog.to_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{}", style(format!("✅ {} updated.", path.display())).green());
    Ok(())
}

pub fn build_changelog(commits: &[CommitRecord], recent_limit: usize) -> Changelog {
    let mut grouped: BTreeMap<NaiveDate, Vec<ChangelogEntry>> = BTreeMap::new();
    for commit in commits {
        grouped.entry(commit.date).or_default().push(ChangelogEntry {
            subject: commit.subject.clone(),
            author: commit.author.clone(),
        });
    }

    let history = grouped
        .into_iter()
        .rev()
        .map(|(date, entries)| DateGroup { date, entries })
        .collect();

    Changelog {
        version: SCHEMA_VERSION,
        recent_limit,
        summary: recent(commits, recent_limit).to_vec(),
        history,
    }
}

impl Changelog {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# CHANGELOG\n")?;

        writeln!(f, "## Summary (Last {} Commits)\n", self.recent_limit)?;
        for commit in &self.summary {
            writeln!(
                f,
                "- {}{SEP}{}{SEP}Author: {}",
                commit.date.format(SHORT_DATE),
                commit.subject,
                commit.author
            )?;
        }

        writeln!(f, "\n## Full History\n")?;
        for group in &self.history {
            writeln!(f, "### {}\n", group.date.format(SHORT_DATE))?;
            for entry in &group.entries {
                writeln!(f, "- {}{SEP}{}", entry.subject, entry.author)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
