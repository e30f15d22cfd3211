use crate::config::ReportConfig;
use crate::git::GitRepo;
use crate::model::CommitRecord;
use anyhow::Context;
use console::style;

pub const WIP_MARKER: &str = "WIP";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WipVerdict {
    Clear,
    Blocked(CommitRecord),
}

impl WipVerdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, WipVerdict::Blocked(_))
    }
}

/// Returns whether a push may proceed. Prints the verdict.
pub fn exec(config: &ReportConfig) -> anyhow::Result<WipVerdict> {
    let repo = GitRepo::open(config.repo.as_ref()).context("Failed to open git repository")?;
    let commits = repo
        .fetch_commits(&config.branch)
        .with_context(|| format!("Failed to read history of branch '{}'", config.branch))?;

    let verdict = check_wip(&commits);
    match &verdict {
        WipVerdict::Blocked(commit) => println!(
            "{}",
            style(format!("❌ Push blocked due to WIP commit: {}", commit.subject)).red()
        ),
        WipVerdict::Clear => println!("{}", style("✅ No WIP commits found.").green()),
    }
    Ok(verdict)
}

/// Stops at the first subject containing the marker, case-insensitively.
/// Substring match: "wiped" and "SWIPE" are flagged too.
pub fn check_wip(commits: &[CommitRecord]) -> WipVerdict {
    commits
        .iter()
        .find(|commit| commit.subject.to_uppercase().contains(WIP_MARKER))
        .cloned()
        .map_or(WipVerdict::Clear, WipVerdict::Blocked)
}
