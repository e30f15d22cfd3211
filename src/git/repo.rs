use crate::error::{Result, ToolboxError};
use crate::git::parser::{self, LogShape};
use crate::model::{CommitRecord, LogEntry};
use gix::{discover, Repository};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail early with a readable error when `branch` does not name a reference.
    pub fn resolve_branch(&self, branch: &str) -> Result<()> {
        let reference = self.repo.find_reference(branch)?;
        debug!(branch, reference = %reference.name().as_bstr(), "resolved branch");
        Ok(())
    }

    /// Run the log query for `branch`, newest first.
    ///
    /// With `include_status` every header is followed by its `--name-status` lines,
    /// and headers omit the author.
    pub fn read_history(&self, branch: &str, include_status: bool) -> Result<Vec<LogEntry>> {
        self.resolve_branch(branch)?;

        let shape = if include_status {
            LogShape::FileStatus
        } else {
            LogShape::Commits
        };
        let mut args = vec!["log", branch, "--date=short", shape.pretty_format()];
        if include_status {
            args.push("--name-status");
        }
        args.push("--");

        let output = self.run_git(&args)?;
        let entries = parser::parse_log(&output, shape)?;
        debug!(
            commits = entries.len(),
            changes = entries.iter().map(|e| e.changes.len()).sum::<usize>(),
            "parsed history"
        );
        Ok(entries)
    }

    pub fn fetch_commits(&self, branch: &str) -> Result<Vec<CommitRecord>> {
        Ok(self
            .read_history(branch, false)?
            .into_iter()
            .map(|entry| entry.commit)
            .collect())
    }

    /// Paths tracked in the tip tree of `branch`, in the order git lists them.
    pub fn list_tree(&self, branch: &str) -> Result<Vec<String>> {
        self.resolve_branch(branch)?;
        let output = self.run_git(&["ls-tree", "-r", "--name-only", branch])?;
        Ok(output
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn run_git(&self, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        debug!(%command, repo = %self.path.display(), "running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.path)
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .output()
            .map_err(|e| ToolboxError::Git(format!("failed to run `{command}`: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToolboxError::Git(format!(
                "`{command}` failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ToolboxError::Git(format!("`{command}` returned non-UTF-8 output: {e}")))
    }
}
