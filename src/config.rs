use std::path::PathBuf;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Settings shared by every report operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Repository to query; `None` discovers one from the current directory.
    pub repo: Option<PathBuf>,
    pub branch: String,
    pub recent_limit: usize,
}

impl ReportConfig {
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            repo: None,
            branch: DEFAULT_BRANCH.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}
