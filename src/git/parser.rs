//! Line grammar for the output of `git log` in the two shapes the reports use.
//!
//! ```text
//! output  := line*
//! line    := blank | header | status
//! header  := hash '|' date '|' author '|' subject      (commits shape, limit 4)
//!          | hash '|' date '|' subject                 (file-status shape, limit 3)
//! status  := CODE SCORE? (TAB | SPACE) path (TAB path)*
//! ```
//!
//! Header lines set the commit context for the status lines that follow.
//! Only `A` and `D` status lines are kept; other codes (`M`, `R100`, `C75`, ...)
//! are recognized and dropped.

use crate::error::{Result, ToolboxError};
use crate::model::{ChangeStatus, CommitRecord, FileChange, LogEntry, SHORT_DATE};
use chrono::NaiveDate;
use tracing::debug;

pub const FIELD_DELIMITER: char = '|';

/// Which `--pretty` format a log query used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogShape {
    /// `hash|date|author|subject`, one line per commit.
    Commits,
    /// `hash|date|subject` headers followed by `--name-status` lines.
    /// Records parsed from this shape carry an empty author.
    FileStatus,
}

impl LogShape {
    pub fn pretty_format(self) -> &'static str {
        match self {
            LogShape::Commits => "--pretty=format:%H|%ad|%an|%s",
            LogShape::FileStatus => "--pretty=format:%H|%ad|%s",
        }
    }

    fn header_fields(self) -> usize {
        match self {
            LogShape::Commits => 4,
            LogShape::FileStatus => 3,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Header(CommitRecord),
    Status { code: &'a str, path: &'a str },
}

/// Parse log output into entries, newest first as git emits them.
pub fn parse_log(output: &str, shape: LogShape) -> Result<Vec<LogEntry>> {
    let (entries, ignored) = parse_log_counted(output, shape)?;
    if ignored > 0 {
        debug!(ignored, "dropped status lines other than A/D");
    }
    Ok(entries)
}

/// Like [`parse_log`], also returning how many status lines were dropped.
fn parse_log_counted(output: &str, shape: LogShape) -> Result<(Vec<LogEntry>, usize)> {
    let mut entries: Vec<LogEntry> = Vec::new();
    let mut ignored = 0;

    for (idx, raw) in output.lines().enumerate() {
        let line_no = idx + 1;
        match classify(raw, line_no, shape)? {
            Line::Blank => {}
            Line::Header(commit) => entries.push(LogEntry {
                commit,
                changes: Vec::new(),
            }),
            Line::Status { code, path } => {
                let current = entries.last_mut().ok_or_else(|| {
                    ToolboxError::parse(line_no, format!("status line before any commit header: {raw:?}"))
                })?;
                match ChangeStatus::from_code(code) {
                    Some(status) => current.changes.push(FileChange {
                        status,
                        path: path.to_string(),
                    }),
                    None => ignored += 1,
                }
            }
        }
    }

    Ok((entries, ignored))
}

/// Split a header line into the fields of `shape`; the subject keeps any extra delimiters.
pub fn parse_header(line: &str, line_no: usize, shape: LogShape) -> Result<CommitRecord> {
    let expected = shape.header_fields();
    let fields: Vec<&str> = line.trim().splitn(expected, FIELD_DELIMITER).collect();
    if fields.len() != expected {
        return Err(ToolboxError::parse(
            line_no,
            format!("expected {expected} '{FIELD_DELIMITER}'-separated fields: {line:?}"),
        ));
    }

    let (hash, date, author, subject) = match shape {
        LogShape::Commits => (fields[0], fields[1], fields[2], fields[3]),
        LogShape::FileStatus => (fields[0], fields[1], "", fields[2]),
    };

    let date = NaiveDate::parse_from_str(date, SHORT_DATE)
        .map_err(|e| ToolboxError::parse(line_no, format!("invalid date {date:?}: {e}")))?;

    Ok(CommitRecord {
        hash: hash.to_string(),
        date,
        author: author.to_string(),
        subject: subject.to_string(),
    })
}

fn classify(raw: &str, line_no: usize, shape: LogShape) -> Result<Line<'_>> {
    let line = raw.trim_end_matches('\r');
    if line.trim().is_empty() {
        return Ok(Line::Blank);
    }
    // Hashes are lowercase hex, so a header can never look like a status line.
    if let Some((code, path)) = split_status(line) {
        return Ok(Line::Status { code, path });
    }
    if line.contains(FIELD_DELIMITER) {
        return parse_header(line, line_no, shape).map(Line::Header);
    }
    Err(ToolboxError::parse(line_no, format!("unrecognized line: {line:?}")))
}

/// Returns `(code, path)` for a status line, with the similarity score stripped from the code.
fn split_status(line: &str) -> Option<(&str, &str)> {
    let (token, rest) = line.split_once(is_separator)?;
    let mut chars = token.chars();
    let letter = chars.next()?;
    if !letter.is_ascii_uppercase() || !chars.all(|c| c.is_ascii_digit()) {
        return None;
    }
    let path = rest.trim_start_matches(is_separator);
    if path.is_empty() {
        return None;
    }
    Some((&token[..1], path))
}

fn is_separator(c: char) -> bool {
    c == '\t' || c == ' '
}
