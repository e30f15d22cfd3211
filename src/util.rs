use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Separator used between fields in rendered report lines.
pub const SEP: &str = " — ";

/// Replace the document at `path` with `contents` in a single write.
pub fn write_document(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    debug!(path = %path.display(), bytes = contents.len(), "document written");
    Ok(())
}

/// The first `limit` items of a newest-first sequence.
pub fn recent<T>(items: &[T], limit: usize) -> &[T] {
    &items[..limit.min(items.len())]
}
