//! Journal path checks.

use std::path::{Path, PathBuf};

/// Rejects paths that cannot be a journal file.
///
/// With `must_exist` the file has to be present already (read-only commands);
/// otherwise only its parent directory has to exist.
pub fn validate_journal_path(path: &Path, must_exist: bool) -> Result<PathBuf, String> {
    if path.as_os_str().is_empty() {
        return Err("journal path is empty".to_string());
    }
    if path.is_dir() {
        return Err(format!("{} is a directory", sanitize_path_for_error(path)));
    }
    if must_exist && !path.exists() {
        return Err(format!("{} does not exist", sanitize_path_for_error(path)));
    }
    if !must_exist {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(format!(
                    "directory of {} does not exist",
                    sanitize_path_for_error(path)
                ));
            }
        }
    }
    Ok(path.to_path_buf())
}

/// File name only, so errors do not echo full directory layouts.
pub fn sanitize_path_for_error(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<journal>".to_string())
}
