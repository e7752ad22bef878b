use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::CHAT_DIR_NAME;
use crate::content::resolver::RESOURCE_DIR_NAME;
use crate::models::UserDirInfo;

/// Maximum number of files accepted in one chat directory (resource exhaustion guard)
const MAX_CHAT_FILES: usize = 100_000;

/// List the candidate chat logs of a `chat/` directory, in file name order
///
/// Every regular file is a candidate; the decoder filters by signature.
/// Subdirectories are not descended into and symlinks are skipped.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or holds more than
/// [`MAX_CHAT_FILES`] entries.
pub fn discover_chat_files(chat_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(chat_dir).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in walker {
        let entry = entry
            .with_context(|| format!("Failed to read chat directory: {}", chat_dir.display()))?;

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            warn!(path = %entry.path().display(), "skipping symlinked chat file");
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        if files.len() >= MAX_CHAT_FILES {
            bail!(
                "Resource limit exceeded: {} has more than {} files",
                chat_dir.display(),
                MAX_CHAT_FILES
            );
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

/// Find GigaTribe user directories below a data root
///
/// A user directory has a numeric name and a `chat/` subdirectory. Other
/// entries (`avatars`, `blogs`, ...) are ignored.
///
/// Returns an empty Vec if the root does not exist (not an error).
pub fn discover_user_dirs(root: &Path) -> Result<Vec<UserDirInfo>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut users = Vec::new();
    let walker = WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to read data directory: {}", root.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let user_id = entry.file_name().to_string_lossy().to_string();
        if user_id.is_empty() || !user_id.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        let path = entry.into_path();
        let chat_dir = path.join(CHAT_DIR_NAME);
        if !chat_dir.is_dir() {
            continue;
        }

        let chat_files = match discover_chat_files(&chat_dir) {
            Ok(files) => files.len(),
            Err(e) => {
                warn!(user = %user_id, error = %e, "failed to list chat files");
                continue;
            }
        };
        let has_resources = path.join(RESOURCE_DIR_NAME).is_dir();
        users.push(UserDirInfo { user_id, path, chat_files, has_resources });
    }

    Ok(users)
}
