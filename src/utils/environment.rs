use std::path::PathBuf;

use anyhow::{Context, Result};

/// Location of GigaTribe data below the platform's local data directory
const GIGATRIBE_DATA_PATH: [&str; 2] = ["Shalsoft", "GigaTribe"];

/// Get the GigaTribe data directory (`%LOCALAPPDATA%\Shalsoft\GigaTribe` on Windows)
///
/// It holds one directory per account, named after the numeric user id.
pub fn get_gigatribe_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().context("Failed to get platform local data directory")?;
    Ok(GIGATRIBE_DATA_PATH.iter().fold(data_dir, |path, part| path.join(part)))
}
