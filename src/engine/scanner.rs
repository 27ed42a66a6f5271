//! File system scanner for discovering .mad descriptor files

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{MadDbError, Result};

const MAD_SUFFIX: &str = ".mad";

/// Scan a directory recursively for all `*.mad` files (case-insensitive suffix).
///
/// Symlinks are not followed. The result is fully materialized and sorted by
/// lowercased file name, so processing order never depends on the order the
/// filesystem hands entries back.
pub fn find_mad_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(MadDbError::Config(format!(
            "MAD directory does not exist: {}",
            dir.display()
        )));
    }

    if !dir.is_dir() {
        return Err(MadDbError::Config(format!(
            "MAD path is not a directory: {}",
            dir.display()
        )));
    }

    info!("Scanning for .mad files in: {}", dir.display());

    let mut mad_files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        // Symlinked files count; symlinked directories are never descended.
        if entry.file_type().is_dir() || !entry.path().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(MAD_SUFFIX) {
            debug!("Found MAD file: {}", entry.path().display());
            mad_files.push(entry.into_path());
        }
    }

    // Ties on the lowercased name fall back to the full path to stay total.
    mad_files.sort_by_cached_key(|path| (sort_key(path), path.clone()));

    info!("Scan complete: found {} .mad files", mad_files.len());

    Ok(mad_files)
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
