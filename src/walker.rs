//! Deterministic enumeration of sprite files to process.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Collect every PNG under `dir` in a stable walk order (entries sorted by
/// file name within each directory). Without `recursive` only the directory
/// itself is scanned.
pub fn collect_sprites(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_png(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}
