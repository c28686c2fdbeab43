//! Batch processing over a sprite directory.
//!
//! Each image is owned exclusively by one worker for the duration of its fix,
//! so files are processed in parallel with no coordination. Results are
//! collected in enumeration order, which keeps the report deterministic.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bleeder::{self, BleedOutcome, BleedSettings};
use crate::error::Result;
use crate::walker;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    pub bleed: BleedSettings,
    /// Count fix targets without modifying any file
    pub preview: bool,
    /// Descend into subdirectories
    pub recursive: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<BleedOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub directory: PathBuf,
    pub preview: bool,
    pub files: Vec<FileReport>,
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_pixels: usize,
}

/// Run the edge-bleed fix over every sprite under `dir`.
///
/// A file that fails to decode or encode is recorded on its own report entry
/// and does not stop the rest of the batch.
pub fn run_batch(dir: &Path, settings: &BatchSettings) -> Result<BatchReport> {
    let files = walker::collect_sprites(dir, settings.recursive)?;

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| match bleeder::fix_sprite(path, &settings.bleed, settings.preview) {
            Ok(outcome) => {
                log::debug!("{}: {} pixels {}", path.display(), outcome.pixels, outcome.status);
                FileReport {
                    path: path.clone(),
                    outcome: Some(outcome),
                    error: None,
                }
            }
            Err(err) => {
                log::warn!("{}: {}", path.display(), err);
                FileReport {
                    path: path.clone(),
                    outcome: None,
                    error: Some(err.to_string()),
                }
            }
        })
        .collect();

    let files_failed = reports.iter().filter(|r| r.error.is_some()).count();
    let total_pixels = reports
        .iter()
        .filter_map(|r| r.outcome)
        .map(|o| o.pixels)
        .sum();

    Ok(BatchReport {
        directory: dir.to_path_buf(),
        preview: settings.preview,
        files_processed: reports.len(),
        files_failed,
        total_pixels,
        files: reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bleeder::FixStatus;
    use image::{Rgba, RgbaImage};

    fn settings(preview: bool, recursive: bool) -> BatchSettings {
        BatchSettings {
            bleed: BleedSettings::default(),
            preview,
            recursive,
        }
    }

    fn sprite_with_halo(path: &Path) {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        img.save(path).unwrap();
    }

    fn clean_sprite(path: &Path) {
        RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 0]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_batch_totals_and_order() {
        let dir = tempfile::tempdir().unwrap();
        sprite_with_halo(&dir.path().join("a.png"));
        clean_sprite(&dir.path().join("b.png"));

        let report = run_batch(dir.path(), &settings(false, false)).unwrap();
        assert_eq!(report.files_processed, 2);
        assert_eq!(report.files_failed, 0);
        assert_eq!(report.total_pixels, 8);
        assert_eq!(report.files[0].outcome.unwrap().status, FixStatus::Fixed);
        assert_eq!(report.files[1].outcome.unwrap().status, FixStatus::Ok);
    }

    #[test]
    fn test_bad_file_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
        sprite_with_halo(&dir.path().join("ok.png"));

        let report = run_batch(dir.path(), &settings(false, false)).unwrap();
        assert_eq!(report.files_processed, 2);
        assert_eq!(report.files_failed, 1);
        assert!(report.files[0].error.is_some());
        assert_eq!(report.files[1].outcome.unwrap().pixels, 8);
    }

    #[test]
    fn test_preview_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        sprite_with_halo(&path);
        let bytes = std::fs::read(&path).unwrap();

        let report = run_batch(dir.path(), &settings(true, false)).unwrap();
        assert_eq!(report.total_pixels, 8);
        assert_eq!(report.files[0].outcome.unwrap().status, FixStatus::WouldFix);
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_recursive_batch_reaches_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("cards")).unwrap();
        sprite_with_halo(&dir.path().join("cards").join("ace.png"));

        let flat = run_batch(dir.path(), &settings(true, false)).unwrap();
        assert_eq!(flat.files_processed, 0);

        let deep = run_batch(dir.path(), &settings(true, true)).unwrap();
        assert_eq!(deep.files_processed, 1);
        assert_eq!(deep.total_pixels, 8);
    }
}
