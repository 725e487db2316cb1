//! Submission result assembly and annotated-frame export.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use thiserror::Error;

use crate::frame::DetectionFrame;
use crate::geocode::Coordinates;

/// Final payload for one submission.
///
/// `address` is always populated, with the placeholder standing in for
/// missing or failed resolution. `coordinates` is the caller's original pair,
/// passed through unvalidated for display.
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub severity_estimate: u64,
    pub address: String,
    pub selected_images: Vec<DetectionFrame>,
    pub coordinates: Option<Coordinates>,
}

impl SubmissionResult {
    pub fn new(
        severity_estimate: u64,
        address: String,
        selected_images: Vec<DetectionFrame>,
        coordinates: Option<Coordinates>,
    ) -> Self {
        Self {
            severity_estimate,
            address,
            selected_images,
            coordinates,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Write each selected frame as a JPEG named by its frame index and return
/// the written paths in selection order.
pub fn export_images(result: &SubmissionResult, directory: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(directory).map_err(|source| ExportError::CreateDir {
        path: directory.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(result.selected_images.len());
    for frame in &result.selected_images {
        let path = directory.join(format!("frame_{:06}.jpg", frame.frame_index()));
        frame
            .annotated()
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|source| ExportError::Encode {
                path: path.clone(),
                source,
            })?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use image::RgbImage;

    use super::*;

    #[test]
    fn exports_selected_frames_by_index() {
        let result = SubmissionResult::new(
            3,
            "somewhere".to_owned(),
            vec![
                DetectionFrame::new(0, 1, RgbImage::new(8, 8)),
                DetectionFrame::new(15, 2, RgbImage::new(8, 8)),
            ],
            None,
        );
        let dir = tempfile::tempdir().unwrap();
        let written = export_images(&result, dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("frame_000000.jpg").is_file());
        assert!(dir.path().join("frame_000015.jpg").is_file());
    }

    #[test]
    fn empty_selection_exports_nothing() {
        let result = SubmissionResult::new(0, "somewhere".to_owned(), Vec::new(), None);
        let dir = tempfile::tempdir().unwrap();
        let written = export_images(&result, dir.path()).unwrap();
        assert!(written.is_empty());
    }
}
