//! Domain types shared across the detection pipeline.
//!
//! Keep this module backend-agnostic: every detector backend and every
//! pipeline stage speaks in terms of [`DetectionFrame`] and [`DetectError`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use image::RgbImage;
use serde::Serialize;
use thiserror::Error;

pub type DetectResult<T> = Result<T, DetectError>;

/// Axis-aligned detection box in pixel coordinates with the detector's
/// reported confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub score: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32, score: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score,
        }
    }
}

/// One processed input frame: the number of boxes at or above the confidence
/// threshold plus a rendering of the frame with those boxes drawn.
///
/// Immutable once produced. Downstream stages only need the count and the
/// annotated raster; box geometry stays inside the backend.
#[derive(Clone)]
pub struct DetectionFrame {
    frame_index: u64,
    box_count: usize,
    annotated: Arc<RgbImage>,
}

impl fmt::Debug for DetectionFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionFrame")
            .field("frame_index", &self.frame_index)
            .field("box_count", &self.box_count)
            .field("width", &self.annotated.width())
            .field("height", &self.annotated.height())
            .finish()
    }
}

impl DetectionFrame {
    pub fn new(frame_index: u64, box_count: usize, annotated: RgbImage) -> Self {
        Self {
            frame_index,
            box_count,
            annotated: Arc::new(annotated),
        }
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn box_count(&self) -> usize {
        self.box_count
    }

    pub fn annotated(&self) -> &RgbImage {
        &self.annotated
    }

    pub fn annotated_handle(&self) -> Arc<RgbImage> {
        Arc::clone(&self.annotated)
    }
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to decode {path}: {reason}")]
    MediaDecode { path: PathBuf, reason: String },

    #[error("backend {backend} is not supported in this build")]
    Unsupported { backend: &'static str },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DetectError {
    pub fn media_decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MediaDecode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(backend: &'static str) -> Self {
        Self::Unsupported { backend }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
