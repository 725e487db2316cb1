//! End-to-end submission processing: detector stream in, assembled
//! [`SubmissionResult`] out.

use std::path::Path;
use std::sync::Arc;

use futures_util::StreamExt;

use crate::detector::{DEFAULT_CONFIDENCE_THRESHOLD, Detector};
use crate::estimator;
use crate::frame::{DetectError, DetectResult};
use crate::geocode::{self, Coordinates, LocationResolver};
use crate::report::SubmissionResult;
use crate::sampler::FrameSampler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Infer the media kind from a file extension; `None` when the extension
    /// is missing or unrecognized.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "webp" | "bmp" => Some(MediaKind::Image),
            "mp4" | "mov" | "avi" | "mkv" | "webm" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub confidence_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// One submission pipeline: an injected detector and location resolver plus
/// the aggregation policy. Cheap to clone; each call owns its own state, so
/// concurrent submissions need no coordination.
#[derive(Clone)]
pub struct Pipeline {
    detector: Arc<dyn Detector>,
    resolver: Arc<dyn LocationResolver>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(detector: Arc<dyn Detector>, resolver: Arc<dyn LocationResolver>) -> Self {
        Self::with_config(detector, resolver, PipelineConfig::default())
    }

    pub fn with_config(
        detector: Arc<dyn Detector>,
        resolver: Arc<dyn LocationResolver>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            detector,
            resolver,
            config,
        }
    }

    pub async fn process(
        &self,
        input: &Path,
        kind: MediaKind,
        coordinates: Option<Coordinates>,
    ) -> DetectResult<SubmissionResult> {
        match kind {
            MediaKind::Image => self.process_image(input, coordinates).await,
            MediaKind::Video => self.process_video(input, coordinates).await,
        }
    }

    /// Single-frame path: severity is the detector's raw box count.
    pub async fn process_image(
        &self,
        input: &Path,
        coordinates: Option<Coordinates>,
    ) -> DetectResult<SubmissionResult> {
        let mut stream = self
            .detector
            .detect(input, self.config.confidence_threshold)?;
        let frame = match stream.next().await {
            Some(frame) => frame?,
            None => {
                return Err(DetectError::media_decode(
                    input,
                    "detector produced no frame for image input",
                ));
            }
        };
        drop(stream);
        let severity = estimator::estimate_image(frame.box_count());
        let address = geocode::resolve_or_placeholder(self.resolver.as_ref(), coordinates).await;
        Ok(SubmissionResult::new(
            severity,
            address,
            vec![frame],
            coordinates,
        ))
    }

    /// Video path: stride-sampled preview frames and an extrapolated
    /// severity estimate.
    pub async fn process_video(
        &self,
        input: &Path,
        coordinates: Option<Coordinates>,
    ) -> DetectResult<SubmissionResult> {
        let stream = self
            .detector
            .detect(input, self.config.confidence_threshold)?;
        let samples = FrameSampler::default().collect(stream).await?;
        let severity = estimator::estimate_video(&samples.counts);
        let address = geocode::resolve_or_placeholder(self.resolver.as_ref(), coordinates).await;
        Ok(SubmissionResult::new(
            severity,
            address,
            samples.selected,
            coordinates,
        ))
    }
}
