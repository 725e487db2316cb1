use std::fmt;
use std::path::Path;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use futures_core::Stream;

use crate::frame::{DetectError, DetectResult, DetectionFrame};

/// Minimum detector confidence for a box to be counted when the caller does
/// not override it.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Ordered, single-pass, non-restartable sequence of per-frame detection
/// results. Backends produce it lazily; consumers that stop polling (and drop
/// the stream) must cause the backend to stop decoding further frames.
pub type DetectionStream = Pin<Box<dyn Stream<Item = DetectResult<DetectionFrame>> + Send>>;

pub type DynDetector = Arc<dyn Detector>;

/// Capability seam for the external object-detection model.
///
/// For an image input the returned stream yields exactly one element. A
/// stream that yields an `Err` aborts the submission; the error is always
/// decode-level (`DetectError::MediaDecode`).
pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, input: &Path, confidence_threshold: f32) -> DetectResult<DetectionStream>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mock,
}

impl FromStr for Backend {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(Backend::Mock),
            other => Err(DetectError::configuration(format!(
                "unknown backend '{other}'"
            ))),
        }
    }
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Mock => "mock",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compiled_backends() -> Vec<Backend> {
    let mut backends = Vec::new();
    #[cfg(feature = "backend-mock")]
    {
        backends.push(Backend::Mock);
    }
    backends
}

#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub backend: Backend,
}

impl Default for Configuration {
    fn default() -> Self {
        let backend = compiled_backends()
            .into_iter()
            .next()
            .unwrap_or(Backend::Mock);
        Self { backend }
    }
}

impl Configuration {
    pub fn available_backends() -> Vec<Backend> {
        compiled_backends()
    }

    pub fn create_detector(&self) -> DetectResult<DynDetector> {
        match self.backend {
            Backend::Mock => {
                #[cfg(feature = "backend-mock")]
                {
                    Ok(Arc::new(crate::backends::mock::MockDetector::default()))
                }
                #[cfg(not(feature = "backend-mock"))]
                {
                    Err(DetectError::unsupported("mock"))
                }
            }
        }
    }
}
