//! Pothole detection-result aggregation pipeline.
//!
//! Takes per-frame output from an external object detector and turns it into
//! a bounded set of annotated preview frames plus a single severity estimate
//! per submission, with optional reverse geocoding of the submission
//! coordinates. The detector and the geocoder are collaborators behind the
//! [`Detector`] and [`LocationResolver`] traits; everything here is the
//! aggregation policy and its plumbing.

pub mod backends;
pub mod cli;
pub mod detector;
pub mod estimator;
pub mod frame;
pub mod geocode;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod sampler;
pub mod settings;

pub use detector::{
    Backend, Configuration, DEFAULT_CONFIDENCE_THRESHOLD, DetectionStream, Detector, DynDetector,
};
pub use estimator::EXTRAPOLATION_FACTOR;
pub use frame::{BoundingBox, DetectError, DetectResult, DetectionFrame};
pub use geocode::{
    Coordinates, GeocodeError, LOCATION_UNAVAILABLE, LocationResolver, NominatimResolver,
    NoopResolver,
};
pub use pipeline::{MediaKind, Pipeline, PipelineConfig};
pub use report::{ExportError, SubmissionResult};
pub use sampler::{FrameSampler, SAMPLE_STRIDE, SELECTED_FRAME_CAP, SampleSet};
