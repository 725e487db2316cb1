use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use image::RgbImage;

use pothole_guard::{
    Configuration, Coordinates, DetectError, DetectResult, DetectionFrame, DetectionStream,
    Detector, GeocodeError, LOCATION_UNAVAILABLE, LocationResolver, MediaKind, Pipeline,
    SELECTED_FRAME_CAP,
};

/// Detector stub yielding one frame per scripted box count, tracking how
/// many elements the pipeline pulled from the stream.
struct ScriptedDetector {
    counts: Vec<usize>,
    pulled: Arc<AtomicUsize>,
}

impl ScriptedDetector {
    fn new(counts: Vec<usize>) -> Self {
        Self {
            counts,
            pulled: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn pulled(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.pulled)
    }
}

impl Detector for ScriptedDetector {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn detect(&self, _input: &Path, _confidence_threshold: f32) -> DetectResult<DetectionStream> {
        let frames: Vec<DetectResult<DetectionFrame>> = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &count)| Ok(DetectionFrame::new(i as u64, count, RgbImage::new(4, 4))))
            .collect();
        let pulled = Arc::clone(&self.pulled);
        Ok(Box::pin(stream::iter(frames).inspect(move |_| {
            pulled.fetch_add(1, Ordering::SeqCst);
        })))
    }
}

/// Detector stub that cannot decode its input.
struct BrokenDetector;

impl Detector for BrokenDetector {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn detect(&self, input: &Path, _confidence_threshold: f32) -> DetectResult<DetectionStream> {
        Err(DetectError::media_decode(input, "unsupported codec"))
    }
}

struct FixedResolver {
    calls: AtomicUsize,
}

impl FixedResolver {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LocationResolver for FixedResolver {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn resolve(&self, _coords: Coordinates) -> Result<String, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("12 Example Road".to_owned())
    }
}

struct FailingResolver;

#[async_trait]
impl LocationResolver for FailingResolver {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn resolve(&self, coords: Coordinates) -> Result<String, GeocodeError> {
        Err(GeocodeError::NoResult { coords })
    }
}

fn pipeline(detector: impl Detector + 'static, resolver: Arc<dyn LocationResolver>) -> Pipeline {
    Pipeline::new(Arc::new(detector), resolver)
}

#[tokio::test(flavor = "multi_thread")]
async fn image_severity_equals_raw_box_count() {
    let pipeline = pipeline(ScriptedDetector::new(vec![7]), FixedResolver::new());
    let result = pipeline
        .process_image(Path::new("road.jpg"), None)
        .await
        .unwrap();
    assert_eq!(result.severity_estimate, 7);
    assert_eq!(result.selected_images.len(), 1);
    assert_eq!(result.address, LOCATION_UNAVAILABLE);
}

#[tokio::test(flavor = "multi_thread")]
async fn image_decode_failure_aborts_the_submission() {
    let pipeline = pipeline(BrokenDetector, FixedResolver::new());
    let err = pipeline
        .process_image(Path::new("corrupt.jpg"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DetectError::MediaDecode { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_image_stream_is_a_decode_failure() {
    let pipeline = pipeline(ScriptedDetector::new(Vec::new()), FixedResolver::new());
    let err = pipeline
        .process_image(Path::new("empty.jpg"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DetectError::MediaDecode { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn video_estimate_uses_only_stride_frames() {
    // stride frames 0, 15 and 30 carry 4, 6 and 5 boxes; everything between
    // carries 9 and must not influence the average
    let mut counts = vec![9; 100];
    counts[0] = 4;
    counts[15] = 6;
    counts[30] = 5;
    let detector = ScriptedDetector::new(counts);
    let pulled = detector.pulled();
    let pipeline = pipeline(detector, FixedResolver::new());
    let result = pipeline
        .process_video(Path::new("road.mp4"), None)
        .await
        .unwrap();
    // avg 5.0 scaled by 5
    assert_eq!(result.severity_estimate, 25);
    assert_eq!(result.selected_images.len(), SELECTED_FRAME_CAP);
    let indices: Vec<u64> = result
        .selected_images
        .iter()
        .map(|f| f.frame_index())
        .collect();
    assert_eq!(indices, vec![0, 15, 30]);
    // early exit: indices 0..=30 were pulled, nothing after
    assert_eq!(pulled.load(Ordering::SeqCst), 31);
}

#[tokio::test(flavor = "multi_thread")]
async fn video_without_detections_estimates_zero() {
    let pipeline = pipeline(ScriptedDetector::new(vec![0; 60]), FixedResolver::new());
    let result = pipeline
        .process_video(Path::new("road.mp4"), None)
        .await
        .unwrap();
    assert_eq!(result.severity_estimate, 0);
    assert_eq!(result.selected_images.len(), SELECTED_FRAME_CAP);
}

#[tokio::test(flavor = "multi_thread")]
async fn short_video_keeps_fewer_frames() {
    let pipeline = pipeline(ScriptedDetector::new(vec![1, 2]), FixedResolver::new());
    let result = pipeline
        .process_video(Path::new("clip.mp4"), None)
        .await
        .unwrap();
    assert_eq!(result.selected_images.len(), 1);
    // only frame 0 is stride-matched: avg 1.0 scaled by 5
    assert_eq!(result.severity_estimate, 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn resolver_success_populates_the_address() {
    let resolver = FixedResolver::new();
    let pipeline = pipeline(ScriptedDetector::new(vec![3]), resolver.clone());
    let coords = Coordinates::new(48.1, 11.5);
    let result = pipeline
        .process_image(Path::new("road.jpg"), Some(coords))
        .await
        .unwrap();
    assert_eq!(result.address, "12 Example Road");
    assert_eq!(result.coordinates, Some(coords));
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn resolver_failure_never_escapes_the_pipeline() {
    let pipeline = pipeline(ScriptedDetector::new(vec![2; 40]), Arc::new(FailingResolver));
    let result = pipeline
        .process_video(Path::new("road.mp4"), Some(Coordinates::new(1.0, 2.0)))
        .await
        .unwrap();
    assert_eq!(result.address, LOCATION_UNAVAILABLE);
    assert!(result.severity_estimate > 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn resolver_is_skipped_without_coordinates() {
    let resolver = FixedResolver::new();
    let pipeline = pipeline(ScriptedDetector::new(vec![1]), resolver.clone());
    let result = pipeline
        .process_image(Path::new("road.jpg"), None)
        .await
        .unwrap();
    assert_eq!(result.address, LOCATION_UNAVAILABLE);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[cfg(feature = "backend-mock")]
#[tokio::test(flavor = "multi_thread")]
async fn mock_backend_runs_end_to_end() {
    let detector = Configuration::default().create_detector().unwrap();
    let pipeline = Pipeline::new(detector, Arc::new(FailingResolver));
    let result = pipeline
        .process(Path::new("ignored.mp4"), MediaKind::Video, None)
        .await
        .unwrap();
    assert!(result.selected_images.len() <= SELECTED_FRAME_CAP);
    assert_eq!(result.address, LOCATION_UNAVAILABLE);

    let dir = tempfile::tempdir().unwrap();
    let written = pothole_guard::report::export_images(&result, dir.path()).unwrap();
    assert_eq!(written.len(), result.selected_images.len());
    for path in written {
        assert!(path.is_file());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn mid_stream_decode_error_propagates() {
    struct HalfBrokenDetector;

    impl Detector for HalfBrokenDetector {
        fn name(&self) -> &'static str {
            "half-broken"
        }

        fn detect(
            &self,
            input: &Path,
            _confidence_threshold: f32,
        ) -> DetectResult<DetectionStream> {
            let items: Vec<DetectResult<DetectionFrame>> = vec![
                Ok(DetectionFrame::new(0, 1, RgbImage::new(4, 4))),
                Err(DetectError::media_decode(input, "truncated packet")),
            ];
            Ok(Box::pin(stream::iter(items)))
        }
    }

    let pipeline = pipeline(HalfBrokenDetector, FixedResolver::new());
    let err = pipeline
        .process_video(Path::new("clip.mp4"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DetectError::MediaDecode { .. }));
}
