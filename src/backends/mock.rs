use std::path::Path;
use std::sync::Arc;

use image::{Rgb, RgbImage};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::detector::{DetectionStream, Detector};
use crate::frame::{BoundingBox, DetectResult, DetectionFrame};
use crate::render::draw_boxes;

const CHANNEL_CAPACITY: usize = 8;
const ROAD_GRAY: Rgb<u8> = Rgb([72, 72, 72]);

/// Synthetic detector backend: fabricates road-gray frames and a
/// deterministic detection pattern so the pipeline can run without a model.
///
/// The input path is ignored. A scripted box list can replace the procedural
/// pattern for exact-output tests.
#[derive(Debug, Clone)]
pub struct MockDetector {
    frame_count: usize,
    width: u32,
    height: u32,
    script: Option<Arc<Vec<Vec<BoundingBox>>>>,
}

impl Default for MockDetector {
    fn default() -> Self {
        Self {
            frame_count: 90,
            width: 640,
            height: 360,
            script: None,
        }
    }
}

impl MockDetector {
    pub fn new(frame_count: usize, width: u32, height: u32) -> Self {
        Self {
            frame_count,
            width,
            height,
            script: None,
        }
    }

    /// Replace the procedural pattern with explicit per-frame boxes; the
    /// stream length becomes the script length.
    pub fn with_script(script: Vec<Vec<BoundingBox>>) -> Self {
        Self {
            frame_count: script.len(),
            width: 640,
            height: 360,
            script: Some(Arc::new(script)),
        }
    }

    fn boxes_for(&self, index: usize) -> Vec<BoundingBox> {
        if let Some(script) = &self.script {
            return script.get(index).cloned().unwrap_or_default();
        }
        let count = index % 4;
        (0..count)
            .map(|slot| {
                let x = ((index * 23 + slot * 97) % (self.width as usize / 2)) as f32;
                let y = ((index * 13 + slot * 59) % (self.height as usize / 2)) as f32;
                // slot 0 scores 0.2 and falls below the default threshold
                let score = 0.2 + 0.2 * slot as f32;
                BoundingBox::new(x, y, 48.0, 32.0, score)
            })
            .collect()
    }

    fn generate_frame(&self, index: usize, confidence_threshold: f32) -> DetectionFrame {
        let mut raster = RgbImage::from_pixel(self.width, self.height, ROAD_GRAY);
        let boxes: Vec<BoundingBox> = self
            .boxes_for(index)
            .into_iter()
            .filter(|bbox| bbox.score >= confidence_threshold)
            .collect();
        draw_boxes(&mut raster, &boxes);
        DetectionFrame::new(index as u64, boxes.len(), raster)
    }
}

impl Detector for MockDetector {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn detect(&self, _input: &Path, confidence_threshold: f32) -> DetectResult<DetectionStream> {
        let detector = self.clone();
        let (tx, rx) = mpsc::channel::<DetectResult<DetectionFrame>>(CHANNEL_CAPACITY);
        tokio::spawn(async move {
            for index in 0..detector.frame_count {
                let frame = detector.generate_frame(index, confidence_threshold);
                if tx.send(Ok(frame)).await.is_err() {
                    // consumer hung up; stop decoding
                    break;
                }
            }
        });
        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}
