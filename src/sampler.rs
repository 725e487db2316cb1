//! Frame sampling for the video path: bound the preview and the per-frame
//! statistics against an unbounded detection stream.

use futures_util::StreamExt;

use crate::detector::DetectionStream;
use crate::frame::{DetectResult, DetectionFrame};

/// Interval between decoded-frame indices considered for sampling.
pub const SAMPLE_STRIDE: u64 = 15;

/// Maximum number of annotated frames kept for the preview.
pub const SELECTED_FRAME_CAP: usize = 3;

/// Output of one sampling pass.
///
/// `counts` holds the box counts of considered frames that actually detected
/// something (never zero entries); `selected` holds the kept frames in
/// stream order, at most the configured cap.
#[derive(Debug, Default)]
pub struct SampleSet {
    pub counts: Vec<usize>,
    pub selected: Vec<DetectionFrame>,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameSampler {
    stride: u64,
    capacity: usize,
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self {
            stride: SAMPLE_STRIDE,
            capacity: SELECTED_FRAME_CAP,
        }
    }
}

impl FrameSampler {
    pub fn new(stride: u64, capacity: usize) -> Self {
        Self {
            stride: stride.max(1),
            capacity,
        }
    }

    /// Drain the detection stream until the preview cap is reached or the
    /// stream ends.
    ///
    /// Only frames whose zero-based index is a multiple of the stride are
    /// considered. A considered frame contributes its box count to `counts`
    /// when at least one box was detected, and is kept in `selected`
    /// regardless of its count while the cap allows. Once the cap is reached
    /// no further element is pulled; dropping the stream signals the backend
    /// to stop decoding.
    pub async fn collect(&self, mut stream: DetectionStream) -> DetectResult<SampleSet> {
        let mut set = SampleSet::default();
        if self.capacity == 0 {
            return Ok(set);
        }
        let mut index: u64 = 0;
        while let Some(item) = stream.next().await {
            let frame = item?;
            if index % self.stride == 0 {
                if frame.box_count() > 0 {
                    set.counts.push(frame.box_count());
                }
                set.selected.push(frame);
                if set.selected.len() >= self.capacity {
                    break;
                }
            }
            index = index.saturating_add(1);
        }
        Ok(set)
    }
}
