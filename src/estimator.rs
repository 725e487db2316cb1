//! Severity estimation: one integer pothole count per submission.

/// Multiplier scaling a sparse per-frame average up to a whole-video
/// estimate.
pub const EXTRAPOLATION_FACTOR: f64 = 5.0;

/// Image path: the raw box count, no averaging or scaling.
pub fn estimate_image(box_count: usize) -> u64 {
    box_count as u64
}

/// Video path: mean of the non-zero sampled counts, scaled by the
/// extrapolation factor and rounded up. An empty sample set estimates 0.
///
/// The mean is a true quotient; rounding happens once, after scaling.
pub fn estimate_video(counts: &[usize]) -> u64 {
    if counts.is_empty() {
        return 0;
    }
    let sum: usize = counts.iter().sum();
    let avg = sum as f64 / counts.len() as f64;
    (avg * EXTRAPOLATION_FACTOR).ceil() as u64
}
