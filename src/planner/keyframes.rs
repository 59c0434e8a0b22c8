//! Keyframe snapping for stream-copy cuts

use serde::Serialize;
use tracing::debug;

/// A requested window and the keyframes it was snapped to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyframeSnap {
    pub requested_start: f64,
    pub requested_end: f64,
    pub start: f64,
    pub end: f64,
    /// True when no keyframes were available and the request was kept as is
    pub exact_fallback: bool,
}

impl KeyframeSnap {
    /// Absolute drift of the start point
    pub fn start_offset(&self) -> f64 {
        (self.start - self.requested_start).abs()
    }

    /// Absolute drift of the end point
    pub fn end_offset(&self) -> f64 {
        (self.end - self.requested_end).abs()
    }

    /// Signed change in clip duration caused by snapping
    pub fn duration_drift(&self) -> f64 {
        (self.end - self.start) - (self.requested_end - self.requested_start)
    }
}

/// Finds the keyframes closest to requested cut points
pub struct KeyframeLocator;

impl KeyframeLocator {
    /// Nearest keyframe to each endpoint, chosen independently.
    ///
    /// `keyframes` must be sorted ascending; on a tie the earlier keyframe
    /// wins. An empty list returns the request unchanged.
    pub fn find_nearest(keyframes: &[f64], start: f64, end: f64) -> (f64, f64) {
        if keyframes.is_empty() {
            return (start, end);
        }
        (
            Self::nearest_to(keyframes, start),
            Self::nearest_to(keyframes, end),
        )
    }

    /// Snap a window and keep the request alongside for drift reporting
    pub fn snap(keyframes: &[f64], start: f64, end: f64) -> KeyframeSnap {
        let (snapped_start, snapped_end) = Self::find_nearest(keyframes, start, end);
        let snap = KeyframeSnap {
            requested_start: start,
            requested_end: end,
            start: snapped_start,
            end: snapped_end,
            exact_fallback: keyframes.is_empty(),
        };
        debug!(
            "Snapped {:.3}s-{:.3}s to {:.3}s-{:.3}s ({} keyframes)",
            start,
            end,
            snap.start,
            snap.end,
            keyframes.len()
        );
        snap
    }

    /// Mean distance between consecutive keyframes, if there are at least two
    pub fn average_interval(keyframes: &[f64]) -> Option<f64> {
        if keyframes.len() < 2 {
            return None;
        }
        let span: f64 = keyframes.windows(2).map(|w| w[1] - w[0]).sum();
        Some(span / (keyframes.len() - 1) as f64)
    }

    fn nearest_to(keyframes: &[f64], target: f64) -> f64 {
        let mut best = target;
        let mut best_diff = f64::INFINITY;
        for &kf in keyframes {
            let diff = (kf - target).abs();
            if diff < best_diff {
                best_diff = diff;
                best = kf;
            }
        }
        best
    }
}
