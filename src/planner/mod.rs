//! Cut planning: segment merging, remapping, sponsor overlap and keyframe snapping

use serde::Serialize;

use crate::domain::model::{CutMode, CutWindow};

pub mod keyframes;
pub mod overlap;
pub mod remap;
pub mod report;
pub mod segments;
pub mod strategy;

pub use keyframes::{KeyframeLocator, KeyframeSnap};
pub use overlap::{OverlapCalculator, SegmentOverlap, SponsorOverlap};
pub use remap::{build_remap, invert_segments, remap_interval, TimeRemap};
pub use segments::SegmentMerger;
pub use strategy::CutPlanner;

/// Clipping strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClippingStrategy {
    /// Lossless stream copy on keyframes (fast, approximate)
    Copy,
    /// Full re-encoding (slow, exact)
    Reencode,
}

impl From<CutMode> for ClippingStrategy {
    fn from(mode: CutMode) -> Self {
        match mode {
            CutMode::Keyframes => ClippingStrategy::Copy,
            CutMode::Precise => ClippingStrategy::Reencode,
        }
    }
}

/// Cut plan information
#[derive(Debug, Clone, Serialize)]
pub struct CutPlan {
    /// Selected clipping strategy
    pub strategy: ClippingStrategy,
    /// Start requested on the original timeline
    pub requested_start: f64,
    /// End requested on the original timeline
    pub requested_end: f64,
    /// Sponsor adjustment, when removed categories were checked
    pub sponsor: Option<SponsorOverlap>,
    /// Keyframe snap, in copy mode
    pub snap: Option<KeyframeSnap>,
    /// Window handed to the trim command
    pub window: CutWindow,
    /// Run log lines produced while planning
    pub log: Vec<String>,
}

impl CutPlan {
    /// End after sponsor adjustment, before snapping
    pub fn adjusted_end(&self) -> f64 {
        self.sponsor
            .as_ref()
            .map(|s| s.adjusted_end)
            .unwrap_or(self.requested_end)
    }
}
