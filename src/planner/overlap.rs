//! Sponsor overlap against a requested window
//!
//! The downloader strips sponsor segments while fetching, so the file on disk
//! is already shorter than the original. A window requested on the original
//! timeline keeps its start and loses as much runway at the end as the
//! removed content it overlapped.

use serde::Serialize;

use crate::domain::model::Segment;

/// One segment's share of the requested window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentOverlap {
    pub category: String,
    pub start: f64,
    pub end: f64,
}

impl SegmentOverlap {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Result of subtracting removed content from a requested window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SponsorOverlap {
    /// Seconds of removed content inside the window
    pub removed: f64,
    /// `end - removed`, on the shortened timeline
    pub adjusted_end: f64,
    /// Contributing segments, in input order
    pub overlaps: Vec<SegmentOverlap>,
}

impl SponsorOverlap {
    /// Nothing is left between `start` and the adjusted end
    pub fn is_window_consumed(&self, start: f64) -> bool {
        self.adjusted_end <= start
    }

    pub fn has_overlap(&self) -> bool {
        self.removed > 0.0
    }

    pub fn removed_whole_seconds(&self) -> i64 {
        self.removed as i64
    }

    pub fn adjusted_end_whole_seconds(&self) -> i64 {
        self.adjusted_end as i64
    }
}

/// Computes how much of a window the downloader will strip
pub struct OverlapCalculator;

impl OverlapCalculator {
    /// Sum the overlap of every segment with `[start, end)` and pull the end in by it.
    ///
    /// Segments outside the window contribute nothing. `start` is never moved.
    /// Segments are expected to be disjoint; overlapping input is counted twice.
    pub fn calculate(start: f64, end: f64, segments: &[Segment]) -> SponsorOverlap {
        let mut removed = 0.0;
        let mut overlaps = Vec::new();

        for segment in segments {
            let overlap_start = start.max(segment.start);
            let overlap_end = end.min(segment.end);
            if overlap_start < overlap_end {
                removed += overlap_end - overlap_start;
                overlaps.push(SegmentOverlap {
                    category: segment.category.clone(),
                    start: overlap_start,
                    end: overlap_end,
                });
            }
        }

        SponsorOverlap {
            removed,
            adjusted_end: end - removed,
            overlaps,
        }
    }
}
