//! Clipping strategy implementation

use tracing::{info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{CutMode, CutWindow, RunLog, Segment};
use crate::planner::keyframes::{KeyframeLocator, KeyframeSnap};
use crate::planner::overlap::{OverlapCalculator, SponsorOverlap};
use crate::planner::segments::SegmentMerger;
use crate::planner::{report, ClippingStrategy, CutPlan};

/// Strategy planner turning a requested window into the final cut window
pub struct CutPlanner {
    mode: CutMode,
    margin: f64,
}

impl CutPlanner {
    /// Create a new planner for the given cut mode
    pub fn new(mode: CutMode) -> Self {
        Self { mode, margin: 0.0 }
    }

    /// Widen every segment by `margin` seconds before merging
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    pub fn mode(&self) -> CutMode {
        self.mode
    }

    /// Pull the end of `[start, end)` in by the removed content it overlaps.
    ///
    /// Segments are merged first so overlapping annotations are not counted
    /// twice. A window with nothing left is an error, never clamped.
    pub fn adjust_for_sponsors(
        &self,
        start: f64,
        end: f64,
        segments: &[Segment],
        log: &mut RunLog,
    ) -> Result<SponsorOverlap, DomainError> {
        let merged = SegmentMerger::flatten(&SegmentMerger::merge(segments, self.margin));
        let overlap = OverlapCalculator::calculate(start, end, &merged);

        if overlap.has_overlap() {
            log.extend(report::describe_overlap(start, end, &overlap));
        }

        if overlap.is_window_consumed(start) {
            warn!(
                "Window {:.3}s-{:.3}s consumed by {:.3}s of removed content",
                start, end, overlap.removed
            );
            return Err(DomainError::WindowConsumed {
                start,
                end,
                removed: overlap.removed,
            });
        }

        info!(
            "Sponsor adjustment: removed {:.3}s, end {:.3}s -> {:.3}s",
            overlap.removed, end, overlap.adjusted_end
        );
        Ok(overlap)
    }

    /// Choose the window handed to the trim command.
    ///
    /// Keyframes mode snaps each endpoint to its nearest keyframe, falling back
    /// to the exact request when no keyframes are known. Precise mode keeps the
    /// exact request.
    pub fn select_window(
        &self,
        start: f64,
        end: f64,
        keyframes: &[f64],
        log: &mut RunLog,
    ) -> Result<(CutWindow, Option<KeyframeSnap>), DomainError> {
        match self.mode {
            CutMode::Keyframes => {
                let snap = KeyframeLocator::snap(keyframes, start, end);
                log.extend(report::describe_snap(&snap, keyframes));
                let window = CutWindow::new(snap.start, snap.end).map_err(|_| {
                    DomainError::InvalidTimeRange(format!(
                        "keyframe snapping collapsed {:.3}s-{:.3}s to {:.3}s-{:.3}s",
                        start, end, snap.start, snap.end
                    ))
                })?;
                Ok((window, Some(snap)))
            }
            CutMode::Precise => {
                let window = CutWindow::new(start, end)?;
                log.push(format!("Precise timestamps: {}", window));
                Ok((window, None))
            }
        }
    }

    /// Plan a cut in one go.
    ///
    /// `segments` is `None` when the sponsor policy removes nothing, in which
    /// case no adjustment happens at all.
    pub fn plan(
        &self,
        start: f64,
        end: f64,
        segments: Option<&[Segment]>,
        keyframes: &[f64],
    ) -> Result<CutPlan, DomainError> {
        info!("Planning {} cut: {:.3}s - {:.3}s", self.mode.as_str(), start, end);
        let requested = CutWindow::new(start, end)?;

        let mut log = RunLog::new();
        let sponsor = match segments {
            Some(segments) => Some(self.adjust_for_sponsors(start, end, segments, &mut log)?),
            None => None,
        };
        let adjusted_end = sponsor.as_ref().map(|s| s.adjusted_end).unwrap_or(end);

        let (window, snap) = self.select_window(requested.start, adjusted_end, keyframes, &mut log)?;
        info!("Final cut window: {}", window);

        Ok(CutPlan {
            strategy: ClippingStrategy::from(self.mode),
            requested_start: start,
            requested_end: end,
            sponsor,
            snap,
            window,
            log: log.into_lines(),
        })
    }
}
