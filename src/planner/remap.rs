//! Post-hoc time remapping across removed intervals
//!
//! When segments are cut out of an already downloaded file, every timestamp on
//! the original timeline has to be re-expressed on the shortened one. The
//! remap table holds one row per kept interval together with the amount of
//! kept content that precedes it.

use tracing::debug;

use crate::domain::model::{KeepInterval, RemapEntry, Span};

/// Complement of `segments` within `[0, total_duration)`.
///
/// Segments may be unsorted and may overlap; each is clamped to the timeline
/// first. A non-positive duration yields no intervals.
pub fn invert_segments<S: Span>(segments: &[S], total_duration: f64) -> Vec<KeepInterval> {
    if total_duration <= 0.0 {
        return Vec::new();
    }

    let mut bounds: Vec<(f64, f64)> = segments.iter().map(|s| (s.start(), s.end())).collect();
    bounds.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut keep = Vec::new();
    let mut cursor = 0.0_f64;
    for (start, end) in bounds {
        let start = start.max(0.0);
        let end = end.min(total_duration);
        if start > cursor {
            keep.push(KeepInterval::new(cursor, start));
        }
        cursor = cursor.max(end);
    }

    if cursor < total_duration {
        keep.push(KeepInterval::new(cursor, total_duration));
    }
    keep
}

/// Lookup table mapping original positions onto the shortened timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRemap {
    table: Vec<RemapEntry>,
}

impl TimeRemap {
    /// Map an original timestamp onto the shortened timeline.
    ///
    /// A timestamp inside a removed region lands on the start of the next kept
    /// interval. Past the last kept interval the result is that interval's
    /// `new_start`, not its end.
    pub fn remap(&self, t: f64) -> f64 {
        let last = match self.table.last() {
            Some(last) => last,
            None => return 0.0,
        };

        for entry in &self.table {
            if t < entry.orig_start {
                return entry.new_start;
            }
            if t <= entry.orig_end {
                return entry.new_start + (t - entry.orig_start);
            }
        }
        last.new_start
    }

    pub fn table(&self) -> &[RemapEntry] {
        &self.table
    }

    /// Total duration of content that survives removal
    pub fn total_kept(&self) -> f64 {
        self.table
            .last()
            .map(|e| e.new_start + (e.orig_end - e.orig_start))
            .unwrap_or(0.0)
    }

    /// Borrow the remapper as a plain function
    pub fn as_fn(&self) -> impl Fn(f64) -> f64 + '_ {
        move |t| self.remap(t)
    }

    /// Remap both bounds of a window, see [`remap_interval`]
    pub fn remap_window(&self, start: f64, end: f64) -> (f64, f64) {
        remap_interval(start, end, self.as_fn())
    }
}

/// Build the remap table for `segments` removed from a `total_duration` timeline
pub fn build_remap<S: Span>(segments: &[S], total_duration: f64) -> TimeRemap {
    let keep = invert_segments(segments, total_duration);

    let mut table = Vec::with_capacity(keep.len());
    let mut kept_so_far = 0.0;
    for interval in keep {
        table.push(RemapEntry {
            orig_start: interval.orig_start,
            orig_end: interval.orig_end,
            new_start: kept_so_far,
        });
        kept_so_far += interval.duration();
    }

    debug!(
        "Built remap table: {} kept intervals, {:.3}s of {:.3}s kept",
        table.len(),
        kept_so_far,
        total_duration
    );
    TimeRemap { table }
}

/// Apply `remap` to both bounds; a window that collapses into one removed
/// region comes back zero-length instead of inverted
pub fn remap_interval<F>(start: f64, end: f64, remap: F) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    let new_start = remap(start);
    let new_end = remap(end);
    if new_end < new_start {
        (new_start, new_start)
    } else {
        (new_start, new_end)
    }
}
