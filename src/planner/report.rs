//! Human-readable run log lines for segments, sponsor adjustment and snapping

use std::collections::BTreeMap;

use crate::domain::model::Segment;
use crate::planner::keyframes::{KeyframeLocator, KeyframeSnap};
use crate::planner::overlap::SponsorOverlap;
use crate::utils::time::TimeParser;

fn hms(seconds: f64) -> String {
    TimeParser::format_seconds(seconds)
}

/// Count, per-category breakdown, total duration and one line per segment
pub fn summarize_segments(segments: &[Segment]) -> Vec<String> {
    if segments.is_empty() {
        return vec!["No skip segments found for this video".to_string()];
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total = 0.0;
    for segment in segments {
        *counts.entry(segment.category.as_str()).or_insert(0) += 1;
        total += segment.end - segment.start;
    }

    let breakdown = counts
        .iter()
        .map(|(category, count)| format!("{}: {}", category, count))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        format!("Found {} skip segments", segments.len()),
        format!("Categories found: {}", breakdown),
        format!("Total sponsor content: {}", hms(total)),
    ];
    lines.extend(segments.iter().map(|s| {
        format!(
            "  {} {} → {} ({}s)",
            s.category,
            hms(s.start),
            hms(s.end),
            (s.end - s.start) as i64
        )
    }));
    lines
}

/// Before/after summary of the sponsor adjustment of `[start, end)`
pub fn describe_overlap(start: f64, end: f64, overlap: &SponsorOverlap) -> Vec<String> {
    if !overlap.has_overlap() {
        return vec![format!(
            "No removed content between {} and {}",
            hms(start),
            hms(end)
        )];
    }

    let mut lines = vec![format!(
        "Removed content inside {} → {}:",
        hms(start),
        hms(end)
    )];
    for o in &overlap.overlaps {
        lines.push(format!(
            "  {} {} → {} ({}s)",
            o.category,
            hms(o.start),
            hms(o.end),
            o.duration() as i64
        ));
    }
    lines.push(format!(
        "Total removed: {}s",
        overlap.removed_whole_seconds()
    ));
    lines.push(format!(
        "Requested section: {} → {} ({}s)",
        hms(start),
        hms(end),
        (end - start) as i64
    ));
    lines.push(format!(
        "Cutting shortened file until {} (originally {})",
        hms(overlap.adjusted_end),
        hms(end)
    ));
    lines.push(format!(
        "Final duration: {}s",
        (overlap.adjusted_end - start) as i64
    ));
    lines
}

/// Selected keyframes and how far each endpoint moved
pub fn describe_snap(snap: &KeyframeSnap, keyframes: &[f64]) -> Vec<String> {
    if snap.exact_fallback {
        return vec![
            "No keyframes available, using exact timestamps".to_string(),
            format!("Exact timestamps: {:.3}s → {:.3}s", snap.start, snap.end),
        ];
    }

    let mut lines = vec![
        format!("Keyframes timestamps: {:.3}s → {:.3}s", snap.start, snap.end),
        format!(
            "Original request: {:.3}s → {:.3}s",
            snap.requested_start, snap.requested_end
        ),
        format!(
            "Offset: start={:.3}s, end={:.3}s",
            snap.start_offset(),
            snap.end_offset()
        ),
    ];
    if let Some(interval) = KeyframeLocator::average_interval(keyframes) {
        lines.push(format!(
            "{} keyframes, average interval {:.3}s",
            keyframes.len(),
            interval
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::overlap::OverlapCalculator;

    #[test]
    fn test_summarize_segments() {
        let segments = vec![
            Segment::new(10.0, 20.0, "sponsor"),
            Segment::new(100.0, 130.0, "sponsor"),
            Segment::new(0.0, 5.0, "intro"),
        ];
        let lines = summarize_segments(&segments);
        assert_eq!(lines[0], "Found 3 skip segments");
        assert_eq!(lines[1], "Categories found: intro: 1, sponsor: 2");
        assert_eq!(lines[2], "Total sponsor content: 00:00:45");
        assert_eq!(lines.len(), 6);
        assert!(lines[4].contains("00:01:40"));
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize_segments(&[]).len(), 1);
    }

    #[test]
    fn test_describe_overlap() {
        let overlap = OverlapCalculator::calculate(0.0, 30.0, &[Segment::new(10.0, 20.0, "sponsor")]);
        let lines = describe_overlap(0.0, 30.0, &overlap);
        assert!(lines.iter().any(|l| l == "Total removed: 10s"));
        assert!(lines.iter().any(|l| l.contains("until 00:00:20 (originally 00:00:30)")));
        assert_eq!(lines.last().unwrap(), "Final duration: 20s");
    }

    #[test]
    fn test_describe_snap() {
        let keyframes = [0.0, 5.0, 10.0, 15.0];
        let snap = KeyframeLocator::snap(&keyframes, 4.0, 11.0);
        let lines = describe_snap(&snap, &keyframes);
        assert_eq!(lines[0], "Keyframes timestamps: 5.000s → 10.000s");
        assert_eq!(lines[2], "Offset: start=1.000s, end=1.000s");
        assert_eq!(lines[3], "4 keyframes, average interval 5.000s");

        let fallback = KeyframeLocator::snap(&[], 4.0, 11.0);
        assert!(describe_snap(&fallback, &[])[0].contains("exact"));
    }
}
