//! Segment merging

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::model::{MergedSegment, Segment};

/// Merges overlapping or touching skip segments into a minimal covering set
pub struct SegmentMerger;

impl SegmentMerger {
    /// Merge `segments` after widening each one by `margin` seconds on both sides.
    ///
    /// The input is left untouched. Output is sorted by start and pairwise
    /// non-overlapping; each merged entry carries every contributing category.
    pub fn merge(segments: &[Segment], margin: f64) -> Vec<MergedSegment> {
        let mut expanded: Vec<(f64, f64, &str)> = segments
            .iter()
            .map(|s| {
                (
                    (s.start - margin).max(0.0),
                    s.end + margin,
                    s.category.as_str(),
                )
            })
            .collect();

        // sort_by is stable: equal starts keep their input order
        expanded.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut merged: Vec<MergedSegment> = Vec::with_capacity(expanded.len());
        for (start, end, category) in expanded {
            match merged.last_mut() {
                Some(current) if start <= current.end => {
                    current.end = current.end.max(end);
                    current.categories.insert(category.to_string());
                }
                _ => {
                    let mut categories = BTreeSet::new();
                    categories.insert(category.to_string());
                    merged.push(MergedSegment {
                        start,
                        end,
                        categories,
                    });
                }
            }
        }

        debug!(
            "Merged {} segments into {} (margin {:.3}s)",
            segments.len(),
            merged.len(),
            margin
        );
        merged
    }

    /// Turn merged entries back into plain segments, joining categories with `+`
    pub fn flatten(merged: &[MergedSegment]) -> Vec<Segment> {
        merged
            .iter()
            .map(|m| {
                let category = m
                    .categories
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("+");
                Segment::new(m.start, m.end, category)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, category: &str) -> Segment {
        Segment::new(start, end, category)
    }

    #[test]
    fn test_merge_empty() {
        assert!(SegmentMerger::merge(&[], 0.0).is_empty());
    }

    #[test]
    fn test_merge_overlapping_and_touching() {
        let segments = vec![
            seg(30.0, 40.0, "outro"),
            seg(10.0, 20.0, "sponsor"),
            seg(15.0, 25.0, "selfpromo"),
            seg(25.0, 28.0, "interaction"),
        ];
        let merged = SegmentMerger::merge(&segments, 0.0);

        assert_eq!(merged.len(), 2);
        assert_eq!((merged[0].start, merged[0].end), (10.0, 28.0));
        assert_eq!(
            merged[0].categories.iter().cloned().collect::<Vec<_>>(),
            vec!["interaction", "selfpromo", "sponsor"]
        );
        assert_eq!((merged[1].start, merged[1].end), (30.0, 40.0));
    }

    #[test]
    fn test_merge_contained_segment_keeps_outer_end() {
        let merged = SegmentMerger::merge(&[seg(0.0, 100.0, "sponsor"), seg(10.0, 20.0, "intro")], 0.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].end, 100.0);
        assert_eq!(merged[0].categories.len(), 2);
    }

    #[test]
    fn test_merge_margin_joins_and_clamps() {
        let segments = vec![seg(0.5, 5.0, "intro"), seg(6.0, 9.0, "sponsor")];
        let merged = SegmentMerger::merge(&segments, 1.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start, 0.0);
        assert_eq!(merged[0].end, 10.0);
    }

    #[test]
    fn test_merge_does_not_mutate_input() {
        let segments = vec![seg(20.0, 30.0, "sponsor"), seg(0.0, 5.0, "intro")];
        let before = segments.clone();
        let _ = SegmentMerger::merge(&segments, 2.0);
        assert_eq!(segments, before);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let segments = vec![
            seg(50.0, 60.0, "sponsor"),
            seg(5.0, 12.0, "intro"),
            seg(11.0, 14.0, "selfpromo"),
            seg(70.5, 71.25, "preview"),
        ];
        let once = SegmentMerger::merge(&segments, 0.0);
        let twice = SegmentMerger::merge(&SegmentMerger::flatten(&once), 0.0);

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
        }
    }

    #[test]
    fn test_merge_equal_starts_accumulate_categories() {
        let merged = SegmentMerger::merge(&[seg(10.0, 12.0, "b"), seg(10.0, 15.0, "a")], 0.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].end, 15.0);
        assert!(merged[0].categories.contains("a"));
        assert!(merged[0].categories.contains("b"));
    }
}
