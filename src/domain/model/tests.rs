// Unit tests for domain models

use super::*;

#[test]
fn test_segment_well_formed() {
    assert!(Segment::new(10.0, 20.0, "sponsor").is_well_formed());
    assert!(Segment::new(5.0, 5.0, "sponsor").is_well_formed());
    assert!(!Segment::new(50.0, 10.0, "sponsor").is_well_formed());
    assert!(!Segment::new(f64::NAN, 10.0, "sponsor").is_well_formed());
    assert!(!Segment::new(0.0, f64::INFINITY, "sponsor").is_well_formed());
}

#[test]
fn test_segment_duration_never_negative() {
    assert_eq!(Segment::new(10.0, 20.0, "intro").duration(), 10.0);
    assert_eq!(Segment::new(20.0, 10.0, "intro").duration(), 0.0);
}

#[test]
fn test_cut_window_rejects_inverted_and_empty() {
    assert!(CutWindow::new(5.0, 10.0).is_ok());
    assert!(matches!(
        CutWindow::new(10.0, 10.0),
        Err(DomainError::InvalidTimeRange(_))
    ));
    assert!(CutWindow::new(10.0, 4.0).is_err());
}

#[test]
fn test_cut_window_display() {
    let window = CutWindow::new(4.0, 11.5).unwrap();
    assert_eq!(window.to_string(), "4.000s → 11.500s");
    assert_eq!(window.duration(), 7.5);
}

#[test]
fn test_cut_mode_parse() {
    assert_eq!(CutMode::parse("keyframes").unwrap(), CutMode::Keyframes);
    assert_eq!(CutMode::parse("PRECISE").unwrap(), CutMode::Precise);
    assert!(CutMode::parse("hybrid").is_err());
}

#[test]
fn test_sponsor_policy_presets() {
    let default = SponsorPolicy::parse("default").unwrap();
    assert_eq!(
        default.remove_categories(),
        vec!["sponsor", "interaction", "selfpromo"]
    );
    assert_eq!(default.mark_categories(), vec!["intro", "preview", "outro"]);

    let aggressive = SponsorPolicy::parse("Aggressive").unwrap();
    assert_eq!(aggressive.remove_categories().len(), ALL_CATEGORIES.len());
    assert!(aggressive.mark_categories().is_empty());

    let disabled = SponsorPolicy::parse("disabled").unwrap();
    assert!(!disabled.removes_anything());
    assert!(disabled.mark_categories().is_empty());

    assert!(SponsorPolicy::parse("everything").is_err());
}

#[test]
fn test_quality_preset_values() {
    assert_eq!(QualityPreset::Balanced.crf_and_preset(), ("16", "slow"));
    assert_eq!(QualityPreset::High.crf_and_preset(), ("14", "slower"));
}

#[test]
fn test_run_log_is_append_only_and_ordered() {
    let mut log = RunLog::new();
    assert!(log.is_empty());
    log.push("first");
    log.extend(vec!["second".to_string(), "third".to_string()]);
    assert_eq!(log.len(), 3);
    assert_eq!(log.lines(), &["first", "second", "third"]);
}

#[test]
fn test_domain_error_status_tags() {
    let err = DomainError::WindowConsumed {
        start: 0.0,
        end: 30.0,
        removed: 30.0,
    };
    assert_eq!(err.status(), "window_consumed");
    assert!(err.to_string().contains("fully consumed"));
    assert_eq!(DomainError::Cancelled.status(), "cancelled");
}
