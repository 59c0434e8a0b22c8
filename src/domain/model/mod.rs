// Domain models - Core types and data structures

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Every category the segment service knows about
pub const ALL_CATEGORIES: [&str; 6] = [
    "sponsor",
    "selfpromo",
    "interaction",
    "intro",
    "outro",
    "preview",
];

/// Anything with a start and an end on the original timeline
pub trait Span {
    fn start(&self) -> f64;
    fn end(&self) -> f64;
}

/// A third-party annotated skip segment, in seconds on the original timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub category: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, category: impl Into<String>) -> Self {
        Self {
            start,
            end,
            category: category.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Finite bounds with `start <= end`; anything else never reaches the planner
    pub fn is_well_formed(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start <= self.end
    }
}

impl Span for Segment {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Union of overlapping segments together with every contributing category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedSegment {
    pub start: f64,
    pub end: f64,
    pub categories: BTreeSet<String>,
}

impl MergedSegment {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

impl Span for MergedSegment {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// A stretch of the original timeline that survives segment removal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeepInterval {
    pub orig_start: f64,
    pub orig_end: f64,
}

impl KeepInterval {
    pub fn new(orig_start: f64, orig_end: f64) -> Self {
        Self {
            orig_start,
            orig_end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.orig_end - self.orig_start
    }
}

/// One row of the remap table: a kept interval and where it lands after removal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RemapEntry {
    pub orig_start: f64,
    pub orig_end: f64,
    pub new_start: f64,
}

/// Final window handed to the trim command
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutWindow {
    pub start: f64,
    pub end: f64,
}

impl CutWindow {
    /// Build a window, rejecting anything with `end <= start`
    pub fn new(start: f64, end: f64) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidTimeRange(format!(
                "end ({:.3}s) must be after start ({:.3}s)",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for CutWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s → {:.3}s", self.start, self.end)
    }
}

/// How the final trim is performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CutMode {
    /// Snap to keyframes and stream copy (fast)
    Keyframes,
    /// Exact timestamps with a full re-encode (slow)
    Precise,
}

impl CutMode {
    pub fn parse(mode_str: &str) -> Result<Self, DomainError> {
        match mode_str.trim().to_lowercase().as_str() {
            "keyframes" | "keyframe" | "copy" => Ok(CutMode::Keyframes),
            "precise" | "reencode" => Ok(CutMode::Precise),
            other => Err(DomainError::BadArgs(format!(
                "Invalid cut mode: {}. Valid modes: keyframes, precise",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CutMode::Keyframes => "keyframes",
            CutMode::Precise => "precise",
        }
    }
}

/// Sponsor handling preset: which categories the downloader removes and which it only marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SponsorPolicy {
    Default,
    Moderate,
    Aggressive,
    Conservative,
    Minimal,
    Disabled,
}

impl SponsorPolicy {
    pub fn parse(policy_str: &str) -> Result<Self, DomainError> {
        match policy_str.trim().to_lowercase().as_str() {
            "default" => Ok(SponsorPolicy::Default),
            "moderate" => Ok(SponsorPolicy::Moderate),
            "aggressive" => Ok(SponsorPolicy::Aggressive),
            "conservative" => Ok(SponsorPolicy::Conservative),
            "minimal" => Ok(SponsorPolicy::Minimal),
            "disabled" | "off" | "none" => Ok(SponsorPolicy::Disabled),
            other => Err(DomainError::BadArgs(format!(
                "Invalid sponsorblock policy: {}. Valid policies: default, moderate, aggressive, conservative, minimal, disabled",
                other
            ))),
        }
    }

    /// Categories stripped from the file during download
    pub fn remove_categories(&self) -> Vec<&'static str> {
        match self {
            SponsorPolicy::Default => vec!["sponsor", "interaction", "selfpromo"],
            SponsorPolicy::Moderate => vec!["sponsor", "interaction", "outro"],
            SponsorPolicy::Aggressive => ALL_CATEGORIES.to_vec(),
            SponsorPolicy::Conservative => vec!["sponsor", "outro"],
            SponsorPolicy::Minimal => vec!["sponsor"],
            SponsorPolicy::Disabled => vec![],
        }
    }

    /// Categories only marked as chapters
    pub fn mark_categories(&self) -> Vec<&'static str> {
        match self {
            SponsorPolicy::Default => vec!["intro", "preview", "outro"],
            SponsorPolicy::Moderate => vec!["selfpromo", "intro", "preview"],
            SponsorPolicy::Aggressive => vec![],
            SponsorPolicy::Conservative => vec!["interaction", "selfpromo", "intro", "preview"],
            SponsorPolicy::Minimal => vec!["selfpromo", "interaction", "intro", "outro", "preview"],
            SponsorPolicy::Disabled => vec![],
        }
    }

    pub fn removes_anything(&self) -> bool {
        !self.remove_categories().is_empty()
    }
}

/// Video codec used by the precise cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VideoCodec {
    H264,
    H265,
}

impl VideoCodec {
    pub fn parse(codec_str: &str) -> Result<Self, DomainError> {
        match codec_str.trim().to_lowercase().as_str() {
            "h264" | "avc" => Ok(VideoCodec::H264),
            "h265" | "hevc" => Ok(VideoCodec::H265),
            other => Err(DomainError::BadArgs(format!(
                "Invalid codec: {}. Valid codecs: h264, h265",
                other
            ))),
        }
    }
}

/// Encoder quality preset for the precise cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QualityPreset {
    Balanced,
    High,
}

impl QualityPreset {
    pub fn parse(quality_str: &str) -> Result<Self, DomainError> {
        match quality_str.trim().to_lowercase().as_str() {
            "balanced" => Ok(QualityPreset::Balanced),
            "high" | "high_quality" => Ok(QualityPreset::High),
            other => Err(DomainError::BadArgs(format!(
                "Invalid quality preset: {}. Valid presets: balanced, high",
                other
            ))),
        }
    }

    /// (crf, encoder preset)
    pub fn crf_and_preset(&self) -> (&'static str, &'static str) {
        match self {
            QualityPreset::Balanced => ("16", "slow"),
            QualityPreset::High => ("14", "slower"),
        }
    }
}

/// Lifecycle events exposed to hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    Start,
    Success,
    Failure,
}

impl HookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::Start => "start",
            HookEvent::Success => "success",
            HookEvent::Failure => "failure",
        }
    }
}

/// Append-only list of human-readable lines describing a run.
///
/// Every line is also emitted as a tracing event so it shows up in the
/// structured log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::info!(target: "skipcut::run", "{}", line);
        self.lines.push(line);
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            self.push(line);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests;
