//! Progress parsing for external tool output

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DOWNLOAD_PROGRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[download\]\s+(\d{1,3}\.\d+)%\s+of\s+([\d.]+\w+)\s+at\s+([\d.]+\w+/s)\s+ETA\s+(\d{2}:\d{2})",
    )
    .expect("download progress regex")
});
static FRAGMENT_PROGRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[download\]\s+Got fragment\s+(\d+)\s+of\s+(\d+)").expect("fragment regex")
});
static GENERIC_PERCENTAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}(?:\.\d+)?)%").expect("percentage regex"));

/// Progress information extracted from one output line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ProgressUpdate {
    /// Downloader progress with size, speed and ETA
    Download {
        percent: f64,
        size: String,
        speed: String,
        eta: String,
    },
    /// Fragmented download
    Fragments { current: u64, total: u64 },
    /// Any other percentage, clamped to 0-100
    Percent(f64),
}

impl ProgressUpdate {
    /// Whole percentage, if it can be computed
    pub fn percent(&self) -> Option<u32> {
        match self {
            ProgressUpdate::Download { percent, .. } => Some(*percent as u32),
            ProgressUpdate::Fragments { current, total } => {
                if *total == 0 {
                    None
                } else {
                    Some((current * 100 / total) as u32)
                }
            }
            ProgressUpdate::Percent(p) => Some(*p as u32),
        }
    }

    /// Minimum change in percent before this kind of update is reported again
    fn report_step(&self) -> u32 {
        match self {
            ProgressUpdate::Download { .. } => 1,
            _ => 5,
        }
    }
}

/// Phase guessed from a free-form output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClippingPhase {
    Downloading,
    Merging,
    Cutting,
    Encoding,
}

/// Parse a downloader or transcoder output line
pub fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    if let Some(caps) = DOWNLOAD_PROGRESS.captures(line) {
        if let Ok(percent) = caps[1].parse::<f64>() {
            return Some(ProgressUpdate::Download {
                percent,
                size: caps[2].to_string(),
                speed: caps[3].to_string(),
                eta: caps[4].to_string(),
            });
        }
    }

    if let Some(caps) = FRAGMENT_PROGRESS.captures(line) {
        if let (Ok(current), Ok(total)) = (caps[1].parse::<u64>(), caps[2].parse::<u64>()) {
            return Some(ProgressUpdate::Fragments { current, total });
        }
    }

    // other [download] lines carry percentages that are not progress
    if line.contains("download") {
        return None;
    }
    GENERIC_PERCENTAGE
        .captures(line)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .map(|p| ProgressUpdate::Percent(p.clamp(0.0, 100.0)))
}

/// Guess what the tool is doing from a line without a percentage
pub fn classify_line(line: &str) -> Option<ClippingPhase> {
    let lower = line.to_lowercase();

    if contains_any(&lower, &["merging", "muxing", "combining"]) {
        Some(ClippingPhase::Merging)
    } else if contains_any(&lower, &["ffmpeg -i", "cutting at", "trimming video", "extracting clip"]) {
        Some(ClippingPhase::Cutting)
    } else if contains_any(&lower, &["converting", "encoding", "re-encoding"]) {
        Some(ClippingPhase::Encoding)
    } else if contains_any(&lower, &["downloading", "fetching", "[download]"]) {
        Some(ClippingPhase::Downloading)
    } else {
        None
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Throttles progress reports so the log is not flooded
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last_percent: u32,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `update` and return its percent if it moved far enough to report
    pub fn observe(&mut self, update: &ProgressUpdate) -> Option<u32> {
        let percent = update.percent()?;
        if percent.abs_diff(self.last_percent) >= update.report_step() {
            self.last_percent = percent;
            Some(percent)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.last_percent = 0;
    }
}
