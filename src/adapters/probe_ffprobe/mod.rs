//! FFprobe adapter for keyframe extraction
//!
//! Lists the packets of the first video stream and keeps the ones flagged as
//! keyframes. Any failure yields an empty list so the cut falls back to exact
//! timestamps.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::engine::probe::build_keyframe_probe_command;
use crate::ports::KeyframeProbePort;

/// Default probe timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// FFprobe-based keyframe probe
pub struct FFprobeAdapter {
    ffprobe_bin: String,
    timeout: Duration,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(ffprobe_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffprobe_bin: ffprobe_bin.into(),
            timeout,
        }
    }
}

/// Keyframe timestamps from `pts_time,flags` lines, sorted ascending
pub fn parse_keyframe_csv(output: &str) -> Vec<f64> {
    let mut keyframes: Vec<f64> = output
        .lines()
        .filter_map(|line| {
            let mut parts = line.trim().split(',');
            let pts = parts.next()?;
            let flags = parts.next()?;
            if !flags.contains('K') {
                return None;
            }
            pts.trim().parse::<f64>().ok().filter(|t| t.is_finite())
        })
        .collect();
    keyframes.sort_by(|a, b| a.total_cmp(b));
    keyframes
}

#[async_trait]
impl KeyframeProbePort for FFprobeAdapter {
    async fn probe_keyframes(&self, file_path: &Path) -> Vec<f64> {
        let argv = build_keyframe_probe_command(&self.ffprobe_bin, file_path);
        info!("Extracting keyframes from {}", file_path.display());
        debug!("Probe command: {:?}", argv);

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Could not run {}: {}", self.ffprobe_bin, e);
                return Vec::new();
            }
            Err(_) => {
                warn!(
                    "Keyframe extraction timed out after {}s",
                    self.timeout.as_secs()
                );
                return Vec::new();
            }
        };

        if !output.status.success() {
            warn!(
                "Keyframe extraction failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Vec::new();
        }

        let keyframes = parse_keyframe_csv(&String::from_utf8_lossy(&output.stdout));
        info!("Found {} keyframes", keyframes.len());
        keyframes
    }
}
