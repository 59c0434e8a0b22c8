//! Keyframe probe command

use std::path::Path;

/// ffprobe packet listing of the first video stream as `pts_time,flags` lines
pub fn build_keyframe_probe_command(ffprobe_bin: &str, path: &Path) -> Vec<String> {
    [
        ffprobe_bin,
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_packets",
        "-show_entries",
        "packet=pts_time,flags",
        "-of",
        "csv=p=0",
    ]
    .iter()
    .map(|s| s.to_string())
    .chain(std::iter::once(path.display().to_string()))
    .collect()
}
