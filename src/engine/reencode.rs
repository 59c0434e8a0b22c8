//! Re-encoding clipping implementation for frame-accurate video clipping

use tracing::info;

use crate::domain::model::VideoCodec;
use crate::engine::{cut_inputs, cut_mappings, cut_trailer, EngineConfig};

const OUTPUT_FRAME_RATE: &str = "24000/1001";

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Video encoder arguments for the configured codec and quality
pub fn video_encoder_args(codec: VideoCodec, crf: &str, preset: &str) -> Vec<String> {
    match codec {
        VideoCodec::H264 => strings(&[
            "-c:v",
            "libx264",
            "-preset",
            preset,
            "-crf",
            crf,
            "-r",
            OUTPUT_FRAME_RATE,
            "-pix_fmt",
            "yuv420p",
            "-fps_mode",
            "cfr",
            "-x264-params",
            "aq-mode=2:aq-strength=1.1:psy-rd=1.00:0.15:deblock=0,0",
        ]),
        // 10-bit HEVC tagged for Apple players
        VideoCodec::H265 => strings(&[
            "-c:v",
            "libx265",
            "-pix_fmt",
            "yuv420p10le",
            "-preset",
            preset,
            "-crf",
            crf,
            "-x265-params",
            "aq-mode=2:aq-strength=1.1:psy-rd=2.0:deblock=0,0",
            "-tag:v",
            "hvc1",
            "-fps_mode",
            "cfr",
            "-r",
            OUTPUT_FRAME_RATE,
        ]),
    }
}

/// Build the exact trim with a full re-encode
pub fn build_reencode_cut_command(config: &EngineConfig) -> Vec<String> {
    let (crf, preset) = config.quality.crf_and_preset();
    info!(
        "Re-encoding with {:?}: preset={}, crf={}",
        config.codec, preset, crf
    );

    let mut argv = cut_inputs(config);
    argv.extend(cut_mappings(config));
    argv.extend(video_encoder_args(config.codec, crf, preset));
    argv.extend(strings(&["-c:a", "aac", "-b:a", "192k", "-c:s", "mov_text"]));
    argv.extend(cut_trailer(config));
    argv
}
