//! External command construction for the downloader and the transcoder

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::model::{CutWindow, QualityPreset, VideoCodec};

pub mod copy;
pub mod download;
pub mod probe;
pub mod progress;
pub mod reencode;

/// A subtitle sidecar cut alongside the video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleInput {
    pub lang: String,
    pub path: PathBuf,
}

/// Clipping engine configuration
#[derive(Debug, Clone, Serialize)]
pub struct EngineConfig {
    /// Transcoder binary
    pub ffmpeg_bin: String,
    /// Downloaded source file
    pub input_path: PathBuf,
    /// Cut output file
    pub output_path: PathBuf,
    /// Final window
    pub window: CutWindow,
    /// Subtitle sidecars, first one becomes the default track
    pub subtitles: Vec<SubtitleInput>,
    /// Video codec for the precise cut
    pub codec: VideoCodec,
    /// Quality preset for the precise cut
    pub quality: QualityPreset,
}

impl EngineConfig {
    pub fn new(
        ffmpeg_bin: impl Into<String>,
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        window: CutWindow,
    ) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            input_path: input_path.into(),
            output_path: output_path.into(),
            window,
            subtitles: Vec::new(),
            codec: VideoCodec::H264,
            quality: QualityPreset::Balanced,
        }
    }

    pub fn with_subtitles(mut self, subtitles: Vec<SubtitleInput>) -> Self {
        self.subtitles = subtitles;
        self
    }

    pub fn with_encoding(mut self, codec: VideoCodec, quality: QualityPreset) -> Self {
        self.codec = codec;
        self.quality = quality;
        self
    }
}

/// Seconds as handed to `-ss`/`-to`
pub fn format_timestamp(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

/// Render an argv for logs, quoting arguments that contain spaces
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `-ss/-to -i` for the source and each subtitle, shared by both cut modes
pub(crate) fn cut_inputs(config: &EngineConfig) -> Vec<String> {
    let start = format_timestamp(config.window.start);
    let end = format_timestamp(config.window.end);

    let mut args = vec![
        config.ffmpeg_bin.clone(),
        "-y".to_string(),
        "-ss".to_string(),
        start.clone(),
        "-to".to_string(),
        end.clone(),
        "-i".to_string(),
        config.input_path.display().to_string(),
    ];

    // subtitles use the same window as the video to stay in sync
    for subtitle in &config.subtitles {
        args.extend([
            "-ss".to_string(),
            start.clone(),
            "-to".to_string(),
            end.clone(),
            "-f".to_string(),
            "srt".to_string(),
            "-i".to_string(),
            subtitle.path.display().to_string(),
        ]);
    }
    args
}

/// Stream maps: first video, any audio, every subtitle input, no cover art
pub(crate) fn cut_mappings(config: &EngineConfig) -> Vec<String> {
    let mut args = vec![
        "-map".to_string(),
        "0:v:0".to_string(),
        "-map".to_string(),
        "0:a?".to_string(),
    ];
    for index in 1..=config.subtitles.len() {
        args.push("-map".to_string());
        args.push(format!("{}:0", index));
    }
    args.push("-map".to_string());
    args.push("-0:v:m:attached_pic".to_string());
    args
}

/// Default-track metadata and the output path
pub(crate) fn cut_trailer(config: &EngineConfig) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(first) = config.subtitles.first() {
        args.extend([
            "-disposition:s:0".to_string(),
            "default".to_string(),
            "-metadata:s:s:0".to_string(),
            format!("language={}", first.lang),
        ]);
    }
    args.extend([
        "-movflags".to_string(),
        "+faststart".to_string(),
        config.output_path.display().to_string(),
    ]);
    args
}
