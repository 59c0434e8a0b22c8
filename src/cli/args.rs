//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Where segments come from: fetched for a URL or read from a JSON file
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SegmentInput {
    /// Video URL or id to fetch segments for
    #[arg(long)]
    pub url: Option<String>,

    /// JSON file with segments (`[{start, end, category}]` or a skipSegments answer)
    #[arg(long)]
    pub segments_file: Option<PathBuf>,
}

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Video URL
    pub url: String,

    /// Section start (SS, MM:SS or HH:MM:SS)
    #[arg(short, long)]
    pub start: Option<String>,

    /// Section end (SS, MM:SS or HH:MM:SS)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Cut mode: keyframes (fast, stream copy) or precise (re-encode)
    #[arg(long, default_value = "keyframes")]
    pub mode: String,

    /// Sponsor policy: default, moderate, aggressive, conservative, minimal, disabled
    #[arg(long, default_value = "default")]
    pub sponsorblock: String,

    /// Output name without extension (default: video title)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Folder below the videos folder
    #[arg(long)]
    pub subfolder: Option<String>,

    /// Subtitle languages, comma separated
    #[arg(long, value_delimiter = ',')]
    pub subs: Vec<String>,

    /// Keep subtitles as separate files
    #[arg(long)]
    pub no_embed_subs: bool,

    /// Do not embed chapters
    #[arg(long)]
    pub no_chapters: bool,

    /// Video codec for precise cuts
    #[arg(long, default_value = "h264")]
    pub codec: String,

    /// Quality preset for precise cuts: balanced or high
    #[arg(long, default_value = "balanced")]
    pub quality: String,

    /// Explicit downloader format id
    #[arg(long)]
    pub format: Option<String>,

    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the segments command
#[derive(Args, Debug)]
pub struct SegmentsArgs {
    /// Video URL or id
    pub url: String,

    /// Widen every segment by this many seconds before merging
    #[arg(long, default_value_t = 0.0)]
    pub margin: f64,

    /// Categories to fetch, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub segments: SegmentInput,

    /// Requested start
    #[arg(short, long)]
    pub start: String,

    /// Requested end
    #[arg(short, long)]
    pub end: String,

    /// Cut mode: keyframes or precise
    #[arg(long, default_value = "keyframes")]
    pub mode: String,

    /// Sponsor policy deciding which categories are removed
    #[arg(long, default_value = "default")]
    pub sponsorblock: String,

    /// Keyframe timestamps (JSON array or whitespace separated seconds)
    #[arg(long)]
    pub keyframes_file: Option<PathBuf>,

    /// Widen every segment by this many seconds before merging
    #[arg(long, default_value_t = 0.0)]
    pub margin: f64,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the remap command
#[derive(Args, Debug)]
pub struct RemapArgs {
    #[command(flatten)]
    pub segments: SegmentInput,

    /// Duration of the original video
    #[arg(long)]
    pub duration: String,

    /// Start on the original timeline
    #[arg(short, long)]
    pub start: String,

    /// End on the original timeline
    #[arg(short, long)]
    pub end: String,

    /// Sponsor policy deciding which categories were removed
    #[arg(long, default_value = "default")]
    pub sponsorblock: String,

    /// Widen every segment by this many seconds before merging
    #[arg(long, default_value_t = 0.0)]
    pub margin: f64,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
