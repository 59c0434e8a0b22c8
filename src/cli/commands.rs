//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::adapters::sponsorblock_http::parse_skip_segments;
use crate::app::{AppContainer, ClipRequest};
use crate::cli::args::{DownloadArgs, PlanArgs, RemapArgs, SegmentInput, SegmentsArgs};
use crate::domain::model::{
    CutMode, QualityPreset, RemapEntry, Segment, SponsorPolicy, VideoCodec, ALL_CATEGORIES,
};
use crate::engine::display_command;
use crate::error::{SkipCutError, SkipCutResult};
use crate::planner::{build_remap, report, CutPlanner, SegmentMerger};
use crate::ports::CancelToken;
use crate::utils::time::TimeParser;

/// Parse a user supplied time into seconds
pub fn parse_time(text: &str) -> SkipCutResult<f64> {
    TimeParser::parse(text)
        .map(|seconds| seconds as f64)
        .ok_or_else(|| SkipCutError::InvalidTimeFormat {
            time: text.to_string(),
        })
}

/// Read segments from a JSON file.
///
/// Accepts either a plain list of `{start, end, category}` objects or a raw
/// `skipSegments` answer. Inverted or non-finite entries are dropped.
pub fn load_segments_file(path: &Path) -> SkipCutResult<Vec<Segment>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    if let Ok(segments) = serde_json::from_value::<Vec<Segment>>(value.clone()) {
        let total = segments.len();
        let segments: Vec<Segment> = segments
            .into_iter()
            .filter(Segment::is_well_formed)
            .collect();
        if segments.len() < total {
            warn!(
                "Dropped {} malformed segments from {}",
                total - segments.len(),
                path.display()
            );
        }
        return Ok(segments);
    }
    if !value.is_array() {
        return Err(SkipCutError::InvalidSegmentsFile {
            path: path.display().to_string(),
            message: "expected a JSON array".to_string(),
        });
    }
    Ok(parse_skip_segments(&value))
}

/// Read ascending keyframe timestamps from a JSON array or whitespace separated numbers
pub fn load_keyframes_file(path: &Path) -> SkipCutResult<Vec<f64>> {
    let content = std::fs::read_to_string(path)?;
    let mut keyframes: Vec<f64> = match serde_json::from_str::<Vec<f64>>(&content) {
        Ok(keyframes) => keyframes,
        Err(_) => content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>().map_err(|_| SkipCutError::InvalidSegmentsFile {
                    path: path.display().to_string(),
                    message: format!("not a timestamp: {}", s),
                })
            })
            .collect::<SkipCutResult<_>>()?,
    };
    keyframes.retain(|t| t.is_finite());
    keyframes.sort_by(|a, b| a.total_cmp(b));
    Ok(keyframes)
}

async fn resolve_segments(
    input: &SegmentInput,
    categories: &[&str],
    container: &dyn AppContainer,
) -> Result<Vec<Segment>> {
    match (&input.segments_file, &input.url) {
        (Some(path), _) => {
            let segments = load_segments_file(path)
                .with_context(|| format!("Failed to load segments from {}", path.display()))?;
            Ok(segments
                .into_iter()
                .filter(|s| categories.contains(&s.category.as_str()))
                .collect())
        }
        (None, Some(url)) => Ok(container.segment_source().fetch_segments(url, categories).await),
        (None, None) => Err(anyhow::anyhow!("Either --url or --segments-file is required")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Execute the download command
pub async fn download(
    args: DownloadArgs,
    container: &dyn AppContainer,
    cancel: &CancelToken,
) -> Result<()> {
    info!("Starting download of {}", args.url);

    let request = ClipRequest {
        url: args.url,
        start: args.start,
        end: args.end,
        mode: CutMode::parse(&args.mode)?,
        policy: SponsorPolicy::parse(&args.sponsorblock)?,
        name: args.name,
        subfolder: args.subfolder,
        subtitle_langs: args
            .subs
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        embed_subs: !args.no_embed_subs,
        embed_chapters: !args.no_chapters,
        codec: VideoCodec::parse(&args.codec)?,
        quality: QualityPreset::parse(&args.quality)?,
        format_id: args.format,
        dry_run: args.dry_run,
        run_seq: 1,
    };

    let response = container
        .clip_interactor()
        .execute(request, cancel)
        .await
        .context("Download failed")?;

    if args.json {
        return print_json(&response);
    }
    if response.dry_run {
        for command in &response.commands {
            println!("{}", display_command(command));
        }
    }
    if let Some(window) = response.window {
        println!("Cut window: {}", window);
    }
    if let Some(path) = &response.output_path {
        println!("Saved: {}", path.display());
    }
    Ok(())
}

#[derive(Serialize)]
struct SegmentsOutput {
    segments: Vec<Segment>,
    merged: Vec<crate::domain::model::MergedSegment>,
}

/// Execute the segments command
pub async fn segments(args: SegmentsArgs, container: &dyn AppContainer) -> Result<()> {
    let categories: Vec<&str> = if args.categories.is_empty() {
        ALL_CATEGORIES.to_vec()
    } else {
        args.categories.iter().map(|c| c.trim()).collect()
    };

    let segments = container
        .segment_source()
        .fetch_segments(&args.url, &categories)
        .await;
    let merged = SegmentMerger::merge(&segments, args.margin);

    if args.json {
        return print_json(&SegmentsOutput { segments, merged });
    }

    for line in report::summarize_segments(&segments) {
        println!("{}", line);
    }
    if !merged.is_empty() {
        println!("Merged ({} after margin {}s):", merged.len(), args.margin);
        for m in &merged {
            println!(
                "  {} → {} [{}]",
                TimeParser::format_seconds(m.start),
                TimeParser::format_seconds(m.end),
                m.categories.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
    }
    Ok(())
}

/// Execute the plan command
pub async fn plan(args: PlanArgs, container: &dyn AppContainer) -> Result<()> {
    let start = parse_time(&args.start)?;
    let end = parse_time(&args.end)?;
    let mode = CutMode::parse(&args.mode)?;
    let policy = SponsorPolicy::parse(&args.sponsorblock)?;

    let segments = if policy.removes_anything() {
        Some(resolve_segments(&args.segments, &policy.remove_categories(), container).await?)
    } else {
        None
    };
    let keyframes = match &args.keyframes_file {
        Some(path) => load_keyframes_file(path)
            .with_context(|| format!("Failed to load keyframes from {}", path.display()))?,
        None => Vec::new(),
    };

    let plan = CutPlanner::new(mode)
        .with_margin(args.margin)
        .plan(start, end, segments.as_deref(), &keyframes)
        .context("Planning failed")?;

    if args.json {
        return print_json(&plan);
    }
    for line in &plan.log {
        println!("{}", line);
    }
    println!("Strategy: {:?}", plan.strategy);
    println!("Final window: {}", plan.window);
    Ok(())
}

#[derive(Serialize)]
struct RemapOutput {
    kept: Vec<RemapEntry>,
    total_kept: f64,
    start: f64,
    end: f64,
    new_start: f64,
    new_end: f64,
}

/// Execute the remap command
pub async fn remap(args: RemapArgs, container: &dyn AppContainer) -> Result<()> {
    let duration = parse_time(&args.duration)?;
    let start = parse_time(&args.start)?;
    let end = parse_time(&args.end)?;
    let policy = SponsorPolicy::parse(&args.sponsorblock)?;

    let segments = if policy.removes_anything() {
        resolve_segments(&args.segments, &policy.remove_categories(), container).await?
    } else {
        Vec::new()
    };
    let merged = SegmentMerger::merge(&segments, args.margin);
    let table = build_remap(&merged, duration);
    let (new_start, new_end) = table.remap_window(start, end);

    let output = RemapOutput {
        kept: table.table().to_vec(),
        total_kept: table.total_kept(),
        start,
        end,
        new_start,
        new_end,
    };
    if args.json {
        return print_json(&output);
    }

    println!("Kept intervals:");
    for entry in &output.kept {
        println!(
            "  {} → {} lands at {}",
            TimeParser::format_seconds(entry.orig_start),
            TimeParser::format_seconds(entry.orig_end),
            TimeParser::format_seconds(entry.new_start)
        );
    }
    println!("Kept duration: {}", TimeParser::format_seconds(output.total_kept));
    println!(
        "Window {} → {} becomes {} → {}",
        TimeParser::format_seconds(start),
        TimeParser::format_seconds(end),
        TimeParser::format_seconds(new_start),
        TimeParser::format_seconds(new_end)
    );
    Ok(())
}
