// Clip interactor - Orchestrates the download, sponsor adjustment and cut use case

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapters::toml_config::AppConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::copy::build_copy_cut_command;
use crate::engine::download::{build_download_command, build_title_command, DownloadOptions};
use crate::engine::reencode::build_reencode_cut_command;
use crate::engine::{EngineConfig, SubtitleInput};
use crate::planner::{report, CutPlanner, KeyframeSnap};
use crate::ports::*;
use crate::utils::path::PathUtils;
use crate::utils::time::TimeParser;
use crate::utils::video_id::{resolve_video_id, sanitize_url};

/// How long the title lookup may take
const TITLE_TIMEOUT: Duration = Duration::from_secs(60);

/// A download request as given on the command line
#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub url: String,
    /// Raw start text (`SS`, `MM:SS` or `HH:MM:SS`)
    pub start: Option<String>,
    /// Raw end text
    pub end: Option<String>,
    pub mode: CutMode,
    pub policy: SponsorPolicy,
    /// Output name without extension; the video title when absent
    pub name: Option<String>,
    /// Folder below the videos folder
    pub subfolder: Option<String>,
    pub subtitle_langs: Vec<String>,
    pub embed_subs: bool,
    pub embed_chapters: bool,
    pub codec: VideoCodec,
    pub quality: QualityPreset,
    pub format_id: Option<String>,
    /// Build the commands without running anything
    pub dry_run: bool,
    pub run_seq: u64,
}

impl ClipRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            start: None,
            end: None,
            mode: CutMode::Keyframes,
            policy: SponsorPolicy::Default,
            name: None,
            subfolder: None,
            subtitle_langs: Vec::new(),
            embed_subs: true,
            embed_chapters: true,
            codec: VideoCodec::H264,
            quality: QualityPreset::Balanced,
            format_id: None,
            dry_run: false,
            run_seq: 0,
        }
    }

    pub fn with_window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct ClipResponse {
    /// Final file in the destination folder; `None` for a dry run
    pub output_path: Option<PathBuf>,
    /// Window handed to the trim command, when a cut was made
    pub window: Option<CutWindow>,
    /// Seconds of removed content inside the requested window
    pub sponsor_removed: f64,
    pub snap: Option<KeyframeSnap>,
    /// Every external command, in execution order
    pub commands: Vec<Vec<String>>,
    pub log: Vec<String>,
    pub dry_run: bool,
}

/// Parse one endpoint, warning about text that is not a time
fn parse_endpoint(label: &str, text: Option<&str>, log: &mut RunLog) -> Option<f64> {
    let text = text.map(str::trim).filter(|t| !t.is_empty())?;
    match TimeParser::parse(text) {
        Some(seconds) => Some(seconds as f64),
        None => {
            log.push(format!("Ignoring invalid {} time: {}", label, text));
            None
        }
    }
}

/// Requested window when both ends are present and ordered
pub fn requested_window(
    start: Option<&str>,
    end: Option<&str>,
    log: &mut RunLog,
) -> Option<(f64, f64)> {
    let start = parse_endpoint("start", start, log);
    let end = parse_endpoint("end", end, log);
    match (start, end) {
        (Some(start), Some(end)) if end > start => Some((start, end)),
        (Some(start), Some(end)) => {
            log.push(format!(
                "End ({}) is not after start ({}), downloading without cut",
                TimeParser::format_seconds(end),
                TimeParser::format_seconds(start)
            ));
            None
        }
        _ => None,
    }
}

/// Interactor for the download-and-cut use case
pub struct ClipInteractor {
    segment_source: Arc<dyn SegmentSourcePort>,
    keyframe_probe: Arc<dyn KeyframeProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    hook_port: Arc<dyn HookPort>,
    config: AppConfig,
}

/// State shared by the steps of one run
struct Run {
    log: RunLog,
    hook: HookContext,
    commands: Vec<Vec<String>>,
}

impl ClipInteractor {
    /// Create new clip interactor with injected ports
    pub fn new(
        segment_source: Arc<dyn SegmentSourcePort>,
        keyframe_probe: Arc<dyn KeyframeProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        hook_port: Arc<dyn HookPort>,
        config: AppConfig,
    ) -> Self {
        Self {
            segment_source,
            keyframe_probe,
            execute_port,
            hook_port,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    async fn fail(&self, run: &mut Run, status: &str, error: DomainError) -> DomainError {
        warn!("Run failed ({}): {}", status, error);
        run.log.push(format!("Failed: {}", error));
        run.hook.with_status(status);
        self.hook_port.fire(HookEvent::Failure, &run.hook).await;
        error
    }

    /// Folder below `root` for the optional subfolder
    fn nested(root: &Path, subfolder: Option<&str>) -> PathBuf {
        match subfolder.map(str::trim).filter(|s| !s.is_empty() && *s != "/") {
            Some(sub) => sub
                .split(|c: char| c == '/' || c == '\\')
                .filter(|part| !part.is_empty())
                .fold(root.to_path_buf(), |dir, part| {
                    dir.join(PathUtils::sanitize_filename(part))
                }),
            None => root.to_path_buf(),
        }
    }

    /// Output base name: explicit name, video title, video id, then `video`
    async fn base_name(&self, request: &ClipRequest, url: &str, run: &mut Run) -> String {
        if let Some(name) = request.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return PathUtils::sanitize_filename(name);
        }

        let fallback = resolve_video_id(url).unwrap_or_else(|| "video".to_string());
        if request.dry_run {
            return fallback;
        }

        let argv = build_title_command(&self.config.ytdlp_bin, url, &self.config.cookie_source());
        match self.execute_port.capture(&argv, TITLE_TIMEOUT).await {
            Ok(output) if output.success() && !output.stdout.trim().is_empty() => {
                let title = output
                    .stdout
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .unwrap_or_default();
                run.log.push(format!("Video title: {}", title));
                PathUtils::sanitize_filename(title)
            }
            Ok(output) => {
                warn!("Title lookup failed: {}", output.stderr.trim());
                fallback
            }
            Err(e) => {
                warn!("Title lookup failed: {}", e);
                fallback
            }
        }
    }

    /// Execute the download, optionally followed by a cut
    pub async fn execute(
        &self,
        request: ClipRequest,
        cancel: &CancelToken,
    ) -> Result<ClipResponse, DomainError> {
        let url = sanitize_url(&request.url);
        if url.is_empty() {
            return Err(DomainError::BadArgs("A video URL is required".to_string()));
        }

        let mut run = Run {
            log: RunLog::new(),
            hook: HookContext::new(),
            commands: Vec::new(),
        };
        let window = requested_window(request.start.as_deref(), request.end.as_deref(), &mut run.log);

        let dest_dir = Self::nested(&self.config.videos_folder, request.subfolder.as_deref());
        let tmp_dir = Self::nested(&self.config.tmp_dir(), request.subfolder.as_deref());
        if !request.dry_run {
            std::fs::create_dir_all(&dest_dir)?;
            std::fs::create_dir_all(&tmp_dir)?;
        }
        run.log.push(format!("Destination folder: {}", dest_dir.display()));
        run.log.push(format!("Temporary folder: {}", tmp_dir.display()));

        let base_name = self.base_name(&request, &url, &mut run).await;
        info!("Processing {} as '{}'", url, base_name);

        run.hook
            .set("URL", url.as_str())
            .set("FILENAME", base_name.as_str())
            .set("DEST_DIR", dest_dir.display().to_string())
            .set("TMP_DIR", tmp_dir.display().to_string())
            .set("RUN_SEQ", request.run_seq.to_string());

        // informational lookup; the removed subset drives the adjustment
        let segments = self
            .segment_source
            .fetch_segments(&url, &ALL_CATEGORIES)
            .await;
        run.log.extend(report::summarize_segments(&segments));

        let planner = CutPlanner::new(request.mode);
        let mut adjusted = window;
        let mut sponsor_removed = 0.0;
        if let Some((start, end)) = window {
            if request.policy.removes_anything() {
                let remove = request.policy.remove_categories();
                let removed_segments: Vec<Segment> = segments
                    .iter()
                    .filter(|s| remove.contains(&s.category.as_str()))
                    .cloned()
                    .collect();
                match planner.adjust_for_sponsors(start, end, &removed_segments, &mut run.log) {
                    Ok(overlap) => {
                        sponsor_removed = overlap.removed;
                        adjusted = Some((start, overlap.adjusted_end));
                    }
                    Err(e) => return Err(self.fail(&mut run, "window_consumed", e).await),
                }
            }
        }

        match adjusted {
            Some((start, end)) => {
                run.hook
                    .set("START_SEC", (start as i64).to_string())
                    .set("END_SEC", (end as i64).to_string());
                run.log.push(format!(
                    "Full download, then {} cut of {} → {}",
                    request.mode.as_str(),
                    TimeParser::format_seconds(start),
                    TimeParser::format_seconds(end)
                ));
            }
            None => run.log.push("Full download without cut".to_string()),
        }

        let options = DownloadOptions {
            ytdlp_bin: self.config.ytdlp_bin.clone(),
            url: url.clone(),
            base_name: base_name.clone(),
            tmp_dir: tmp_dir.clone(),
            format_id: request.format_id.clone(),
            embed_chapters: request.embed_chapters,
            embed_subs: request.embed_subs,
            subtitle_langs: request.subtitle_langs.clone(),
            will_cut: adjusted.is_some(),
            policy: request.policy,
            cookies: self.config.cookie_source(),
        };
        let download = build_download_command(&options);
        run.commands.push(download.clone());

        if request.dry_run {
            return Ok(self.dry_run(&request, &options, adjusted, sponsor_removed, run));
        }

        run.hook.with_status("start");
        self.hook_port.fire(HookEvent::Start, &run.hook).await;

        match self.execute_port.run(&download, cancel).await {
            Ok(ExitOutcome::Cancelled) => {
                PathUtils::cleanup_extras(&tmp_dir, &base_name);
                return Err(self.fail(&mut run, "cancelled", DomainError::Cancelled).await);
            }
            Ok(ExitOutcome::Failed(code)) => {
                // the downloader may still have produced a usable file
                warn!("Downloader exited with code {}", code);
            }
            Ok(ExitOutcome::Success) => {}
            Err(e) => return Err(self.fail(&mut run, "download_failed", e).await),
        }

        let downloaded = match PathUtils::find_downloaded_file(&tmp_dir, &base_name) {
            Some(path) => path,
            None => {
                let error = DomainError::ProcessFailed(format!(
                    "No downloaded file for '{}' in {}",
                    base_name,
                    tmp_dir.display()
                ));
                return Err(self.fail(&mut run, "download_failed", error).await);
            }
        };
        run.log.push(format!("Downloaded: {}", downloaded.display()));

        let mut final_window = None;
        let mut snap = None;
        let final_source = match adjusted {
            Some((start, end)) => {
                match self
                    .cut(&request, &planner, &downloaded, &tmp_dir, &base_name, start, end, cancel, &mut run)
                    .await
                {
                    Ok((path, window, cut_snap)) => {
                        final_window = Some(window);
                        snap = cut_snap;
                        path
                    }
                    Err(e) => {
                        let status = if e == DomainError::Cancelled {
                            PathUtils::cleanup_extras(&tmp_dir, &base_name);
                            "cancelled"
                        } else {
                            "cut_failed"
                        };
                        return Err(self.fail(&mut run, status, e).await);
                    }
                }
            }
            None => downloaded,
        };

        PathUtils::cleanup_extras(&tmp_dir, &base_name);

        let output_path = match PathUtils::move_into(&final_source, &dest_dir) {
            Ok(path) => path,
            Err(e) => return Err(self.fail(&mut run, "move_failed", e).await),
        };
        run.log.push(format!("File ready: {}", output_path.display()));

        run.hook.set("OUTPUT_PATH", output_path.display().to_string());
        run.hook.with_status("success");
        self.hook_port.fire(HookEvent::Success, &run.hook).await;

        Ok(ClipResponse {
            output_path: Some(output_path),
            window: final_window,
            sponsor_removed,
            snap,
            commands: run.commands,
            log: run.log.into_lines(),
            dry_run: false,
        })
    }

    /// Probe, snap, trim and rename; returns the renamed cut file
    #[allow(clippy::too_many_arguments)]
    async fn cut(
        &self,
        request: &ClipRequest,
        planner: &CutPlanner,
        source: &Path,
        tmp_dir: &Path,
        base_name: &str,
        start: f64,
        end: f64,
        cancel: &CancelToken,
        run: &mut Run,
    ) -> Result<(PathBuf, CutWindow, Option<KeyframeSnap>), DomainError> {
        let cut_output = tmp_dir.join(format!("{}_cut.mp4", base_name));
        if cut_output.exists() {
            std::fs::remove_file(&cut_output)?;
        }

        let keyframes = match request.mode {
            CutMode::Keyframes => self.keyframe_probe.probe_keyframes(source).await,
            CutMode::Precise => Vec::new(),
        };
        let (window, snap) = planner.select_window(start, end, &keyframes, &mut run.log)?;

        let subtitles: Vec<SubtitleInput> = request
            .subtitle_langs
            .iter()
            .filter_map(|lang| {
                PathUtils::find_subtitle_file(tmp_dir, base_name, lang).map(|path| SubtitleInput {
                    lang: lang.clone(),
                    path,
                })
            })
            .collect();
        if !subtitles.is_empty() {
            run.log.push(format!("Cutting {} subtitle track(s) alongside", subtitles.len()));
        }

        let config = EngineConfig::new(&self.config.ffmpeg_bin, source, &cut_output, window)
            .with_subtitles(subtitles)
            .with_encoding(request.codec, request.quality);
        let argv = match request.mode {
            CutMode::Keyframes => build_copy_cut_command(&config),
            CutMode::Precise => build_reencode_cut_command(&config),
        };
        run.commands.push(argv.clone());

        match self.execute_port.run(&argv, cancel).await? {
            ExitOutcome::Cancelled => return Err(DomainError::Cancelled),
            ExitOutcome::Failed(code) => {
                return Err(DomainError::ProcessFailed(format!(
                    "Cut exited with code {}",
                    code
                )))
            }
            ExitOutcome::Success => {}
        }
        if !cut_output.is_file() {
            return Err(DomainError::ProcessFailed(format!(
                "Cut produced no file at {}",
                cut_output.display()
            )));
        }

        let final_name = tmp_dir.join(format!("{}.mp4", base_name));
        if final_name.exists() {
            std::fs::remove_file(&final_name)?;
        }
        std::fs::rename(&cut_output, &final_name)?;
        if source != final_name && source.exists() {
            if let Err(e) = std::fs::remove_file(source) {
                warn!("Could not remove uncut source {}: {}", source.display(), e);
            }
        }
        debug!("Cut ready at {}", final_name.display());

        Ok((final_name, window, snap))
    }

    /// Commands a real run would execute; the cut uses the exact window
    /// because keyframes are only known after the download
    fn dry_run(
        &self,
        request: &ClipRequest,
        options: &DownloadOptions,
        adjusted: Option<(f64, f64)>,
        sponsor_removed: f64,
        mut run: Run,
    ) -> ClipResponse {
        let mut window = None;
        if let Some((start, end)) = adjusted {
            match CutWindow::new(start, end) {
                Ok(cut) => {
                    let source = options
                        .tmp_dir
                        .join(format!("{}.{}", options.base_name, options.merge_format()));
                    let output = options.tmp_dir.join(format!("{}_cut.mp4", options.base_name));
                    let config = EngineConfig::new(&self.config.ffmpeg_bin, source, output, cut)
                        .with_encoding(request.codec, request.quality);
                    run.commands.push(match request.mode {
                        CutMode::Keyframes => build_copy_cut_command(&config),
                        CutMode::Precise => build_reencode_cut_command(&config),
                    });
                    if request.mode == CutMode::Keyframes {
                        run.log.push("Keyframes are probed after download; cut shown with exact timestamps".to_string());
                    }
                    window = Some(cut);
                }
                Err(e) => warn!("Dry run window rejected: {}", e),
            }
        }
        run.log.push(format!("Dry run: {} command(s) not executed", run.commands.len()));

        ClipResponse {
            output_path: None,
            window,
            sponsor_removed,
            snap: None,
            commands: run.commands,
            log: run.log.into_lines(),
            dry_run: true,
        }
    }
}
