//! Downloader command construction

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::model::SponsorPolicy;

/// Smallest cookies file we trust, in bytes
pub const MIN_COOKIE_FILE_SIZE: u64 = 100;

/// Browsers the downloader can read cookies from
pub const SUPPORTED_BROWSERS: [&str; 9] = [
    "brave", "chrome", "chromium", "edge", "firefox", "opera", "safari", "vivaldi", "whale",
];

/// Format selection used when no explicit format id is given
pub const AUTO_FORMAT: &str = "bv*+ba/b";

const FORMAT_SORT: &str = "res:4320,fps,codec:av01,codec:vp9.2,codec:vp9,codec:h264";

/// Where the downloader gets authentication cookies from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CookieSource {
    None,
    File(PathBuf),
    Browser {
        browser: String,
        profile: Option<String>,
    },
}

pub fn is_supported_browser(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    SUPPORTED_BROWSERS.contains(&name.as_str())
}

/// A cookies file must exist and be larger than [`MIN_COOKIE_FILE_SIZE`]
pub fn is_valid_cookie_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > MIN_COOKIE_FILE_SIZE)
        .unwrap_or(false)
}

/// Cookie arguments; an unusable cookies file falls back to `--no-cookies`
pub fn cookies_args(source: &CookieSource) -> Vec<String> {
    match source {
        CookieSource::File(path) if is_valid_cookie_file(path) => {
            info!("Using cookies from file: {}", path.display());
            vec!["--cookies".to_string(), path.display().to_string()]
        }
        CookieSource::File(path) => {
            warn!(
                "Cookies file not usable, falling back to no cookies: {}",
                path.display()
            );
            vec!["--no-cookies".to_string()]
        }
        CookieSource::Browser { browser, profile } => {
            let spec = match profile.as_deref().map(str::trim) {
                Some(profile) if !profile.is_empty() => format!("{}:{}", browser, profile),
                _ => browser.clone(),
            };
            info!("Using cookies from browser: {}", spec);
            vec!["--cookies-from-browser".to_string(), spec]
        }
        CookieSource::None => vec!["--no-cookies".to_string()],
    }
}

/// SponsorBlock arguments for a policy
pub fn sponsorblock_args(policy: SponsorPolicy) -> Vec<String> {
    let remove = policy.remove_categories();
    let mark = policy.mark_categories();
    if remove.is_empty() && mark.is_empty() {
        return vec!["--no-sponsorblock".to_string()];
    }

    let mut args = Vec::new();
    if !remove.is_empty() {
        args.push("--sponsorblock-remove".to_string());
        args.push(remove.join(","));
        // keep the downloader from re-encoding around removed segments
        args.push("--no-force-keyframes-at-cuts".to_string());
    }
    if !mark.is_empty() {
        args.push("--sponsorblock-mark".to_string());
        args.push(mark.join(","));
    }
    args
}

/// `-f` value for an optional explicit format id
pub fn format_spec(format_id: Option<&str>) -> String {
    match format_id.map(str::trim) {
        Some(id) if !id.is_empty() && id != "auto" => format!("{}+ba/b", id),
        _ => AUTO_FORMAT.to_string(),
    }
}

/// Everything needed to build the download command
#[derive(Debug, Clone, Serialize)]
pub struct DownloadOptions {
    pub ytdlp_bin: String,
    pub url: String,
    /// Output file name without extension
    pub base_name: String,
    pub tmp_dir: PathBuf,
    pub format_id: Option<String>,
    pub embed_chapters: bool,
    pub embed_subs: bool,
    pub subtitle_langs: Vec<String>,
    /// A cut follows the download
    pub will_cut: bool,
    pub policy: SponsorPolicy,
    pub cookies: CookieSource,
}

impl DownloadOptions {
    /// Cutting with subtitles needs an mp4 container for `mov_text`
    pub fn merge_format(&self) -> &'static str {
        if self.will_cut && !self.subtitle_langs.is_empty() {
            "mp4"
        } else {
            "mkv"
        }
    }

    fn subtitle_args(&self) -> Vec<String> {
        if self.subtitle_langs.is_empty() {
            return Vec::new();
        }
        let mut args = vec![
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-langs".to_string(),
            self.subtitle_langs.join(","),
            "--convert-subs".to_string(),
            "srt".to_string(),
        ];
        // a cut needs separate .srt files to trim alongside the video
        if self.embed_subs && !self.will_cut {
            args.push("--embed-subs".to_string());
        } else {
            args.push("--no-embed-subs".to_string());
        }
        args
    }
}

/// Full download command; the whole video is always fetched
pub fn build_download_command(options: &DownloadOptions) -> Vec<String> {
    let mut argv: Vec<String> = vec![
        options.ytdlp_bin.clone(),
        "--newline".to_string(),
        "-o".to_string(),
        format!("{}.%(ext)s", options.base_name),
        "--paths".to_string(),
        format!("home:{}", options.tmp_dir.display()),
        "--merge-output-format".to_string(),
        options.merge_format().to_string(),
        "-f".to_string(),
        format_spec(options.format_id.as_deref()),
        "--format-sort".to_string(),
        FORMAT_SORT.to_string(),
    ];
    argv.extend(
        [
            "--embed-metadata",
            "--embed-thumbnail",
            "--no-write-thumbnail",
            "--convert-thumbnails",
            "jpg",
            "--ignore-errors",
            "--force-overwrites",
            "--concurrent-fragments",
            "1",
            "--sleep-requests",
            "1",
            "--retries",
            "10",
            "--retry-sleep",
            "2",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    argv.push(if options.embed_chapters {
        "--embed-chapters".to_string()
    } else {
        "--no-embed-chapters".to_string()
    });

    argv.extend(options.subtitle_args());
    argv.extend(sponsorblock_args(options.policy));
    argv.extend(cookies_args(&options.cookies));
    argv.push(options.url.clone());
    argv
}

/// Ask the downloader for the video title only
pub fn build_title_command(ytdlp_bin: &str, url: &str, cookies: &CookieSource) -> Vec<String> {
    let mut argv = vec![
        ytdlp_bin.to_string(),
        "--print".to_string(),
        "title".to_string(),
        "--no-download".to_string(),
    ];
    argv.extend(cookies_args(cookies));
    argv.push(url.to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options() -> DownloadOptions {
        DownloadOptions {
            ytdlp_bin: "yt-dlp".to_string(),
            url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            base_name: "clip".to_string(),
            tmp_dir: PathBuf::from("/tmp/skipcut"),
            format_id: None,
            embed_chapters: true,
            embed_subs: true,
            subtitle_langs: Vec::new(),
            will_cut: false,
            policy: SponsorPolicy::Default,
            cookies: CookieSource::None,
        }
    }

    fn has_pair(argv: &[String], flag: &str, value: &str) -> bool {
        argv.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn test_download_command_defaults() {
        let argv = build_download_command(&options());
        assert_eq!(argv[0], "yt-dlp");
        assert!(has_pair(&argv, "-o", "clip.%(ext)s"));
        assert!(has_pair(&argv, "--paths", "home:/tmp/skipcut"));
        assert!(has_pair(&argv, "--merge-output-format", "mkv"));
        assert!(has_pair(&argv, "-f", AUTO_FORMAT));
        assert!(argv.contains(&"--embed-chapters".to_string()));
        assert!(has_pair(&argv, "--sponsorblock-remove", "sponsor,interaction,selfpromo"));
        assert!(argv.contains(&"--no-cookies".to_string()));
        assert_eq!(argv.last().unwrap(), "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn test_cut_with_subtitles_forces_mp4_and_separate_srt() {
        let mut opts = options();
        opts.will_cut = true;
        opts.subtitle_langs = vec!["en".to_string(), "fr".to_string()];
        let argv = build_download_command(&opts);

        assert!(has_pair(&argv, "--merge-output-format", "mp4"));
        assert!(has_pair(&argv, "--sub-langs", "en,fr"));
        assert!(argv.contains(&"--no-embed-subs".to_string()));
        assert!(!argv.contains(&"--embed-subs".to_string()));
    }

    #[test]
    fn test_sponsorblock_args_per_policy() {
        assert_eq!(sponsorblock_args(SponsorPolicy::Disabled), vec!["--no-sponsorblock"]);
        assert_eq!(
            sponsorblock_args(SponsorPolicy::Aggressive),
            vec![
                "--sponsorblock-remove",
                "sponsor,selfpromo,interaction,intro,outro,preview",
                "--no-force-keyframes-at-cuts"
            ]
        );
        let minimal = sponsorblock_args(SponsorPolicy::Minimal);
        assert_eq!(minimal[1], "sponsor");
        assert_eq!(minimal[3], "--sponsorblock-mark");
    }

    #[test]
    fn test_cookies_args() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("cookies.txt");
        std::fs::write(&good, "x".repeat(200)).unwrap();
        let tiny = dir.path().join("tiny.txt");
        std::fs::write(&tiny, "x").unwrap();

        assert_eq!(cookies_args(&CookieSource::File(good.clone()))[0], "--cookies");
        assert_eq!(cookies_args(&CookieSource::File(tiny)), vec!["--no-cookies"]);
        assert_eq!(
            cookies_args(&CookieSource::File(dir.path().join("missing.txt"))),
            vec!["--no-cookies"]
        );
        assert_eq!(
            cookies_args(&CookieSource::Browser {
                browser: "firefox".into(),
                profile: Some("work".into())
            }),
            vec!["--cookies-from-browser", "firefox:work"]
        );
        assert_eq!(
            cookies_args(&CookieSource::Browser {
                browser: "chrome".into(),
                profile: Some("  ".into())
            }),
            vec!["--cookies-from-browser", "chrome"]
        );
    }

    #[test]
    fn test_format_spec_and_browsers() {
        assert_eq!(format_spec(None), AUTO_FORMAT);
        assert_eq!(format_spec(Some("auto")), AUTO_FORMAT);
        assert_eq!(format_spec(Some("137")), "137+ba/b");
        assert!(is_supported_browser("Firefox"));
        assert!(!is_supported_browser("netscape"));
    }

    #[test]
    fn test_title_command() {
        let argv = build_title_command("yt-dlp", "https://youtu.be/x", &CookieSource::None);
        assert_eq!(
            argv,
            vec!["yt-dlp", "--print", "title", "--no-download", "--no-cookies", "https://youtu.be/x"]
        );
    }
}
