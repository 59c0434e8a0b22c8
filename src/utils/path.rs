//! Path utilities for download and cut artifacts

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;

/// Longest file name we hand to the downloader
pub const MAX_FILENAME_LEN: usize = 200;

/// Container extensions the downloader may produce, in lookup order
pub const DOWNLOAD_EXTENSIONS: [&str; 3] = ["mkv", "mp4", "webm"];

static RESERVED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("reserved chars regex"));
static NON_WORD_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\-.]").expect("non-word chars regex"));
static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Path utilities for the temporary and destination folders
pub struct PathUtils;

impl PathUtils {
    /// Make `name` safe to use as a file or folder name
    pub fn sanitize_filename(name: &str) -> String {
        let name = name.trim();
        if name.is_empty() {
            return "unnamed".to_string();
        }

        let sanitized = RESERVED_CHARS.replace_all(name, "_");
        let sanitized = NON_WORD_CHARS.replace_all(&sanitized, "_");
        let sanitized = WHITESPACE_RUNS.replace_all(&sanitized, " ");
        let mut sanitized = sanitized.trim().trim_matches(|c| c == '.' || c == ' ').to_string();

        if sanitized.chars().count() > MAX_FILENAME_LEN {
            sanitized = sanitized
                .chars()
                .take(MAX_FILENAME_LEN)
                .collect::<String>()
                .trim()
                .to_string();
        }

        if sanitized.is_empty() {
            "unnamed".to_string()
        } else {
            sanitized
        }
    }

    /// Find `<base>.<ext>` produced by the downloader
    pub fn find_downloaded_file(dir: &Path, base: &str) -> Option<PathBuf> {
        DOWNLOAD_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", base, ext)))
            .find(|candidate| candidate.is_file())
    }

    /// Subtitle sidecar for `lang`, falling back to the language-less name
    pub fn find_subtitle_file(dir: &Path, base: &str, lang: &str) -> Option<PathBuf> {
        let with_lang = dir.join(format!("{}.{}.srt", base, lang));
        if with_lang.is_file() {
            return Some(with_lang);
        }
        let plain = dir.join(format!("{}.srt", base));
        plain.is_file().then_some(plain)
    }

    /// Remove subtitle sidecars and partial downloads left next to the output.
    ///
    /// Returns the number of files removed; failures are logged and skipped.
    pub fn cleanup_extras(dir: &Path, base: &str) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not list {}: {}", dir.display(), e);
                return 0;
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(base) {
                continue;
            }
            let is_extra = name.ends_with(".srt")
                || name.ends_with(".vtt")
                || name.ends_with(".part")
                || name.ends_with(".ytdl");
            if !is_extra {
                continue;
            }
            match std::fs::remove_file(entry.path()) {
                Ok(()) => {
                    debug!("Removed leftover {}", name);
                    removed += 1;
                }
                Err(e) => warn!("Could not remove {}: {}", name, e),
            }
        }
        removed
    }

    /// Move `src` into `dest_dir`, keeping its file name
    pub fn move_into(src: &Path, dest_dir: &Path) -> Result<PathBuf, DomainError> {
        std::fs::create_dir_all(dest_dir)?;
        let file_name = src
            .file_name()
            .ok_or_else(|| DomainError::FsFail(format!("No file name in {}", src.display())))?;
        let target = dest_dir.join(file_name);

        if std::fs::rename(src, &target).is_err() {
            // rename fails across file systems
            std::fs::copy(src, &target)?;
            std::fs::remove_file(src)?;
        }
        Ok(target)
    }
}
