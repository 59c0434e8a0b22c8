// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::shell_hook::HookTemplates;
use crate::adapters::sponsorblock_http;
use crate::domain::errors::DomainError;
use crate::engine::download::{is_supported_browser, CookieSource, SUPPORTED_BROWSERS};

/// Subtitle languages offered when nothing is configured
pub const DEFAULT_SUBTITLE_LANGUAGES: [&str; 2] = ["en", "fr"];

/// Hook command templates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    pub on_start: Option<String>,
    pub on_success: Option<String>,
    pub on_failure: Option<String>,
}

impl HookConfig {
    pub fn templates(&self) -> HookTemplates {
        HookTemplates {
            on_start: self.on_start.clone(),
            on_success: self.on_success.clone(),
            on_failure: self.on_failure.clone(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Final destination of finished videos
    pub videos_folder: PathBuf,
    /// Scratch folder for downloads, `<videos_folder>/tmp` when unset
    pub tmp_folder: Option<PathBuf>,
    /// Netscape cookies file
    pub cookies_file: Option<PathBuf>,
    /// `browser` or `browser:profile`
    pub cookies_from_browser: Option<String>,
    pub subtitle_languages: Vec<String>,
    pub sponsorblock_api: String,
    pub sponsorblock_timeout_secs: u64,
    pub keyframe_probe_timeout_secs: u64,
    pub hook_timeout_secs: u64,
    pub hooks: HookConfig,
    pub ytdlp_bin: String,
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            videos_folder: PathBuf::from("downloads"),
            tmp_folder: None,
            cookies_file: None,
            cookies_from_browser: None,
            subtitle_languages: DEFAULT_SUBTITLE_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sponsorblock_api: sponsorblock_http::DEFAULT_API.to_string(),
            sponsorblock_timeout_secs: 15,
            keyframe_probe_timeout_secs: 120,
            hook_timeout_secs: 30,
            hooks: HookConfig::default(),
            ytdlp_bin: "yt-dlp".to_string(),
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
        }
    }
}

/// On-disk layout: everything lives under a `[skipcut]` table
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    skipcut: AppConfig,
}

impl AppConfig {
    /// Parse a TOML document; a missing `[skipcut]` table yields defaults
    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to parse TOML config: {}", e)))?;
        Ok(file.skipcut)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        if !path.exists() {
            return Err(DomainError::ConfigFail(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, DomainError> {
        let file = ConfigFile {
            skipcut: self.clone(),
        };
        toml::to_string_pretty(&file)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration, creating the parent directory
    pub fn save(&self, path: &Path) -> Result<(), DomainError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::FsFail(format!("Failed to create config directory: {}", e))
            })?;
        }
        std::fs::write(path, self.to_toml_string()?)
            .map_err(|e| DomainError::FsFail(format!("Failed to write config file: {}", e)))?;
        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for (key, value) in [
            ("ytdlp_bin", &self.ytdlp_bin),
            ("ffmpeg_bin", &self.ffmpeg_bin),
            ("ffprobe_bin", &self.ffprobe_bin),
            ("sponsorblock_api", &self.sponsorblock_api),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::ConfigFail(format!("{} cannot be empty", key)));
            }
        }

        for (key, value) in [
            ("sponsorblock_timeout_secs", self.sponsorblock_timeout_secs),
            ("keyframe_probe_timeout_secs", self.keyframe_probe_timeout_secs),
            ("hook_timeout_secs", self.hook_timeout_secs),
        ] {
            if value == 0 {
                return Err(DomainError::ConfigFail(format!("{} must be positive", key)));
            }
        }

        if let Some(spec) = self.cookies_from_browser.as_deref() {
            let browser = spec.split(':').next().unwrap_or_default();
            if !browser.trim().is_empty() && !is_supported_browser(browser) {
                return Err(DomainError::ConfigFail(format!(
                    "Unsupported cookies browser: {}. Supported: {}",
                    browser,
                    SUPPORTED_BROWSERS.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Download scratch folder
    pub fn tmp_dir(&self) -> PathBuf {
        self.tmp_folder
            .clone()
            .unwrap_or_else(|| self.videos_folder.join("tmp"))
    }

    /// Cookies file first, then browser, else none
    pub fn cookie_source(&self) -> CookieSource {
        if let Some(path) = &self.cookies_file {
            return CookieSource::File(path.clone());
        }
        match self.cookies_from_browser.as_deref().map(str::trim) {
            Some(spec) if !spec.is_empty() => {
                let (browser, profile) = match spec.split_once(':') {
                    Some((browser, profile)) => (browser, Some(profile.to_string())),
                    None => (spec, None),
                };
                CookieSource::Browser {
                    browser: browser.to_lowercase(),
                    profile,
                }
            }
            _ => CookieSource::None,
        }
    }

    /// Parse a comma separated language list, lowercased, blanks dropped
    pub fn parse_languages(list: &str) -> Vec<String> {
        list.split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn sponsorblock_timeout(&self) -> Duration {
        Duration::from_secs(self.sponsorblock_timeout_secs)
    }

    pub fn keyframe_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.keyframe_probe_timeout_secs)
    }

    pub fn hook_timeout(&self) -> Duration {
        Duration::from_secs(self.hook_timeout_secs)
    }
}
