//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::toml_config::AppConfig;
use crate::cli::Cli;

/// Files tried when no config path is given
const DEFAULT_CONFIG_PATHS: [&str; 2] = ["skipcut.toml", "config/skipcut.toml"];

/// Resolve configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(cli: &Cli) -> Result<AppConfig> {
    info!("Initializing configuration hierarchy");

    // Step 1 and 2: defaults, then the file
    let mut config = load_config_file(cli.config.as_deref())?;

    // Step 3: environment
    let env_overrides = apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    // Step 4: command line
    let cli_overrides = apply_cli_overrides(&mut config, cli);
    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Load the explicit file, or the first default file that exists, or defaults
fn load_config_file(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return AppConfig::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()));
    }

    for candidate in DEFAULT_CONFIG_PATHS {
        let path = Path::new(candidate);
        if path.is_file() {
            return AppConfig::load(path)
                .with_context(|| format!("Failed to load config file {}", path.display()));
        }
    }

    debug!("No configuration file found, using defaults");
    Ok(AppConfig::default())
}

/// Apply environment variables; returns how many were applied.
///
/// Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, env: F) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| {
        env(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let mut applied = 0;

    if let Some(value) = var("VIDEOS_FOLDER") {
        config.videos_folder = PathBuf::from(value);
        applied += 1;
    }
    if let Some(value) = var("TMP_DOWNLOAD_FOLDER") {
        config.tmp_folder = Some(PathBuf::from(value));
        applied += 1;
    }
    if let Some(value) = var("YOUTUBE_COOKIES_FILE_PATH") {
        config.cookies_file = Some(PathBuf::from(value));
        applied += 1;
    }
    if let Some(value) = var("COOKIES_FROM_BROWSER") {
        config.cookies_from_browser = Some(value.to_lowercase());
        applied += 1;
    }
    if let Some(value) = var("SUBTITLES_CHOICES") {
        let languages = AppConfig::parse_languages(&value);
        if !languages.is_empty() {
            config.subtitle_languages = languages;
            applied += 1;
        }
    }
    if let Some(value) = var("SPONSORBLOCK_API") {
        config.sponsorblock_api = value;
        applied += 1;
    }

    for (key, slot) in [
        ("ON_DOWNLOAD_START", &mut config.hooks.on_start),
        ("ON_DOWNLOAD_SUCCESS", &mut config.hooks.on_success),
        ("ON_DOWNLOAD_FAILURE", &mut config.hooks.on_failure),
    ] {
        if let Some(value) = var(key) {
            *slot = Some(value);
            applied += 1;
        }
    }

    applied
}

/// Apply global command line flags; returns how many were applied
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> usize {
    let mut applied = 0;

    if let Some(folder) = &cli.videos_folder {
        config.videos_folder = folder.clone();
        applied += 1;
    }
    if let Some(folder) = &cli.tmp_folder {
        config.tmp_folder = Some(folder.clone());
        applied += 1;
    }
    if let Some(path) = &cli.cookies_file {
        config.cookies_file = Some(path.clone());
        applied += 1;
    }
    if let Some(browser) = &cli.cookies_from_browser {
        config.cookies_from_browser = Some(browser.trim().to_lowercase());
        // an explicit browser beats a cookies file from lower layers
        config.cookies_file = cli.cookies_file.clone();
        applied += 1;
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        let applied = apply_env_overrides(
            &mut config,
            env(&[
                ("VIDEOS_FOLDER", "/data/videos"),
                ("SUBTITLES_CHOICES", "EN, de"),
                ("COOKIES_FROM_BROWSER", " Firefox "),
                ("ON_DOWNLOAD_SUCCESS", "notify {FILENAME_Q}"),
                ("TMP_DOWNLOAD_FOLDER", "  "),
            ]),
        );

        assert_eq!(applied, 4);
        assert_eq!(config.videos_folder, PathBuf::from("/data/videos"));
        assert_eq!(config.subtitle_languages, vec!["en", "de"]);
        assert_eq!(config.cookies_from_browser.as_deref(), Some("firefox"));
        assert_eq!(config.hooks.on_success.as_deref(), Some("notify {FILENAME_Q}"));
        assert_eq!(config.tmp_folder, None);
    }

    #[test]
    fn test_empty_subtitle_choices_keep_defaults() {
        let mut config = AppConfig::default();
        assert_eq!(apply_env_overrides(&mut config, env(&[("SUBTITLES_CHOICES", ",,")])), 0);
        assert_eq!(config.subtitle_languages, vec!["en", "fr"]);
    }

    #[test]
    fn test_cli_beats_env_and_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skipcut.toml");
        std::fs::write(
            &path,
            "[skipcut]\nvideos_folder = \"/from/file\"\ncookies_file = \"/from/file/cookies.txt\"\n",
        )
        .unwrap();

        let mut config = load_config_file(Some(&path)).unwrap();
        assert_eq!(config.videos_folder, PathBuf::from("/from/file"));

        apply_env_overrides(&mut config, env(&[("VIDEOS_FOLDER", "/from/env")]));
        assert_eq!(config.videos_folder, PathBuf::from("/from/env"));

        let cli = Cli::parse_from([
            "skipcut",
            "--videos-folder",
            "/from/cli",
            "--cookies-from-browser",
            "chrome",
            "segments",
            "dQw4w9WgXcQ",
        ]);
        assert_eq!(apply_cli_overrides(&mut config, &cli), 2);
        assert_eq!(config.videos_folder, PathBuf::from("/from/cli"));
        assert_eq!(config.cookies_file, None);
        assert_eq!(config.cookies_from_browser.as_deref(), Some("chrome"));
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        assert!(load_config_file(Some(Path::new("/nonexistent/skipcut.toml"))).is_err());
    }
}
