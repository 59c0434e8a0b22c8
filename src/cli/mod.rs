//! CLI module for SkipCut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// SkipCut
///
/// Download an online video, strip sponsor segments and trim it either on
/// keyframes (stream copy) or precisely (re-encode).
#[derive(Parser, Debug)]
#[command(name = "skipcut")]
#[command(about = "SkipCut - Download, strip sponsors and trim online videos")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file
    #[arg(long, global = true, env = "SKIPCUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Destination folder for finished videos
    #[arg(long, global = true)]
    pub videos_folder: Option<PathBuf>,

    /// Scratch folder for downloads
    #[arg(long, global = true)]
    pub tmp_folder: Option<PathBuf>,

    /// Netscape cookies file
    #[arg(long, global = true)]
    pub cookies_file: Option<PathBuf>,

    /// Read cookies from a browser (`browser` or `browser:profile`)
    #[arg(long, global = true)]
    pub cookies_from_browser: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a video, optionally removing sponsors and cutting a section
    Download(args::DownloadArgs),
    /// Show the skip segments known for a video
    Segments(args::SegmentsArgs),
    /// Compute the final cut window without running any external tool
    Plan(args::PlanArgs),
    /// Map a window on the original timeline onto the sponsor-free timeline
    Remap(args::RemapArgs),
}
