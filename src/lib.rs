//! SkipCut Library
//!
//! Cut planning for downloaded videos: merging skip segments, remapping
//! timestamps onto the sponsor-free timeline, adjusting requested windows for
//! removed content and snapping them to keyframes. The adapters drive the
//! external downloader and transcoder around that core.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{CutMode, CutWindow, KeepInterval, MergedSegment, Segment, SponsorPolicy};
pub use error::{SkipCutError, SkipCutResult};
pub use planner::{CutPlan, CutPlanner};
