//! Common utilities and helpers

pub mod path;
pub mod time;
pub mod video_id;
