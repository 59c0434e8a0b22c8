// Ports - Interface definitions (contracts)

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the remote skip-segment lookup
#[async_trait]
pub trait SegmentSourcePort: Send + Sync {
    /// Segments for a video URL or bare id, limited to `categories`.
    ///
    /// Never fails: an unknown video, an unreachable service or a malformed
    /// answer all yield an empty list.
    async fn fetch_segments(&self, url_or_id: &str, categories: &[&str]) -> Vec<Segment>;
}

/// Port for keyframe extraction from a downloaded file
#[async_trait]
pub trait KeyframeProbePort: Send + Sync {
    /// Ascending keyframe timestamps; empty when probing fails
    async fn probe_keyframes(&self, file_path: &Path) -> Vec<f64>;
}

/// How an external process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    Failed(i32),
    Cancelled,
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitOutcome::Success)
    }
}

/// Output of a short command run to completion
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Cooperative cancellation flag shared with running processes
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Port for running external tools
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Run a long command, streaming merged stdout/stderr into the log.
    ///
    /// `cancel` is checked between output lines; when set, the child is
    /// killed and the outcome is [`ExitOutcome::Cancelled`].
    async fn run(&self, argv: &[String], cancel: &CancelToken) -> Result<ExitOutcome, DomainError>;

    /// Run a short command to completion and capture its output
    async fn capture(&self, argv: &[String], timeout: Duration) -> Result<CapturedOutput, DomainError>;
}

/// Placeholder values handed to lifecycle hooks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookContext {
    values: BTreeMap<String, String>,
}

impl HookContext {
    /// Keys every context carries, empty until set
    pub const KEYS: [&'static str; 10] = [
        "URL",
        "FILENAME",
        "DEST_DIR",
        "TMP_DIR",
        "OUTPUT_PATH",
        "STATUS",
        "RUN_SEQ",
        "TS",
        "START_SEC",
        "END_SEC",
    ];

    pub fn new() -> Self {
        let values = Self::KEYS
            .iter()
            .map(|k| (k.to_string(), String::new()))
            .collect();
        Self { values }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Set `STATUS` and refresh `TS`
    pub fn with_status(&mut self, status: &str) -> &mut Self {
        self.set("STATUS", status);
        self.set("TS", chrono::Utc::now().timestamp().to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Every key plus a `<KEY>_Q` variant wrapped in escaped double quotes
    pub fn placeholders(&self) -> BTreeMap<String, String> {
        let mut all = self.values.clone();
        for (key, value) in &self.values {
            all.insert(format!("{}_Q", key), format!("\"{}\"", value.replace('"', "\\\"")));
        }
        all
    }
}

/// Port for lifecycle hooks
#[async_trait]
pub trait HookPort: Send + Sync {
    /// Fire `event`; failures are logged by the implementation, never returned
    async fn fire(&self, event: HookEvent, context: &HookContext);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_hook_context_quoted_variants() {
        let mut ctx = HookContext::new();
        ctx.set("FILENAME", "My \"best\" clip");
        let placeholders = ctx.placeholders();
        assert_eq!(placeholders["FILENAME_Q"], "\"My \\\"best\\\" clip\"");
        assert_eq!(placeholders["OUTPUT_PATH"], "");
        assert_eq!(placeholders["OUTPUT_PATH_Q"], "\"\"");
        assert_eq!(placeholders.len(), HookContext::KEYS.len() * 2);
    }

    #[test]
    fn test_hook_context_status_sets_timestamp() {
        let mut ctx = HookContext::new();
        ctx.with_status("success");
        assert_eq!(ctx.get("STATUS"), Some("success"));
        assert!(ctx.get("TS").unwrap().parse::<i64>().unwrap() > 0);
    }
}
