//! External process execution adapter
//!
//! Runs the downloader and the transcoder as child processes, merges their
//! stdout and stderr into one line stream and reports progress through
//! tracing.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::engine::display_command;
use crate::engine::progress::{classify_line, parse_progress_line, ProgressTracker};
use crate::ports::{CancelToken, CapturedOutput, ExecutePort, ExitOutcome};
use crate::utils::time::TimeParser;

/// How often the cancel flag is checked while a process is silent
const CANCEL_POLL: Duration = Duration::from_millis(250);

/// Process-based execution adapter
pub struct ProcessExecAdapter;

impl ProcessExecAdapter {
    /// Create new process execution adapter
    pub fn new() -> Self {
        Self
    }

    fn command(argv: &[String]) -> Result<Command, DomainError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| DomainError::BadArgs("empty command line".to_string()))?;
        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        Ok(command)
    }
}

impl Default for ProcessExecAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
}

#[async_trait]
impl ExecutePort for ProcessExecAdapter {
    async fn run(&self, argv: &[String], cancel: &CancelToken) -> Result<ExitOutcome, DomainError> {
        info!("$ {}", display_command(argv));
        let started = Instant::now();

        let mut child = Self::command(argv)?
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DomainError::ProcessFailed(format!("Failed to start {}: {}", argv[0], e)))?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, tx.clone());
        }
        drop(tx);

        let mut tracker = ProgressTracker::new();
        let mut last_phase = None;
        loop {
            if cancel.is_cancelled() {
                warn!("Cancellation requested, stopping {}", argv[0]);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {}", argv[0], e);
                }
                return Ok(ExitOutcome::Cancelled);
            }

            tokio::select! {
                line = rx.recv() => match line {
                    Some(line) => {
                        debug!(target: "skipcut::process", "{}", line);
                        if let Some(update) = parse_progress_line(&line) {
                            if let Some(percent) = tracker.observe(&update) {
                                info!(
                                    target: "skipcut::progress",
                                    percent,
                                    elapsed = %TimeParser::format_seconds(started.elapsed().as_secs_f64()),
                                    "{}%",
                                    percent
                                );
                            }
                        } else if let Some(phase) = classify_line(&line) {
                            if last_phase != Some(phase) {
                                info!("Phase: {:?}", phase);
                                last_phase = Some(phase);
                            }
                        }
                    }
                    None => break,
                },
                _ = tokio::time::sleep(CANCEL_POLL) => {}
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| DomainError::ProcessFailed(format!("Failed to wait for {}: {}", argv[0], e)))?;
        let elapsed = TimeParser::format_seconds(started.elapsed().as_secs_f64());

        if status.success() {
            info!("{} finished in {}", argv[0], elapsed);
            Ok(ExitOutcome::Success)
        } else {
            let code = status.code().unwrap_or(-1);
            warn!("{} exited with code {} after {}", argv[0], code, elapsed);
            Ok(ExitOutcome::Failed(code))
        }
    }

    async fn capture(&self, argv: &[String], timeout: Duration) -> Result<CapturedOutput, DomainError> {
        debug!("$ {}", display_command(argv));
        let mut command = Self::command(argv)?;

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| {
                DomainError::ProcessFailed(format!(
                    "{} timed out after {}s",
                    argv[0],
                    timeout.as_secs()
                ))
            })?
            .map_err(|e| DomainError::ProcessFailed(format!("Failed to start {}: {}", argv[0], e)))?;

        Ok(CapturedOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
