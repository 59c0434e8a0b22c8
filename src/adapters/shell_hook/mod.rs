//! Shell hook adapter for lifecycle events
//!
//! Hook commands are templates with `{PLACEHOLDER}` fields filled from the
//! hook context and run through the platform shell. Hook output and failures
//! are logged and never abort the run.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::domain::model::HookEvent;
use crate::ports::{HookContext, HookPort};

/// Default hook timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Command templates per lifecycle event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookTemplates {
    pub on_start: Option<String>,
    pub on_success: Option<String>,
    pub on_failure: Option<String>,
}

impl HookTemplates {
    pub fn template(&self, event: HookEvent) -> Option<&str> {
        let template = match event {
            HookEvent::Start => self.on_start.as_deref(),
            HookEvent::Success => self.on_success.as_deref(),
            HookEvent::Failure => self.on_failure.as_deref(),
        };
        template.map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        [HookEvent::Start, HookEvent::Success, HookEvent::Failure]
            .iter()
            .all(|e| self.template(*e).is_none())
    }
}

/// Fill `{KEY}` placeholders.
///
/// `{{` and `}}` are literal braces. An unknown key or an unbalanced brace
/// leaves the template untouched so the hook still runs.
pub fn format_hook_command(template: &str, placeholders: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                let mut closed = false;
                for k in chars.by_ref() {
                    if k == '}' {
                        closed = true;
                        break;
                    }
                    key.push(k);
                }
                match placeholders.get(&key) {
                    Some(value) if closed => out.push_str(value),
                    _ => return template.to_string(),
                }
            }
            '}' => return template.to_string(),
            other => out.push(other),
        }
    }
    out
}

fn shell_command(command_line: &str) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", command_line]);
        command
    } else {
        let mut command = Command::new("sh");
        command.args(["-c", command_line]);
        command
    }
}

/// Runs configured hook templates through the shell
pub struct ShellHookAdapter {
    templates: HookTemplates,
    timeout: Duration,
}

impl ShellHookAdapter {
    /// Create new shell hook adapter
    pub fn new(templates: HookTemplates, timeout: Duration) -> Self {
        Self { templates, timeout }
    }
}

#[async_trait]
impl HookPort for ShellHookAdapter {
    async fn fire(&self, event: HookEvent, context: &HookContext) {
        let template = match self.templates.template(event) {
            Some(template) => template,
            None => return,
        };
        let command_line = format_hook_command(template, &context.placeholders());
        info!("Hook {}: {}", event.as_str(), command_line);

        let mut command = shell_command(&command_line);
        command.kill_on_drop(true);
        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Hook '{}' error: {}", event.as_str(), e);
                return;
            }
            Err(_) => {
                warn!(
                    "Hook '{}' timed out after {}s",
                    event.as_str(),
                    self.timeout.as_secs()
                );
                return;
            }
        };

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            info!("[hook:{}:out] {}", event.as_str(), line);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            warn!("[hook:{}:err] {}", event.as_str(), line);
        }
        if !output.status.success() {
            warn!(
                "Hook '{}' exited with code {}",
                event.as_str(),
                output.status.code().unwrap_or(-1)
            );
        }
    }
}

/// Hook port that does nothing
pub struct NoopHook;

#[async_trait]
impl HookPort for NoopHook {
    async fn fire(&self, _event: HookEvent, _context: &HookContext) {}
}
