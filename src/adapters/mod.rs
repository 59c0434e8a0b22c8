// Adapters - External system implementations

pub mod exec_process;
pub mod probe_ffprobe;
pub mod shell_hook;
pub mod sponsorblock_http;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_process::ProcessExecAdapter;
pub use probe_ffprobe::FFprobeAdapter;
pub use shell_hook::{HookTemplates, NoopHook, ShellHookAdapter};
pub use sponsorblock_http::SponsorBlockHttpAdapter;
pub use toml_config::AppConfig;
pub use tracing_log::init_tracing;
