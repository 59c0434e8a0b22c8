use std::sync::Arc;

use tracing::debug;

use crate::adapters::{
    AppConfig, FFprobeAdapter, NoopHook, ProcessExecAdapter, ShellHookAdapter,
    SponsorBlockHttpAdapter,
};
use crate::app::clip_interactor::ClipInteractor;
use crate::domain::errors::DomainError;
use crate::ports::{ExecutePort, HookPort, KeyframeProbePort, SegmentSourcePort};

pub trait AppContainer: Send + Sync {
    fn clip_interactor(&self) -> Arc<ClipInteractor>;
    fn segment_source(&self) -> Arc<dyn SegmentSourcePort>;
}

pub struct DefaultAppContainer {
    clip_interactor: Arc<ClipInteractor>,
    segment_source: Arc<dyn SegmentSourcePort>,
}

impl DefaultAppContainer {
    pub fn new(config: AppConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let segment_source: Arc<dyn SegmentSourcePort> = Arc::new(SponsorBlockHttpAdapter::new(
            config.sponsorblock_api.as_str(),
            config.sponsorblock_timeout(),
        )?);
        let keyframe_probe: Arc<dyn KeyframeProbePort> = Arc::new(FFprobeAdapter::new(
            config.ffprobe_bin.as_str(),
            config.keyframe_probe_timeout(),
        ));
        let execute_port: Arc<dyn ExecutePort> = Arc::new(ProcessExecAdapter::new());

        let templates = config.hooks.templates();
        let hook_port: Arc<dyn HookPort> = if templates.is_empty() {
            debug!("No hooks configured");
            Arc::new(NoopHook)
        } else {
            Arc::new(ShellHookAdapter::new(templates, config.hook_timeout()))
        };

        let clip_interactor = Arc::new(ClipInteractor::new(
            Arc::clone(&segment_source),
            keyframe_probe,
            execute_port,
            hook_port,
            config,
        ));

        Ok(Self {
            clip_interactor,
            segment_source,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn clip_interactor(&self) -> Arc<ClipInteractor> {
        Arc::clone(&self.clip_interactor)
    }

    fn segment_source(&self) -> Arc<dyn SegmentSourcePort> {
        Arc::clone(&self.segment_source)
    }
}
