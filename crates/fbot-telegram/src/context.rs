//! Shared bot context.

use fbot_registry::UserRegistry;

use crate::config::BotConfig;
use crate::runner::JobRunner;

/// Everything a handler needs, shared behind an `Arc`.
pub struct BotContext {
    pub config: BotConfig,
    pub registry: UserRegistry,
    pub jobs: JobRunner,
}

impl BotContext {
    pub fn new(config: BotConfig, registry: UserRegistry) -> Self {
        let jobs = JobRunner::new(config.max_concurrent_jobs);
        Self {
            config,
            registry,
            jobs,
        }
    }
}
