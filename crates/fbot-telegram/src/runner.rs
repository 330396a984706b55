//! Semaphore-bounded download job runner.
//!
//! Acquisition and transcoding drive long-running external processes.
//! Handlers hand jobs off here so the dispatcher keeps servicing other
//! users while downloads run; the semaphore bounds how many run at once.
//! There is no cancellation: once a job starts, it runs to completion even
//! if the requester's chat goes quiet.

use std::sync::Arc;

use teloxide::prelude::*;
use tokio::sync::Semaphore;
use tracing::{debug, error};

use fbot_models::DownloadRequest;

use crate::context::BotContext;
use crate::pipeline::{run_download, StatusMessage};

/// Spawns download jobs onto the runtime, bounded by a semaphore.
pub struct JobRunner {
    semaphore: Arc<Semaphore>,
}

impl JobRunner {
    /// Create a runner allowing `max_concurrent_jobs` jobs at once.
    pub fn new(max_concurrent_jobs: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent_jobs)),
        }
    }

    /// Queue one download job.
    ///
    /// Returns immediately; the job waits for a permit in the background,
    /// so a burst of requests queues up rather than stalling the handler.
    pub fn spawn(
        &self,
        ctx: Arc<BotContext>,
        bot: Bot,
        request: DownloadRequest,
        status: StatusMessage,
    ) {
        let semaphore = Arc::clone(&self.semaphore);

        tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return, // runner dropped at shutdown
            };

            debug!(url = %request.url, role = %request.role, "Job started");

            if let Err(e) = run_download(&ctx, &bot, &request, status).await {
                error!(
                    url = %request.url,
                    chat_id = request.chat_id,
                    error = %e,
                    "Download job failed"
                );
            }
        });
    }

    /// Number of jobs that could start right now without waiting.
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_starts_with_configured_slots() {
        let runner = JobRunner::new(2);
        assert_eq!(runner.available_slots(), 2);
    }
}
