//! The download pipeline orchestrator.
//!
//! One request flows classify -> workspace -> extract -> size policy ->
//! deliver, with the workspace torn down on every exit path. This module is
//! also where the ignore-vs-surface decision is made for each collaborator
//! failure: extraction failures become a user-facing rejection, transcode
//! failures were already degraded inside the size policy, and status-message
//! edits are cosmetic and ignored.

use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId};
use tracing::info;

use fbot_media::{apply_size_policy, extract, MediaError, Workspace};
use fbot_models::{human_size, DownloadRequest, MediaRole, Platform};

use crate::context::BotContext;
use crate::error::{BotError, BotResult};

pub const TEXT_DOWNLOADING: &str = "⏳ Downloading…";
pub const TEXT_EXTRACTION_FAILED: &str = "❌ Could not download this link.";
pub const TEXT_GENERIC_FAILED: &str = "❌ Something went wrong.";

/// What to do with an inbound URL, derived purely from its platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundPlan {
    /// YouTube: offer a video/audio choice before downloading.
    ChooseFormat,
    /// Short-form platform: download immediately with the given role.
    Download(MediaRole),
    /// Unsupported: reject without allocating anything.
    Reject,
}

/// Map a platform category to its handling plan.
pub fn plan_for(platform: Platform) -> InboundPlan {
    match platform {
        Platform::YouTube => InboundPlan::ChooseFormat,
        Platform::ShortForm => InboundPlan::Download(MediaRole::Video),
        Platform::Unsupported => InboundPlan::Reject,
    }
}

/// Handle to the transient status message shown while a job runs.
///
/// Edits and deletes are cosmetic; failures are ignored.
#[derive(Debug, Clone, Copy)]
pub struct StatusMessage {
    pub chat: ChatId,
    pub id: MessageId,
}

impl StatusMessage {
    pub fn new(chat: ChatId, id: MessageId) -> Self {
        Self { chat, id }
    }

    pub async fn edit(&self, bot: &Bot, text: &str) {
        let _ = bot.edit_message_text(self.chat, self.id, text).await;
    }

    pub async fn delete(&self, bot: &Bot) {
        let _ = bot.delete_message(self.chat, self.id).await;
    }
}

/// Run one download job to completion.
///
/// Extraction failures are reported to the user and swallowed; any other
/// error is reported generically and propagated to the runner's log.
pub async fn run_download(
    ctx: &BotContext,
    bot: &Bot,
    request: &DownloadRequest,
    status: StatusMessage,
) -> BotResult<()> {
    match download_and_deliver(ctx, bot, request, status).await {
        Ok(()) => Ok(()),
        Err(BotError::Media(
            MediaError::ExtractionFailed { .. } | MediaError::YtDlpNotFound,
        )) => {
            status.edit(bot, TEXT_EXTRACTION_FAILED).await;
            info!(url = %request.url, "Extraction failed, user notified");
            Ok(())
        }
        Err(e) => {
            status.edit(bot, TEXT_GENERIC_FAILED).await;
            Err(e)
        }
    }
}

async fn download_and_deliver(
    ctx: &BotContext,
    bot: &Bot,
    request: &DownloadRequest,
    status: StatusMessage,
) -> BotResult<()> {
    // Dropped on every exit path below, removing all intermediates.
    let workspace = Workspace::create(&ctx.config.work_dir)?;

    let extracted = extract(&request.url, request.role, workspace.path()).await?;

    let deliverable = apply_size_policy(
        &extracted.artifact,
        &extracted.title,
        request.role,
        ctx.config.limits,
        workspace.path(),
    )
    .await?;

    let size = tokio::fs::metadata(&deliverable).await?.len();
    status
        .edit(bot, &format!("✅ Done ({})", human_size(size)))
        .await;

    // Title-derived filename, unsanitized.
    let filename = format!("{}.{}", extracted.title, request.role.file_ext());
    let input = InputFile::file(deliverable).file_name(filename);

    match request.role {
        MediaRole::Video => {
            bot.send_video(ChatId(request.chat_id), input).await?;
        }
        MediaRole::Audio => {
            bot.send_audio(ChatId(request.chat_id), input).await?;
        }
    }

    status.delete(bot).await;

    info!(
        url = %request.url,
        role = %request.role,
        chat_id = request.chat_id,
        "Delivered download"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbot_models::classify_url;

    #[test]
    fn test_youtube_gets_a_format_menu() {
        let platform = classify_url("https://youtu.be/abc123");
        assert_eq!(platform, Platform::YouTube);
        assert_eq!(plan_for(platform), InboundPlan::ChooseFormat);
    }

    #[test]
    fn test_short_form_downloads_immediately_as_video() {
        let platform = classify_url("https://tiktok.com/@x/video/1");
        assert_eq!(platform, Platform::ShortForm);
        assert_eq!(plan_for(platform), InboundPlan::Download(MediaRole::Video));
    }

    #[test]
    fn test_unsupported_is_rejected_without_work() {
        let platform = classify_url("https://example.com/page");
        assert_eq!(platform, Platform::Unsupported);
        assert_eq!(plan_for(platform), InboundPlan::Reject);
    }
}
