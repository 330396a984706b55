//! Update handlers: messages, commands, and callback activations.
//!
//! Every handler upserts the sender into the registry before doing
//! anything else, so the registry reflects everyone who ever talked to the
//! bot regardless of how their request ends.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, MaybeInaccessibleMessage, User,
};
use tracing::{debug, warn};

use fbot_models::{
    classify_url, decode_action, DownloadRequest, MediaRole, PendingAction, Platform, UserRecord,
};

use crate::broadcast::fan_out;
use crate::context::BotContext;
use crate::error::BotResult;
use crate::pipeline::{plan_for, InboundPlan, StatusMessage, TEXT_DOWNLOADING};

const START_TEXT: &str = "👋 Welcome!\n\n\
    I can download media from:\n\
    • YouTube (video or audio)\n\
    • TikTok\n\
    • Facebook\n\
    • Instagram\n\n\
    📌 Send me a link to get started.";

const HELP_TEXT: &str = "📚 How to use this bot\n\n\
    1️⃣ Send a YouTube / TikTok / Facebook / Instagram link\n\
    2️⃣ For YouTube, pick video or audio\n\
    3️⃣ The file comes back with its size\n\n\
    ✅ YouTube: video or audio\n\
    ✅ TikTok, Facebook, Instagram: video only";

const TEXT_UNSUPPORTED: &str = "❌ This link is not supported.";
const TEXT_CHOOSE_FORMAT: &str = "📌 Choose a format:";
const TEXT_BAD_CALLBACK: &str = "❌ Invalid selection.";
const TEXT_NOT_ADMIN: &str = "❌ You are not an admin.";
const TEXT_BROADCAST_USAGE: &str = "📣 Usage:\n/broadcast <message>";

/// Handle an inbound text message: command or candidate URL.
pub async fn on_message(ctx: &Arc<BotContext>, bot: &Bot, msg: &Message) -> BotResult<()> {
    let Some(user) = &msg.from else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    ctx.registry.upsert(record_for(user)).await?;

    let text = text.trim();
    if text.starts_with('/') {
        return handle_command(ctx, bot, msg, user, text).await;
    }

    handle_url(ctx, bot, msg, text).await
}

/// Handle an inline-keyboard button press.
pub async fn on_callback(ctx: &Arc<BotContext>, bot: &Bot, q: &CallbackQuery) -> BotResult<()> {
    let _ = bot.answer_callback_query(q.id.clone()).await;

    ctx.registry.upsert(record_for(&q.from)).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    // The menu message the button lives on; old buttons may reference a
    // message Telegram no longer lets us touch.
    let menu = match &q.message {
        Some(MaybeInaccessibleMessage::Regular(m)) => Some((m.chat.id, m.id)),
        _ => None,
    };
    let chat = menu
        .map(|(chat, _)| chat)
        .unwrap_or(ChatId(q.from.id.0 as i64));

    match decode_action(data) {
        Ok(PendingAction::Help) => {
            bot.send_message(chat, HELP_TEXT).await?;
        }
        Ok(PendingAction::Download { role, url }) => {
            // Remove the format menu; cosmetic if it fails.
            if let Some((menu_chat, menu_id)) = menu {
                let _ = bot.delete_message(menu_chat, menu_id).await;
            }
            submit_job(ctx, bot, chat, url, role, Platform::YouTube).await?;
        }
        Err(e) => {
            warn!(error = %e, data = data, "Rejected malformed callback token");
            bot.send_message(chat, TEXT_BAD_CALLBACK).await?;
        }
    }

    Ok(())
}

async fn handle_command(
    ctx: &Arc<BotContext>,
    bot: &Bot,
    msg: &Message,
    user: &User,
    text: &str,
) -> BotResult<()> {
    let (cmd, arg) = match text.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (text, ""),
    };

    match cmd {
        "/start" => {
            let keyboard = InlineKeyboardMarkup::new([[InlineKeyboardButton::callback(
                "💡 Help",
                PendingAction::Help.encode(),
            )]]);
            bot.send_message(msg.chat.id, START_TEXT)
                .reply_markup(keyboard)
                .await?;
        }
        "/help" => {
            bot.send_message(msg.chat.id, HELP_TEXT).await?;
        }
        "/stats" => {
            if !ctx.config.is_admin(user.id.0) {
                bot.send_message(msg.chat.id, TEXT_NOT_ADMIN).await?;
                return Ok(());
            }
            let users = ctx.registry.list_all().await?;
            let mut text = format!("📊 Bot stats\n\n👥 Users: {}\n\n", users.len());
            for u in &users {
                text.push_str(&format!("• {} (@{}) — {}\n", u.first_name, u.username, u.id));
            }
            bot.send_message(msg.chat.id, text).await?;
        }
        "/broadcast" => {
            if !ctx.config.is_admin(user.id.0) {
                bot.send_message(msg.chat.id, TEXT_NOT_ADMIN).await?;
                return Ok(());
            }
            if arg.is_empty() {
                bot.send_message(msg.chat.id, TEXT_BROADCAST_USAGE).await?;
                return Ok(());
            }
            let recipients = ctx.registry.list_all().await?;
            let sent = fan_out(bot, &recipients, arg).await;
            bot.send_message(msg.chat.id, format!("✅ Delivered to {sent} users."))
                .await?;
        }
        _ => {
            debug!(command = cmd, "Ignoring unknown command");
        }
    }

    Ok(())
}

async fn handle_url(ctx: &Arc<BotContext>, bot: &Bot, msg: &Message, url: &str) -> BotResult<()> {
    let platform = classify_url(url);

    match plan_for(platform) {
        InboundPlan::Reject => {
            bot.send_message(msg.chat.id, TEXT_UNSUPPORTED).await?;
        }
        InboundPlan::ChooseFormat => {
            let video = PendingAction::Download {
                role: MediaRole::Video,
                url: url.to_string(),
            };
            let audio = PendingAction::Download {
                role: MediaRole::Audio,
                url: url.to_string(),
            };
            let keyboard = InlineKeyboardMarkup::new([[
                InlineKeyboardButton::callback("🎬 Video", video.encode()),
                InlineKeyboardButton::callback("🎵 Audio", audio.encode()),
            ]]);
            bot.send_message(msg.chat.id, TEXT_CHOOSE_FORMAT)
                .reply_markup(keyboard)
                .await?;
        }
        InboundPlan::Download(role) => {
            submit_job(ctx, bot, msg.chat.id, url.to_string(), role, platform).await?;
        }
    }

    Ok(())
}

/// Send the transient status message and hand the job to the runner.
async fn submit_job(
    ctx: &Arc<BotContext>,
    bot: &Bot,
    chat: ChatId,
    url: String,
    role: MediaRole,
    platform: Platform,
) -> BotResult<()> {
    let status_msg = bot.send_message(chat, TEXT_DOWNLOADING).await?;
    let status = StatusMessage::new(chat, status_msg.id);

    let request = DownloadRequest::new(url, chat.0, role, platform);
    ctx.jobs.spawn(Arc::clone(ctx), bot.clone(), request, status);

    Ok(())
}

fn record_for(user: &User) -> UserRecord {
    UserRecord::new(
        user.id.0 as i64,
        user.username.as_deref(),
        Some(user.first_name.as_str()),
    )
}
