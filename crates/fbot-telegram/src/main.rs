//! Telegram media download bot binary.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fbot_registry::UserRegistry;
use fbot_telegram::{handlers, BotConfig, BotContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting fetchbot");

    // Load configuration
    let config = match BotConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // External tools are checked again per invocation; this is just an
    // early operator hint.
    if fbot_media::check_ytdlp().is_err() {
        warn!("yt-dlp not found in PATH, downloads will fail");
    }
    if fbot_media::check_ffmpeg().is_err() {
        warn!("ffmpeg not found in PATH, oversized media will be delivered as-is");
    }

    // Open the user registry
    let registry = UserRegistry::new(&config.db_path);
    registry.init().await?;

    let bot = Bot::new(config.bot_token.clone());
    let ctx = Arc::new(BotContext::new(config, registry));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let ctx = Arc::clone(&ctx);
            move |msg: Message, bot: Bot| {
                let ctx = Arc::clone(&ctx);
                async move {
                    if let Err(e) = handlers::on_message(&ctx, &bot, &msg).await {
                        error!(error = %e, "Message handler failed");
                    }
                    respond(())
                }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let ctx = Arc::clone(&ctx);
            move |q: CallbackQuery, bot: Bot| {
                let ctx = Arc::clone(&ctx);
                async move {
                    if let Err(e) = handlers::on_callback(&ctx, &bot, &q).await {
                        error!(error = %e, "Callback handler failed");
                    }
                    respond(())
                }
            }
        }));

    info!("BOT STARTED");

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot shutdown complete");
    Ok(())
}
