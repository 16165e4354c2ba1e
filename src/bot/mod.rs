//! Telegram command surface
//!
//! This module wires the bot's command set into teloxide's dispatcher:
//! - `generate`: the `/generate` command handler
//!
//! The dispatcher owns update polling and runs each incoming command as its
//! own task, so one slow generation job never blocks other chats.

mod generate;

use std::sync::Arc;

use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;

/// Commands understood by the bot
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "generate a track: /generate <theme> || <optional lyrics>")]
    Generate(String),
}

/// Run the bot until the process is stopped
pub async fn run(config: Config) -> Result<()> {
    let client = Arc::new(config.create_client()?);
    let config = Arc::new(config);
    let bot = Bot::new(config.telegram_token.clone());

    // Publish the command menu; also serves as an early token check
    bot.set_my_commands(Command::bot_commands()).await?;

    info!("Bot started. Press Ctrl-C to stop.");

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(generate::handle_command);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![client, config])
        .default_handler(|update| async move {
            debug!("Ignoring non-command update {:?}", update.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Command handler error"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    Ok(())
}
