//! Command, callback and reaction handlers
//!
//! The five canned commands and the inline-menu callbacks funnel into the
//! same senders, matching button behavior to command behavior. The
//! reaction handler runs every other message through the ledger and the
//! delivery strategies.

use crate::bot::ledger::ReactionLedger;
use crate::bot::reaction::ReactionTransport;
use crate::bot::resilient::{edit_message_resilient, send_message_resilient};
use crate::bot::session::SessionProfile;
use crate::bot::views;
use crate::config::FleetSettings;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Instant;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
#[must_use]
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Supported commands for the bot
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Activate the bot.")]
    Start,
    /// Show usage instructions
    #[command(description = "How to use the bot.")]
    Help,
    /// Show the canned status report
    #[command(description = "Check bot status.")]
    Status,
    /// Measure the reply round trip
    #[command(description = "Bot response test.")]
    Ping,
    /// Show the support contact
    #[command(description = "Contact support.")]
    Support,
}

async fn send_start(bot: &Bot, chat_id: ChatId) -> Result<()> {
    send_message_resilient(bot, chat_id, views::START_TEXT, Some(views::main_menu())).await?;
    Ok(())
}

async fn send_help(bot: &Bot, chat_id: ChatId) -> Result<()> {
    send_message_resilient(bot, chat_id, views::HELP_TEXT, Some(views::main_menu())).await?;
    Ok(())
}

async fn send_status(bot: &Bot, chat_id: ChatId) -> Result<()> {
    send_message_resilient(bot, chat_id, views::STATUS_TEXT, Some(views::main_menu())).await?;
    Ok(())
}

/// Sends the ping placeholder, measures the round trip, then edits the
/// result in place. The placeholder send is deliberately not retried:
/// retries would inflate the reported latency.
async fn send_ping(bot: &Bot, chat_id: ChatId) -> Result<()> {
    let t0 = Instant::now();
    let sent = bot
        .send_message(chat_id, views::PING_PENDING_TEXT)
        .reply_markup(views::main_menu())
        .await?;
    let latency_ms = t0.elapsed().as_millis();

    let text = views::ping_result_text(latency_ms);
    let edited = edit_message_resilient(
        bot,
        chat_id,
        sent.id,
        text.clone(),
        Some(views::main_menu()),
    )
    .await;

    if let Err(e) = edited {
        debug!("Ping edit failed, sending a fresh message instead: {e}");
        send_message_resilient(bot, chat_id, text, Some(views::main_menu())).await?;
    }

    Ok(())
}

async fn send_support(bot: &Bot, chat_id: ChatId, settings: &FleetSettings) -> Result<()> {
    let text = views::support_text(settings.owner_username());
    send_message_resilient(bot, chat_id, text, Some(views::main_menu())).await?;
    Ok(())
}

/// /start handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("User {user_id} initiated /start command.");
    send_start(&bot, msg.chat.id).await
}

/// /help handler
///
/// # Errors
///
/// Returns an error if the help message cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("User {user_id} initiated /help command.");
    send_help(&bot, msg.chat.id).await
}

/// /status handler
///
/// # Errors
///
/// Returns an error if the status message cannot be sent.
pub async fn status(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("User {user_id} initiated /status command.");
    send_status(&bot, msg.chat.id).await
}

/// /ping handler
///
/// # Errors
///
/// Returns an error if neither the edit nor the fallback send succeeds.
pub async fn ping(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("User {user_id} initiated /ping command.");
    send_ping(&bot, msg.chat.id).await
}

/// /support handler
///
/// # Errors
///
/// Returns an error if the support message cannot be sent.
pub async fn support(bot: Bot, msg: Message, settings: Arc<FleetSettings>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("User {user_id} initiated /support command.");
    send_support(&bot, msg.chat.id, &settings).await
}

/// Inline menu callback handler.
///
/// Acknowledges the press, then replies exactly as the matching command
/// would. Unrecognized callback data gets a short notice.
///
/// # Errors
///
/// Returns an error if the callback carries no usable chat or the reply
/// cannot be sent.
pub async fn menu_callback(bot: Bot, q: CallbackQuery, settings: Arc<FleetSettings>) -> Result<()> {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let _ = bot.answer_callback_query(q.id.clone()).await;

    let user_id = q.from.id.0.cast_signed();
    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .ok_or_else(|| anyhow!("Callback message missing chat id"))?;

    info!("User {user_id} pressed menu button '{data}'.");

    match data {
        views::MENU_CALLBACK_START => send_start(&bot, chat_id).await,
        views::MENU_CALLBACK_HELP => send_help(&bot, chat_id).await,
        views::MENU_CALLBACK_STATUS => send_status(&bot, chat_id).await,
        views::MENU_CALLBACK_PING => send_ping(&bot, chat_id).await,
        views::MENU_CALLBACK_SUPPORT => send_support(&bot, chat_id, &settings).await,
        _ => {
            send_message_resilient(&bot, chat_id, views::UNKNOWN_ACTION_TEXT, None).await?;
            Ok(())
        }
    }
}

/// Reacts to one incoming message with the session's fixed emoji.
///
/// Runs the ledger eligibility check, delivers through the transport
/// strategies and records the success. A failed delivery records nothing
/// and raises no error, so the message can react on a later appearance.
pub async fn react_to_message(
    bot: Bot,
    msg: Message,
    profile: Arc<SessionProfile>,
    ledger: Arc<ReactionLedger>,
    transport: Arc<ReactionTransport>,
) {
    let chat_id = msg.chat.id;
    let message_id = msg.id;
    let now = Instant::now();

    if !ledger.is_eligible(chat_id.0, message_id.0, now).await {
        return;
    }

    let attempt = transport
        .deliver(&bot, chat_id, message_id, profile.emoji)
        .await;

    if attempt.delivered() {
        ledger.record_success(chat_id.0, message_id.0, now).await;
        debug!(
            "Bot {} reacted {} to message {} in chat {}",
            profile.position, attempt.emoji, message_id.0, chat_id.0
        );
    } else {
        warn!(
            "Bot {} could not react to message {} in chat {}: {}",
            profile.position,
            message_id.0,
            chat_id.0,
            attempt.summary()
        );
    }
}
