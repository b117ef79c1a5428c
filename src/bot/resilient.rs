//! Resilient messaging utilities with automatic retry for Telegram API operations.
//!
//! Command replies go through these wrappers so a transient network blip
//! does not eat a canned response. The reaction pipeline never does: a
//! reaction either lands on the first pass of its strategies or waits for
//! the message to surface again.

use crate::config::{
    TELEGRAM_API_INITIAL_BACKOFF_MS, TELEGRAM_API_MAX_BACKOFF_MS, TELEGRAM_API_MAX_RETRIES,
};
use anyhow::Result;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, Message, MessageId};
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use tracing::warn;

/// Retry a Telegram API operation with exponential backoff.
///
/// The retry strategy uses exponential backoff with jitter to avoid
/// thundering herd:
/// - Initial delay: 500ms
/// - Max delay: 4s
/// - Max retries: 3 (constants in `config.rs`)
///
/// # Errors
///
/// Returns the last error if all attempts fail.
pub async fn retry_telegram_operation<F, Fut, T>(operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let retry_strategy = ExponentialBackoff::from_millis(TELEGRAM_API_INITIAL_BACKOFF_MS)
        .max_delay(Duration::from_millis(TELEGRAM_API_MAX_BACKOFF_MS))
        .map(jitter) // Add jitter to prevent thundering herd
        .take(TELEGRAM_API_MAX_RETRIES);

    Retry::spawn(retry_strategy, operation).await.map_err(|e| {
        warn!(
            "Telegram API operation failed after {} attempts: {}",
            TELEGRAM_API_MAX_RETRIES, e
        );
        e
    })
}

/// Send a message with automatic retry on network failures.
///
/// # Arguments
///
/// * `bot` - The Telegram bot instance
/// * `chat_id` - Target chat ID
/// * `text` - Message text to send
/// * `markup` - Optional inline keyboard to attach
///
/// # Errors
///
/// Returns an error after all retries are exhausted.
pub async fn send_message_resilient(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
    markup: Option<InlineKeyboardMarkup>,
) -> Result<Message> {
    let text = text.into();
    retry_telegram_operation(|| async {
        let mut req = bot.send_message(chat_id, text.clone());
        if let Some(markup) = markup.clone() {
            req = req.reply_markup(markup);
        }
        req.await
            .map_err(|e| anyhow::anyhow!("Telegram send error: {e}"))
    })
    .await
}

/// Edit a message with automatic retry on network failures.
///
/// # Errors
///
/// Returns an error after all retries are exhausted; callers typically
/// fall back to sending a fresh message instead.
pub async fn edit_message_resilient(
    bot: &Bot,
    chat_id: ChatId,
    msg_id: MessageId,
    text: impl Into<String>,
    markup: Option<InlineKeyboardMarkup>,
) -> Result<Message> {
    let text = text.into();
    retry_telegram_operation(|| async {
        let mut req = bot.edit_message_text(chat_id, msg_id, text.clone());
        if let Some(markup) = markup.clone() {
            req = req.reply_markup(markup);
        }
        req.await
            .map_err(|e| anyhow::anyhow!("Telegram edit error: {e}"))
    })
    .await
}
