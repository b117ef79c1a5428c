//! Reaction delivery strategies
//!
//! Delivers an emoji reaction to a message, first through the Bot API
//! client and then, if that fails, through a raw `setMessageReaction`
//! POST that bypasses the client entirely. Each strategy runs at most
//! once per attempt; a failed attempt is simply dropped so the message
//! can be retried when it next surfaces.

use crate::config::{get_telegram_api_base, REACTION_HTTP_TIMEOUT_SECS};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ReactionType};
use thiserror::Error;
use tracing::debug;

/// Errors produced by a single delivery strategy.
#[derive(Debug, Error)]
pub enum ReactionError {
    /// The Bot API client rejected the call or the transport failed.
    #[error("library call failed: {0}")]
    Library(#[from] teloxide::RequestError),
    /// The raw HTTP request failed before a response arrived.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The Bot API answered but did not confirm the reaction.
    #[error("api did not confirm reaction: status {status}, body {body}")]
    Unconfirmed {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

/// Delivery strategy identifiers, in attempt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `set_message_reaction` through the Bot API client.
    Library,
    /// Raw `setMessageReaction` POST against the Bot API.
    RawHttp,
}

/// Outcome of one strategy within a delivery attempt.
#[derive(Debug)]
pub struct StrategyOutcome {
    /// Which strategy ran.
    pub strategy: Strategy,
    /// `None` on success, the strategy's error otherwise.
    pub error: Option<ReactionError>,
}

/// Trace of a single delivery attempt across strategies.
///
/// Strategies run in a fixed order and the attempt stops at the first
/// success, so at most the final outcome can be a success. The trace is
/// transient; nothing stores it past the verdict and the log line.
#[derive(Debug)]
pub struct ReactionAttempt {
    /// Conversation the reaction targeted.
    pub chat_id: ChatId,
    /// Message the reaction targeted.
    pub message_id: MessageId,
    /// Emoji the session tried to deliver.
    pub emoji: String,
    /// Per-strategy outcomes in execution order.
    pub outcomes: Vec<StrategyOutcome>,
}

impl ReactionAttempt {
    fn new(chat_id: ChatId, message_id: MessageId, emoji: &str) -> Self {
        Self {
            chat_id,
            message_id,
            emoji: emoji.to_string(),
            outcomes: Vec::new(),
        }
    }

    fn push_success(&mut self, strategy: Strategy) {
        self.outcomes.push(StrategyOutcome {
            strategy,
            error: None,
        });
    }

    fn push_error(&mut self, strategy: Strategy, error: ReactionError) {
        self.outcomes.push(StrategyOutcome {
            strategy,
            error: Some(error),
        });
    }

    /// Returns `true` if any strategy confirmed the reaction.
    #[must_use]
    pub fn delivered(&self) -> bool {
        self.outcomes.iter().any(|o| o.error.is_none())
    }

    /// One-line description of every outcome, for logging.
    #[must_use]
    pub fn summary(&self) -> String {
        self.outcomes
            .iter()
            .map(|o| match &o.error {
                None => format!("{:?}: ok", o.strategy),
                Some(e) => format!("{:?}: {e}", o.strategy),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Whether a Bot API response body confirms the call succeeded.
///
/// Spaces are stripped and the body lowercased before looking for
/// `"ok":true`, so reformatted or oddly-cased responses still match.
#[must_use]
pub fn body_confirms_ok(body: &str) -> bool {
    body.replace(' ', "").to_lowercase().contains(r#""ok":true"#)
}

/// Delivers reactions for one bot token, falling back from the Bot API
/// client to a raw HTTP call.
pub struct ReactionTransport {
    token: String,
    api_base: String,
    http: Client,
}

impl ReactionTransport {
    /// Builds a transport against the configured Bot API base URL.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, get_telegram_api_base())
    }

    /// Builds a transport against a custom Bot API base URL.
    #[must_use]
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: api_base.into(),
            http: create_http_client(),
        }
    }

    /// Tries each strategy in order until one confirms the reaction.
    ///
    /// Never retries a strategy. The returned attempt records what every
    /// strategy did; callers decide what a failed attempt means.
    pub async fn deliver(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        message_id: MessageId,
        emoji: &str,
    ) -> ReactionAttempt {
        let mut attempt = ReactionAttempt::new(chat_id, message_id, emoji);

        match self.via_library(bot, chat_id, message_id, emoji).await {
            Ok(()) => {
                attempt.push_success(Strategy::Library);
                return attempt;
            }
            Err(e) => {
                debug!("Library reaction call failed, trying raw fallback: {e}");
                attempt.push_error(Strategy::Library, e);
            }
        }

        match self.via_raw_http(chat_id, message_id, emoji).await {
            Ok(()) => attempt.push_success(Strategy::RawHttp),
            Err(e) => attempt.push_error(Strategy::RawHttp, e),
        }

        attempt
    }

    async fn via_library(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), ReactionError> {
        bot.set_message_reaction(chat_id, message_id)
            .reaction(vec![ReactionType::Emoji {
                emoji: emoji.to_string(),
            }])
            .await?;
        Ok(())
    }

    /// Raw `setMessageReaction` POST, bypassing the Bot API client.
    ///
    /// Succeeds only on HTTP 200 with a body confirming `"ok":true`.
    ///
    /// # Errors
    ///
    /// Returns [`ReactionError::Http`] when the request itself fails and
    /// [`ReactionError::Unconfirmed`] when the API answers without
    /// confirming the reaction.
    pub async fn via_raw_http(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), ReactionError> {
        let body = json!({
            "chat_id": chat_id.0,
            "message_id": message_id.0,
            "reaction": [{ "type": "emoji", "emoji": emoji }],
        });

        let resp = self.http.post(self.endpoint()).json(&body).send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        if status == 200 && body_confirms_ok(&text) {
            Ok(())
        } else {
            Err(ReactionError::Unconfirmed { status, body: text })
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/setMessageReaction",
            self.api_base.trim_end_matches('/'),
            self.token
        )
    }
}

fn create_http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REACTION_HTTP_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfirmed(status: u16) -> ReactionError {
        ReactionError::Unconfirmed {
            status,
            body: String::new(),
        }
    }

    fn empty_attempt() -> ReactionAttempt {
        ReactionAttempt::new(ChatId(-100), MessageId(1), "❤️")
    }

    #[test]
    fn test_body_confirms_ok_plain() {
        assert!(body_confirms_ok(r#"{"ok":true,"result":true}"#));
    }

    #[test]
    fn test_body_confirms_ok_spaced_and_cased() {
        assert!(body_confirms_ok(r#"{ "ok" : true }"#));
        assert!(body_confirms_ok(r#"{"OK":TRUE}"#));
        assert!(body_confirms_ok(r#"{"Ok": True, "result": true}"#));
    }

    #[test]
    fn test_body_rejects_failure_and_noise() {
        assert!(!body_confirms_ok(r#"{"ok":false,"error_code":400}"#));
        assert!(!body_confirms_ok("ok:true"));
        assert!(!body_confirms_ok(""));
        // Only spaces are stripped, other whitespace breaks the match
        assert!(!body_confirms_ok("{\"ok\":\ntrue}"));
    }

    #[test]
    fn test_attempt_records_target() {
        let attempt = empty_attempt();
        assert_eq!(attempt.chat_id, ChatId(-100));
        assert_eq!(attempt.message_id, MessageId(1));
        assert_eq!(attempt.emoji, "❤️");
    }

    #[test]
    fn test_attempt_delivered() {
        let mut attempt = empty_attempt();
        assert!(!attempt.delivered());

        attempt.push_error(Strategy::Library, unconfirmed(400));
        assert!(!attempt.delivered());

        attempt.push_success(Strategy::RawHttp);
        assert!(attempt.delivered());
    }

    #[test]
    fn test_attempt_preserves_strategy_order() {
        let mut attempt = empty_attempt();
        attempt.push_error(Strategy::Library, unconfirmed(500));
        attempt.push_error(Strategy::RawHttp, unconfirmed(500));

        let order: Vec<Strategy> = attempt.outcomes.iter().map(|o| o.strategy).collect();
        assert_eq!(order, vec![Strategy::Library, Strategy::RawHttp]);
        assert!(!attempt.delivered());
    }

    #[test]
    fn test_attempt_summary_names_strategies() {
        let mut attempt = empty_attempt();
        attempt.push_error(Strategy::Library, unconfirmed(502));
        attempt.push_success(Strategy::RawHttp);

        let summary = attempt.summary();
        assert!(summary.contains("Library"));
        assert!(summary.contains("RawHttp: ok"));
    }

    #[test]
    fn test_endpoint_shaping() {
        let transport = ReactionTransport::with_api_base("123:abc", "https://api.telegram.org");
        assert_eq!(
            transport.endpoint(),
            "https://api.telegram.org/bot123:abc/setMessageReaction"
        );

        // Trailing slash on the base does not double up
        let transport = ReactionTransport::with_api_base("123:abc", "http://127.0.0.1:8081/");
        assert_eq!(
            transport.endpoint(),
            "http://127.0.0.1:8081/bot123:abc/setMessageReaction"
        );
    }
}
