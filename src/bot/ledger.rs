//! Per-bot reaction bookkeeping
//!
//! Tracks which messages a session has already reacted to and when each
//! chat last received a reaction, so a message is never reacted to twice
//! and no chat gets hit with a burst of reactions. Every session owns its
//! own ledger; nothing here is shared across bots.

use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Entries in the per-chat rate map go stale well within a minute, so the
/// cache can drop them aggressively regardless of the dedup TTL.
const RATE_WINDOW_TTL_SECS: u64 = 60;

/// Dedup and rate-limit state for a single bot session.
///
/// A message becomes ineligible once its chat received a reaction within
/// the rate-limit window, or once the message itself was already reacted
/// to. Both maps are only written after a delivery actually succeeded, so
/// failed deliveries stay retryable on the next update.
#[derive(Clone)]
pub struct ReactionLedger {
    /// Message id -> instant of the successful reaction.
    reacted: Cache<i32, Instant>,
    /// Chat id -> instant of the chat's most recent reaction.
    last_reaction: Cache<i64, Instant>,
    /// Minimum gap between reactions in the same chat.
    rate_limit: Duration,
    /// Counter for messages suppressed by the rate limit.
    rate_limited: Arc<AtomicU64>,
    /// Counter for messages suppressed as duplicates.
    deduped: Arc<AtomicU64>,
}

impl ReactionLedger {
    /// Creates a new `ReactionLedger` with the given parameters.
    ///
    /// # Arguments
    ///
    /// * `rate_limit_ms` - Minimum milliseconds between reactions per chat
    /// * `ttl_secs` - Time-to-live for dedup entries (auto-cleanup)
    /// * `max_capacity` - Maximum number of entries per map
    ///
    /// # Examples
    ///
    /// ```
    /// use reaction_fleet::bot::ReactionLedger;
    ///
    /// let ledger = ReactionLedger::new(
    ///     200,     // 200ms between reactions per chat
    ///     86_400,  // 24 hours dedup retention
    ///     100_000, // max 100k entries
    /// );
    /// ```
    #[must_use]
    pub fn new(rate_limit_ms: u64, ttl_secs: u64, max_capacity: u64) -> Self {
        let reacted = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        let last_reaction = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(RATE_WINDOW_TTL_SECS))
            .build();

        Self {
            reacted,
            last_reaction,
            rate_limit: Duration::from_millis(rate_limit_ms),
            rate_limited: Arc::new(AtomicU64::new(0)),
            deduped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Checks whether a message should receive a reaction.
    ///
    /// The chat rate limit is checked first, then the dedup map; the first
    /// failing check wins. `now` is the instant the message entered the
    /// pipeline and is the same value later passed to [`Self::record_success`].
    ///
    /// Suppressions are counted, with only every 100th occurrence logged
    /// to keep busy chats from flooding the log.
    pub async fn is_eligible(&self, chat_id: i64, message_id: i32, now: Instant) -> bool {
        if let Some(last) = self.last_reaction.get(&chat_id).await {
            if now.saturating_duration_since(last) < self.rate_limit {
                let count = self.rate_limited.fetch_add(1, Ordering::Relaxed) + 1;
                if count.is_multiple_of(100) {
                    debug!(
                        "Rate limit suppressed {} reactions (recent: message {} in chat {})",
                        count, message_id, chat_id
                    );
                }
                return false;
            }
        }

        if self.reacted.get(&message_id).await.is_some() {
            let count = self.deduped.fetch_add(1, Ordering::Relaxed) + 1;
            if count.is_multiple_of(100) {
                debug!(
                    "Dedup suppressed {} reactions (recent: message {} in chat {})",
                    count, message_id, chat_id
                );
            }
            return false;
        }

        true
    }

    /// Records a successfully delivered reaction.
    ///
    /// `now` must be the same instant that was passed to [`Self::is_eligible`],
    /// so the recorded timestamps reflect when the message entered the
    /// pipeline rather than when delivery finished.
    pub async fn record_success(&self, chat_id: i64, message_id: i32, now: Instant) {
        self.reacted.insert(message_id, now).await;
        self.last_reaction.insert(chat_id, now).await;
    }

    /// Returns the current number of dedup entries.
    ///
    /// Useful for monitoring and health checks.
    #[must_use]
    pub fn reacted_entry_count(&self) -> u64 {
        self.reacted.entry_count()
    }

    /// Returns the total number of reactions suppressed by the rate limit.
    #[must_use]
    pub fn rate_limited_count(&self) -> u64 {
        self.rate_limited.load(Ordering::Relaxed)
    }

    /// Returns the total number of reactions suppressed as duplicates.
    #[must_use]
    pub fn deduped_count(&self) -> u64 {
        self.deduped.load(Ordering::Relaxed)
    }

    /// Returns the configured per-chat rate limit.
    #[must_use]
    pub fn rate_limit(&self) -> Duration {
        self.rate_limit
    }
}
