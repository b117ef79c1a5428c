//! Incoming message intake filter
//!
//! Decides which messages enter the reaction pipeline at all. Everything
//! else about eligibility (dedup, rate limiting) lives in the ledger.

use teloxide::types::{Message, MessageKind};

/// Whether an incoming message should receive an automatic reaction.
///
/// Bot-authored messages are ignored so fleets of bots never feed each
/// other, and service updates (member joins, pins and the like) carry no
/// content worth reacting to. Messages without a sender, such as channel
/// posts, still qualify.
#[must_use]
pub fn is_reactable(msg: &Message) -> bool {
    if msg.from.as_ref().is_some_and(|user| user.is_bot) {
        return false;
    }

    matches!(msg.kind, MessageKind::Common(_))
}
