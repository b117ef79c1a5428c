/// Command, callback and reaction handlers
pub mod handlers;
/// Intake filter for incoming messages
pub mod intake;
/// Per-session dedup and rate-limit bookkeeping
pub mod ledger;
/// Reaction delivery strategies (library call, raw HTTP fallback)
pub mod reaction;
/// Resilient messaging with automatic retry for Telegram API operations
pub mod resilient;
/// Session wiring: dispatcher schema and run loop
pub mod session;
/// View layer for UI components (keyboards, canned texts)
pub mod views;

pub use ledger::ReactionLedger;
pub use reaction::ReactionTransport;
pub use session::{BotSession, SessionProfile};
