#![deny(missing_docs)]
//! Auto Reaction Fleet
//!
//! Runs fourteen Telegram bots side by side. Each bot owns one fixed emoji
//! and reacts with it to every new message it can see, with per-chat rate
//! limiting and per-message dedup so a message is never reacted to twice.

/// Telegram bot sessions, handlers and the reaction pipeline
pub mod bot;
/// Configuration management
pub mod config;
/// Fleet startup and session orchestration
pub mod fleet;
