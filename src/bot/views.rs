//! Shared UI components
//!
//! The inline menu, its callback constants and every canned reply text.
//! Commands and menu buttons deliberately produce identical replies.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// ─────────────────────────────────────────────────────────────────────────────
// Callback constants
// ─────────────────────────────────────────────────────────────────────────────

/// Callback data for the Start menu button
pub const MENU_CALLBACK_START: &str = "start";
/// Callback data for the Help menu button
pub const MENU_CALLBACK_HELP: &str = "help";
/// Callback data for the Status menu button
pub const MENU_CALLBACK_STATUS: &str = "status";
/// Callback data for the Ping menu button
pub const MENU_CALLBACK_PING: &str = "ping";
/// Callback data for the Support menu button
pub const MENU_CALLBACK_SUPPORT: &str = "support";

// ─────────────────────────────────────────────────────────────────────────────
// Keyboards
// ─────────────────────────────────────────────────────────────────────────────

/// The five-button inline menu attached to every canned reply.
#[must_use]
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("🚀 Start", MENU_CALLBACK_START),
            InlineKeyboardButton::callback("📘 Help", MENU_CALLBACK_HELP),
        ],
        vec![
            InlineKeyboardButton::callback("📊 Status", MENU_CALLBACK_STATUS),
            InlineKeyboardButton::callback("⚠️ Ping", MENU_CALLBACK_PING),
        ],
        vec![InlineKeyboardButton::callback(
            "🛠 Support",
            MENU_CALLBACK_SUPPORT,
        )],
    ])
}

// ─────────────────────────────────────────────────────────────────────────────
// Reply texts
// ─────────────────────────────────────────────────────────────────────────────

/// Welcome text for /start.
pub const START_TEXT: &str = "🤖 Auto Reaction Bot Activated!\n\n\
    📌 Just add me to any group.\n\
    📌 No admin permission required.\n\
    📌 I will automatically react to every new message instantly.\n\n\
    ✨ Enjoy ultra-fast auto reactions!";

/// Usage guide for /help.
pub const HELP_TEXT: &str = "❓ Need Help?\n\n\
    Here’s how to use this bot 👇\n\n\
    1️⃣ Add the bot to your group\n\
    2️⃣ No setup needed\n\
    3️⃣ Every new message gets an instant auto-reaction\n\
    4️⃣ Works 24/7 and ultra-fast\n\n\
    ⚙️ Commands:\n\
    /start – Activate the bot\n\
    /status – Check bot status\n\
    /ping – Bot response test\n\
    /support – Contact support\n";

/// Canned status report for /status.
pub const STATUS_TEXT: &str = "📊 Bot Status\n\n\
    ✅ Auto Reaction: Active\n\
    ⚡ Speed: Ultra-Fast\n\
    🟢 Server: Online\n\
    🕒 Uptime: 24/7\n\n\
    Everything is running perfectly! 🚀";

/// Placeholder sent by /ping while the round trip is measured.
pub const PING_PENDING_TEXT: &str = "⚠ Ping!\n\n⏱️ Calculating response time...";

/// Reply for unrecognized menu callbacks.
pub const UNKNOWN_ACTION_TEXT: &str = "Unknown action.";

/// Final /ping text with the measured round trip.
#[must_use]
pub fn ping_result_text(latency_ms: u128) -> String {
    format!("⚠ Ping!\n\n⏱️ Response Time: {latency_ms} ms\n⚡ Status: Smooth & Fast")
}

/// Support contact text for /support.
#[must_use]
pub fn support_text(owner: &str) -> String {
    format!(
        "🛠️ Support Center\n\n\
        If you need any help, feel free to contact:\n\
        👤 Owner: {owner}\n\n\
        We are here to assist you 24/7 😊"
    )
}
