//! Configuration and settings management
//!
//! Loads fleet settings from environment variables and defines the fixed
//! emoji assignment plus cache and delivery tuning constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Number of bot sessions in the fleet.
pub const FLEET_SIZE: usize = 14;

/// Fixed reaction emojis assigned to fleet positions (serial).
///
/// Position 1 gets the first emoji, position 14 the last.
pub const SESSION_EMOJIS: [&str; FLEET_SIZE] = [
    "❤️", // 1
    "👀", // 2
    "😱", // 3
    "🤡", // 4
    "👻", // 5
    "💋", // 6
    "🙈", // 7
    "💯", // 8
    "👍", // 9
    "🥰", // 10
    "🎉", // 11
    "⚡", // 12
    "🔥", // 13
    "🌚", // 14
];

/// Support contact shown by /support when `OWNER_USERNAME` is not set.
pub const DEFAULT_OWNER_USERNAME: &str = "@YourUsername";

/// Minimum gap (milliseconds) between reactions in the same chat.
pub const REACTION_RATE_LIMIT_MS: u64 = 200;
/// Time-to-live (seconds) for reacted-message dedup entries.
/// Default: 24 hours.
pub const REACTED_CACHE_TTL_SECS: u64 = 86_400;
/// Maximum dedup cache capacity (number of entries).
pub const REACTED_CACHE_MAX_SIZE: u64 = 100_000;

/// Total timeout (seconds) for the raw `setMessageReaction` request.
pub const REACTION_HTTP_TIMEOUT_SECS: u64 = 8;
/// Default Bot API base URL for the raw delivery fallback.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Initial backoff delay for retried Telegram send operations.
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Maximum backoff delay for retried Telegram send operations.
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4000;
/// Maximum retry attempts for retried Telegram send operations.
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;

/// Get the per-chat reaction rate limit from env or default.
///
/// Environment variable: `REACTION_RATE_LIMIT_MS`.
#[must_use]
pub fn get_reaction_rate_limit_ms() -> u64 {
    std::env::var("REACTION_RATE_LIMIT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(REACTION_RATE_LIMIT_MS)
}

/// Get the dedup cache TTL from env or default.
///
/// Environment variable: `REACTED_CACHE_TTL_SECS`.
#[must_use]
pub fn get_reacted_cache_ttl() -> u64 {
    std::env::var("REACTED_CACHE_TTL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(REACTED_CACHE_TTL_SECS)
}

/// Get the dedup cache max size from env or default.
///
/// Environment variable: `REACTED_CACHE_MAX_SIZE`.
#[must_use]
pub fn get_reacted_cache_max_size() -> u64 {
    std::env::var("REACTED_CACHE_MAX_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(REACTED_CACHE_MAX_SIZE)
}

/// Get the Bot API base URL from env or default.
///
/// Environment variable: `TELEGRAM_API_BASE`.
#[must_use]
pub fn get_telegram_api_base() -> String {
    std::env::var("TELEGRAM_API_BASE")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| TELEGRAM_API_BASE.to_string())
}

/// One bot's identity within the fleet.
#[derive(Debug, Clone)]
pub struct BotCredential {
    /// 1-based fleet position.
    pub position: usize,
    /// Telegram Bot API token.
    pub token: String,
    /// Fixed reaction emoji for this position.
    pub emoji: &'static str,
}

/// Fleet settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FleetSettings {
    /// Support contact shown by the /support command.
    pub owner_username: Option<String>,

    /// Bot tokens in fleet order (index 0 holds `BOT_1_TOKEN`).
    #[serde(skip)]
    pub tokens: Vec<String>,
}

impl FleetSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// All of `BOT_1_TOKEN` through `BOT_14_TOKEN` must be present and
    /// non-blank; the fleet refuses to start on a partial set.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use reaction_fleet::config::FleetSettings;
    ///
    /// let settings = FleetSettings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first missing token variable,
    /// or if config loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Note: Environment::default() auto-converts UPPER_SNAKE_CASE to snake_case
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        // Fallback: check the environment directly if config didn't pick it up
        if settings.owner_username.is_none() {
            if let Ok(val) = std::env::var("OWNER_USERNAME") {
                if !val.is_empty() {
                    settings.owner_username = Some(val);
                }
            }
        }

        settings.tokens = load_fleet_tokens()?;

        Ok(settings)
    }

    /// Returns the support contact, falling back to the default placeholder.
    #[must_use]
    pub fn owner_username(&self) -> &str {
        self.owner_username
            .as_deref()
            .unwrap_or(DEFAULT_OWNER_USERNAME)
    }

    /// Pairs each loaded token with its fleet position and fixed emoji.
    #[must_use]
    pub fn credentials(&self) -> Vec<BotCredential> {
        self.tokens
            .iter()
            .zip(SESSION_EMOJIS.iter())
            .enumerate()
            .map(|(i, (token, emoji))| BotCredential {
                position: i + 1,
                token: token.clone(),
                emoji,
            })
            .collect()
    }
}

/// Reads `BOT_1_TOKEN` through `BOT_14_TOKEN`, treating blank values as unset.
fn load_fleet_tokens() -> Result<Vec<String>, ConfigError> {
    let mut tokens = Vec::with_capacity(FLEET_SIZE);

    for position in 1..=FLEET_SIZE {
        let name = format!("BOT_{position}_TOKEN");
        let token = std::env::var(&name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        match token {
            Some(token) => tokens.push(token),
            None => {
                return Err(ConfigError::Message(format!(
                    "{name} environment variable not set"
                )))
            }
        }
    }

    Ok(tokens)
}
