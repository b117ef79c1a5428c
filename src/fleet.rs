//! Fleet orchestration: build every session up front, then run them
//! side by side
//!
//! Startup is all-or-nothing. [`FleetSettings`] refuses to load on a
//! partial token set, so by the time this module runs there is exactly
//! one credential per fleet position.

use crate::bot::BotSession;
use crate::config::FleetSettings;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Builds all bot sessions and runs them until shutdown.
///
/// Sessions poll independently, so one bot losing its connection does
/// not stall the other thirteen. Returns once every dispatcher has
/// wound down, normally after Ctrl+C.
pub async fn run(settings: FleetSettings) {
    let settings = Arc::new(settings);
    let sessions = build_sessions(&settings);
    let count = sessions.len();

    info!("✅ Loaded {count} bots with fixed emojis.");

    let mut fleet = JoinSet::new();
    for session in sessions {
        fleet.spawn(session.run());
    }

    info!("🚀 All {count} bots running... Press Ctrl+C to stop.");

    while let Some(res) = fleet.join_next().await {
        if let Err(e) = res {
            warn!("Bot session task ended abnormally: {}", e);
        }
    }
}

fn build_sessions(settings: &Arc<FleetSettings>) -> Vec<BotSession> {
    settings
        .credentials()
        .iter()
        .map(|credential| BotSession::new(credential, Arc::clone(settings)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FLEET_SIZE, SESSION_EMOJIS};

    #[test]
    fn test_fleet_builds_one_session_per_token() {
        let settings = Arc::new(FleetSettings {
            owner_username: None,
            tokens: (1..=FLEET_SIZE).map(|i| format!("10{i}:tok")).collect(),
        });

        let sessions = build_sessions(&settings);

        assert_eq!(sessions.len(), FLEET_SIZE);
        for (i, session) in sessions.iter().enumerate() {
            assert_eq!(session.profile().position, i + 1);
            assert_eq!(session.profile().emoji, SESSION_EMOJIS[i]);
        }
    }
}
