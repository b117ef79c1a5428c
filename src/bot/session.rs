//! One bot session: dispatcher wiring and run loop
//!
//! Every session owns its bot, ledger and transport outright. Sessions
//! share nothing but the read-only settings, so a misbehaving chat or a
//! dead token never bleeds into the other thirteen bots.

use crate::bot::handlers::{self, Command};
use crate::bot::intake;
use crate::bot::ledger::ReactionLedger;
use crate::bot::reaction::ReactionTransport;
use crate::config::{
    get_reacted_cache_max_size, get_reacted_cache_ttl, get_reaction_rate_limit_ms, BotCredential,
    FleetSettings,
};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use teloxide::update_listeners::Polling;
use tracing::{error, info};

/// Per-session identity shared with handlers.
#[derive(Debug, Clone)]
pub struct SessionProfile {
    /// 1-based fleet position.
    pub position: usize,
    /// Fixed reaction emoji for this session.
    pub emoji: &'static str,
}

/// One independent bot with its own dispatcher, ledger and transport.
pub struct BotSession {
    bot: Bot,
    profile: Arc<SessionProfile>,
    ledger: Arc<ReactionLedger>,
    transport: Arc<ReactionTransport>,
    settings: Arc<FleetSettings>,
}

impl BotSession {
    /// Builds a session from one fleet credential.
    #[must_use]
    pub fn new(credential: &BotCredential, settings: Arc<FleetSettings>) -> Self {
        let bot = Bot::new(credential.token.clone());
        let profile = Arc::new(SessionProfile {
            position: credential.position,
            emoji: credential.emoji,
        });
        let ledger = Arc::new(ReactionLedger::new(
            get_reaction_rate_limit_ms(),
            get_reacted_cache_ttl(),
            get_reacted_cache_max_size(),
        ));
        let transport = Arc::new(ReactionTransport::new(credential.token.clone()));

        Self {
            bot,
            profile,
            ledger,
            transport,
            settings,
        }
    }

    /// Session position and emoji, for fleet logging.
    #[must_use]
    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    /// Runs this session's dispatcher until shutdown.
    ///
    /// Pending updates are dropped at startup so a restarted fleet does
    /// not replay a backlog of reactions.
    pub async fn run(self) {
        info!(
            "Bot {} ({}) starting.",
            self.profile.position, self.profile.emoji
        );

        let listener = Polling::builder(self.bot.clone())
            .drop_pending_updates()
            .build();

        Dispatcher::builder(self.bot, schema())
            .dependencies(dptree::deps![
                self.profile,
                self.ledger,
                self.transport,
                self.settings
            ])
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    }
}

fn schema() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_menu_callback))
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(
                    dptree::filter(|msg: Message| intake::is_reactable(&msg))
                        .endpoint(handle_reaction),
                ),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    settings: Arc<FleetSettings>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => handlers::start(bot, msg).await,
        Command::Help => handlers::help(bot, msg).await,
        Command::Status => handlers::status(bot, msg).await,
        Command::Ping => handlers::ping(bot, msg).await,
        Command::Support => handlers::support(bot, msg, settings).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_menu_callback(
    bot: Bot,
    q: CallbackQuery,
    settings: Arc<FleetSettings>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::menu_callback(bot, q, settings).await {
        error!("Menu callback error: {}", e);
    }
    respond(())
}

async fn handle_reaction(
    bot: Bot,
    msg: Message,
    profile: Arc<SessionProfile>,
    ledger: Arc<ReactionLedger>,
    transport: Arc<ReactionTransport>,
) -> Result<(), teloxide::RequestError> {
    handlers::react_to_message(bot, msg, profile, ledger, transport).await;
    respond(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_profile_follows_credential() {
        let credential = BotCredential {
            position: 3,
            token: "103:testtoken".to_string(),
            emoji: "😱",
        };
        let session = BotSession::new(&credential, Arc::new(FleetSettings::default()));

        assert_eq!(session.profile().position, 3);
        assert_eq!(session.profile().emoji, "😱");
    }
}
