//! Main Telegram bot implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use dicebot_core::{Command, EventDispatcher, SessionState};
use dicebot_persistence::AdminListStore;
use teloxide::dispatching::{DefaultKey, Dispatcher, UpdateFilterExt, UpdateHandler};
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::requests::Requester;
use teloxide::types::{BotCommand, Message, Update};
use teloxide::update_listeners::webhooks;
use teloxide::{dptree, respond, Bot, RequestError};
use tracing::{debug, error, info};
use url::Url;

use crate::config::{BotConfig, Transport};
use crate::convert::{command_event, dice_event, parse_command};
use crate::error::{Result, TelegramError};
use crate::gateway::TelegramGateway;
use crate::prize::HttpPrizeIssuer;
use crate::webhook::{liveness_router, webhook_url};

/// The dice notifier bot.
pub struct DiceBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// State machine shared by all handlers.
    dispatcher: Arc<EventDispatcher>,
    config: BotConfig,
}

impl DiceBot {
    /// Builds the bot, loading the admin list if persistence is configured.
    pub fn new(config: BotConfig) -> Result<Self> {
        let bot = Bot::new(&config.token);

        let state = match &config.admins_file {
            Some(path) => {
                info!(path = %path.display(), "Admin list persistence enabled");
                SessionState::with_store(AdminListStore::new(path))
            }
            None => SessionState::new(),
        };

        let gateway = Arc::new(TelegramGateway::new(bot.clone()));
        let mut dispatcher =
            EventDispatcher::new(Arc::new(state), gateway, config.dispatch.clone());

        match &config.prize_url {
            Some(url) => {
                let issuer = HttpPrizeIssuer::new(url)?;
                info!(endpoint = %issuer.endpoint(), "Prize issuance enabled");
                dispatcher = dispatcher.with_prize_issuer(Arc::new(issuer));
            }
            None => debug!("No PRIZE_URL, prize issuance disabled"),
        }

        info!(audience = %config.dispatch.audience, "Notification audience policy");

        Ok(Self {
            bot,
            dispatcher: Arc::new(dispatcher),
            config,
        })
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Publishes the command menu shown by Telegram clients.
    pub async fn register_commands(&self) -> Result<()> {
        let commands: Vec<BotCommand> = Command::ALL
            .iter()
            .map(|cmd| BotCommand::new(cmd.name(), cmd.description()))
            .collect();
        self.bot
            .set_my_commands(commands)
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(())
    }

    /// Runs the bot with the configured transport until Ctrl+C.
    pub async fn start(&self) -> Result<()> {
        match &self.config.transport {
            Transport::Polling => self.start_polling().await,
            Transport::Webhook { base_url, port } => self.start_webhook(base_url, *port).await,
        }
    }

    /// Start the bot in long polling mode.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting bot in polling mode...");

        let username = self.get_me().await?;
        let mut dispatcher = self.build_dispatcher(username);

        info!("Bot is running! Send /start to begin.");
        dispatcher.dispatch().await;
        Ok(())
    }

    /// Start the bot behind a webhook served on `0.0.0.0:<port>`.
    ///
    /// Registers `<base_url>/bot<token>` with Telegram and serves it together
    /// with a `GET /` liveness route.
    pub async fn start_webhook(&self, base_url: &Url, port: u16) -> Result<()> {
        info!(port, "Starting bot in webhook mode...");

        let username = self.get_me().await?;
        let url = webhook_url(base_url, &self.config.token)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let options = webhooks::Options::new(addr, url);
        let (listener, stop_flag, router) = webhooks::axum_to_router(self.bot.clone(), options)
            .await
            .map_err(|e| TelegramError::WebhookFailed(e.to_string()))?;
        info!(base_url = %base_url, "Webhook registered");

        let app = router.merge(liveness_router());
        let tcp = tokio::net::TcpListener::bind(addr).await?;
        info!(addr = %addr, "Webhook server listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(tcp, app)
                .with_graceful_shutdown(stop_flag)
                .await
            {
                error!(error = %e, "Webhook server failed");
            }
        });

        let mut dispatcher = self.build_dispatcher(username);
        info!("Bot is running! Send /start to begin.");
        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
            )
            .await;
        Ok(())
    }

    fn build_dispatcher(&self, username: String) -> Dispatcher<Bot, RequestError, DefaultKey> {
        Dispatcher::builder(self.bot.clone(), self.handler(username))
            .default_handler(|upd| async move {
                debug!(update_id = ?upd.id, "Update ignored");
            })
            .enable_ctrlc_handler()
            .build()
    }

    /// Update routing: bot commands first, then dice messages.
    fn handler(&self, username: String) -> UpdateHandler<RequestError> {
        let for_commands = Arc::clone(&self.dispatcher);
        let for_dice = Arc::clone(&self.dispatcher);

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_map(move |msg: Message| parse_command(&msg, Some(username.as_str())))
                    .endpoint(move |msg: Message, cmd: Command| {
                        let dispatcher = Arc::clone(&for_commands);
                        debug!(chat_id = %msg.chat.id, command = cmd.name(), "Command received");
                        async move {
                            dispatcher.handle_command(command_event(&msg, cmd)).await;
                            respond(())
                        }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter_map(|msg: Message| dice_event(&msg))
                    .endpoint(move |event: dicebot_core::DiceEvent| {
                        let dispatcher = Arc::clone(&for_dice);
                        async move {
                            // Deliveries run detached; nothing to wait for here.
                            dispatcher.handle_dice(event).await;
                            respond(())
                        }
                    }),
            )
    }
}
