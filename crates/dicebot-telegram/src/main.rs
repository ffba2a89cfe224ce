//! Dice notifier bot binary.
//!
//! Start the bot with:
//! ```bash
//! BOT_TOKEN=xxx cargo run -p dicebot-telegram
//! ```

use std::path::Path;

use clap::Parser;
use dicebot_telegram::{Args, BotConfig, DiceBot, Transport};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env first so clap's env fallbacks can see it
    let env_loaded = dotenvy::dotenv().is_ok();

    let args = Args::parse();

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "dicebot=info,dicebot_telegram=info,dicebot_core=info,dicebot_persistence=info,teloxide=warn",
        1 => "dicebot=debug,dicebot_telegram=debug,dicebot_core=debug,dicebot_persistence=debug,teloxide=info",
        2 => "dicebot=trace,dicebot_telegram=trace,dicebot_core=trace,dicebot_persistence=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Ok(cwd) = std::env::current_dir() {
        tracing::info!(cwd = %cwd.display(), "Working directory");
    }
    tracing::info!(
        env_file = Path::new(".env").exists(),
        loaded = env_loaded,
        ".env status"
    );

    let config = match BotConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    tracing::info!(token_len = config.token.len(), "Bot token loaded");

    let bot = DiceBot::new(config.clone())?;

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[dice] Dice Notifier Bot");
            println!("   Bot: @{}", username);
            println!(
                "   Mode: {}",
                match config.transport {
                    Transport::Polling => "polling",
                    Transport::Webhook { .. } => "webhook",
                }
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    if let Err(e) = bot.register_commands().await {
        tracing::warn!(error = %e, "Failed to register command menu");
    }

    println!("\n   Send /start in a group (as admin) and in a private chat with the bot");
    println!("   Press Ctrl+C to stop\n");

    bot.start().await?;

    Ok(())
}
