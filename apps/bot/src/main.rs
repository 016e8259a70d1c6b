mod actions;
mod config;
mod format;
mod handlers;
mod keyboards;
mod models;
mod payment;
mod session;
mod slots;
mod storage;

use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};

use config::Config;
use handlers::{handle_callback, handle_command, BotState, Command};
use session::SessionStore;
use storage::JsonStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let bot = Bot::new(&config.bot_token);

    let store = JsonStore::new(config.data_file.clone());
    let services = store.services().await?;
    if services.is_empty() {
        tracing::warn!(
            "No services in {} — seed the file before taking bookings",
            store.path().display()
        );
    }

    tracing::info!(
        "📅 Booking demo bot starting ({} services, payments via {})",
        services.len(),
        config.pay_base_url
    );

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    let state = Arc::new(BotState {
        config,
        store,
        sessions: SessionStore::new(),
    });

    // Handle commands + callback queries (inline buttons)
    let cmd_handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint({
            let state = state.clone();
            move |bot: Bot, msg: Message, cmd: Command| {
                let state = state.clone();
                async move {
                    handle_command(bot, msg, cmd, &state).await?;
                    Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
                }
            }
        });

    let callback_handler = Update::filter_callback_query().endpoint({
        let state = state.clone();
        move |bot: Bot, q: CallbackQuery| {
            let state = state.clone();
            async move {
                handle_callback(bot, q, &state).await?;
                Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
            }
        }
    });

    let handler = dptree::entry()
        .branch(cmd_handler)
        .branch(callback_handler);

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
