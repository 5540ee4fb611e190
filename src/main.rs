mod chat;
mod commands;
mod config;
mod errors;
mod handlers;
mod schema;
mod transfer;
mod utils;
mod video;

use std::sync::Arc;

use teloxide::{prelude::*, utils::command::BotCommands};

use crate::{
    config::Config,
    errors::BotResult,
    schema::{Command, schema},
    video::{VideoExtractor, YtDlp},
};

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

#[tokio::main]
async fn main() -> BotResult<()> {
    let _ = dotenvy::dotenv();
    init_logging();

    let config = Config::from_env().inspect_err(|e| log::error!("{}", e))?;
    log::info!("Starting YouTube downloader bot...");

    let bot = config.bot()?;
    let extractor: Arc<dyn VideoExtractor> = Arc::new(YtDlp::from_config(&config));

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![extractor])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Bot stopped");
    Ok(())
}
