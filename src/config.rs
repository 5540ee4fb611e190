use std::{env, time::Duration};

use teloxide::Bot;
use url::Url;

use crate::errors::{BotError, BotResult};

const DEFAULT_YTDLP_PATH: &str = "yt-dlp";
const DEFAULT_SOCKET_TIMEOUT_SECS: u64 = 15;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 600;

/// Process configuration read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// Custom Bot API server, e.g. a local `telegram-bot-api` instance
    pub api_url: Option<Url>,
    pub ytdlp_path: String,
    pub socket_timeout: u64,
    pub upload_timeout: Duration,
}

impl Config {
    pub fn from_env() -> BotResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BotResult<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("TELOXIDE_TOKEN")
            .or_else(|| get("BOT_TOKEN"))
            .ok_or_else(|| BotError::config("TELOXIDE_TOKEN (or BOT_TOKEN) is not set"))?;

        let api_url = get("BOT_API_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| BotError::config(format!("Invalid BOT_API_URL: {}", e)))
            })
            .transpose()?;

        let socket_timeout = parse_secs(get("YTDLP_SOCKET_TIMEOUT"), "YTDLP_SOCKET_TIMEOUT")?
            .unwrap_or(DEFAULT_SOCKET_TIMEOUT_SECS);
        let upload_timeout = parse_secs(get("UPLOAD_TIMEOUT"), "UPLOAD_TIMEOUT")?
            .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS);

        Ok(Self {
            token,
            api_url,
            ytdlp_path: get("YTDLP_PATH").unwrap_or_else(|| DEFAULT_YTDLP_PATH.to_string()),
            socket_timeout,
            upload_timeout: Duration::from_secs(upload_timeout),
        })
    }

    /// Build the Bot API client. The default teloxide client times out long
    /// before a large upload finishes, so the timeout is raised here.
    pub fn bot(&self) -> BotResult<Bot> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(self.upload_timeout)
            .build()
            .map_err(|e| BotError::config(format!("Failed to build HTTP client: {}", e)))?;

        let bot = Bot::with_client(&self.token, client);
        Ok(match &self.api_url {
            Some(url) => bot.set_api_url(url.clone()),
            None => bot,
        })
    }
}

fn parse_secs(value: Option<String>, key: &str) -> BotResult<Option<u64>> {
    value
        .map(|raw| {
            raw.parse::<u64>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or_else(|| BotError::config(format!("{} must be a positive number of seconds, got '{}'", key, raw)))
        })
        .transpose()
}
