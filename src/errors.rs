use std::fmt;

/// Central error type for the bot
#[derive(Debug)]
pub enum BotError {
    /// Startup configuration is missing or malformed
    ConfigError(String),
    /// Telegram Bot API errors
    TelegramError(teloxide::RequestError),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            BotError::TelegramError(e) => write!(f, "Telegram API error: {}", e),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BotError::TelegramError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<teloxide::RequestError> for BotError {
    fn from(err: teloxide::RequestError) -> Self {
        BotError::TelegramError(err)
    }
}

impl BotError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result of bot operations
pub type BotResult<T> = Result<T, BotError>;

/// Result for handlers
pub type HandlerResult = BotResult<()>;
