use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};

use crate::{
    commands::start,
    errors::BotError,
    handlers::{is_media, link_received, media_received},
};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Show how to use the bot
    Start,
    /// Show how to use the bot
    Help,
}

pub fn schema() -> UpdateHandler<BotError> {
    Update::filter_message()
        .branch(
            // Filter for commands
            teloxide::filter_command::<Command, _>().endpoint(start),
        )
        // Any other text is treated as a link and validated by the transfer
        .branch(Message::filter_text().endpoint(link_received))
        .branch(dptree::filter(is_media).endpoint(media_received))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_help_are_commands() {
        assert!(matches!(Command::parse("/start", "relay_bot"), Ok(Command::Start)));
        assert!(matches!(Command::parse("/help", "relay_bot"), Ok(Command::Help)));
        assert!(matches!(
            Command::parse("/help@relay_bot", "relay_bot"),
            Ok(Command::Help)
        ));
        assert!(Command::parse("/download", "relay_bot").is_err());
        assert!(Command::parse("https://youtu.be/dQw4w9WgXcQ", "relay_bot").is_err());
    }
}
