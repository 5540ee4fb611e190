use std::sync::Arc;

use teloxide::prelude::*;

use crate::{
    errors::HandlerResult,
    transfer::{self, Outcome, TransferRequest},
    video::VideoExtractor,
};

pub async fn link_received(
    bot: Bot,
    msg: Message,
    text: String,
    extractor: Arc<dyn VideoExtractor>,
) -> HandlerResult {
    let request = TransferRequest {
        chat_id: msg.chat.id,
        message_id: msg.id,
        text: &text,
    };

    match transfer::relay(&bot, extractor.as_ref(), request).await? {
        Outcome::Rejected => {
            log::debug!("Message {} in chat {} is not a link", msg.id.0, msg.chat.id)
        }
        Outcome::Delivered { title } => {
            log::debug!("Delivered \"{}\" to chat {}", title, msg.chat.id)
        }
        Outcome::Failed(failure) => {
            log::debug!("Request {} in chat {} failed: {}", msg.id.0, msg.chat.id, failure)
        }
    }
    Ok(())
}
