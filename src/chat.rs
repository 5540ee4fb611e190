use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InputFile, MessageId, ParseMode, ReplyParameters},
};

use crate::errors::BotResult;

/// The chat operations a transfer needs. Texts are Telegram HTML.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Reply to `reply_to` and return the id of the new message.
    async fn reply_text(&self, chat_id: ChatId, reply_to: MessageId, text: &str)
    -> BotResult<MessageId>;

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> BotResult<()>;

    /// Upload `payload` as a video replying to `reply_to`. The caption is plain text.
    async fn send_video(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        payload: Vec<u8>,
        file_name: String,
        caption: String,
    ) -> BotResult<()>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> BotResult<()>;
}

#[async_trait]
impl ChatClient for Bot {
    async fn reply_text(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: &str,
    ) -> BotResult<MessageId> {
        let message = self
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(reply_to).allow_sending_without_reply())
            .await?;
        Ok(message.id)
    }

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> BotResult<()> {
        self.edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn send_video(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        payload: Vec<u8>,
        file_name: String,
        caption: String,
    ) -> BotResult<()> {
        Requester::send_video(self, chat_id, InputFile::memory(payload).file_name(file_name))
            .caption(caption)
            .supports_streaming(true)
            .reply_parameters(ReplyParameters::new(reply_to).allow_sending_without_reply())
            .await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> BotResult<()> {
        Requester::delete_message(self, chat_id, message_id).await?;
        Ok(())
    }
}
