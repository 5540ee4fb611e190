use teloxide::{prelude::*, types::MessageId};

use crate::{chat::ChatClient, errors::HandlerResult};

pub const USAGE_TEXT: &str = "🎥 <b>YouTube Video Downloader Bot</b>

Welcome! I can help you download YouTube videos.

<b>How to use:</b>
1. Send me a YouTube link
2. I'll download and send you the video

<b>Supported formats:</b>
- youtube.com/watch?v=...
- youtu.be/...
- youtube.com/embed/...

Just paste any YouTube link and I'll handle the rest! 📹";

/// Handles both /start and /help
pub async fn start(bot: Bot, msg: Message) -> HandlerResult {
    send_usage(&bot, msg.chat.id, msg.id).await
}

pub async fn send_usage<C: ChatClient + ?Sized>(
    chat: &C,
    chat_id: ChatId,
    reply_to: MessageId,
) -> HandlerResult {
    chat.reply_text(chat_id, reply_to, USAGE_TEXT).await?;
    Ok(())
}
