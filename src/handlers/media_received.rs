use teloxide::{prelude::*, types::MessageId};

use crate::{chat::ChatClient, errors::HandlerResult};

pub const SEND_LINK_TEXT: &str = "📝 Please send me a YouTube link as text message.";

/// Photos, videos, documents, audio and voice notes can't carry a link
pub fn is_media(msg: Message) -> bool {
    msg.photo().is_some()
        || msg.video().is_some()
        || msg.document().is_some()
        || msg.audio().is_some()
        || msg.voice().is_some()
}

pub async fn media_received(bot: Bot, msg: Message) -> HandlerResult {
    ask_for_link(&bot, msg.chat.id, msg.id).await
}

async fn ask_for_link<C: ChatClient + ?Sized>(
    chat: &C,
    chat_id: ChatId,
    reply_to: MessageId,
) -> HandlerResult {
    chat.reply_text(chat_id, reply_to, SEND_LINK_TEXT).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use serde_json::{Value, json};

    use super::*;
    use crate::chat::mock::{ChatCall, RecordingChat};

    fn message(content: Value) -> Message {
        let mut raw = json!({
            "message_id": 9,
            "date": 1700000000,
            "chat": {"id": 1, "type": "private", "first_name": "Ann"},
            "from": {"id": 1, "is_bot": false, "first_name": "Ann"},
        });
        if let (Some(raw), Some(content)) = (raw.as_object_mut(), content.as_object()) {
            raw.extend(content.clone());
        }
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn photo_is_media() {
        let msg = message(json!({
            "photo": [{
                "file_id": "AgAD",
                "file_unique_id": "AQAD",
                "width": 90,
                "height": 90,
                "file_size": 1024
            }]
        }));

        assert!(is_media(msg));
    }

    #[test]
    fn voice_is_media() {
        let msg = message(json!({
            "voice": {
                "file_id": "AwAD",
                "file_unique_id": "AQAE",
                "duration": 3,
                "file_size": 2048
            }
        }));

        assert!(is_media(msg));
    }

    #[test]
    fn text_is_not_media() {
        let msg = message(json!({"text": "https://youtu.be/dQw4w9WgXcQ"}));

        assert!(!is_media(msg));
    }

    #[tokio::test]
    async fn media_gets_text_prompt() {
        let chat = RecordingChat::default();

        ask_for_link(&chat, ChatId(1), MessageId(9)).await.unwrap();

        assert_eq!(
            chat.calls(),
            vec![ChatCall::Reply {
                reply_to: MessageId(9),
                text: SEND_LINK_TEXT.to_string(),
            }]
        );
    }
}
