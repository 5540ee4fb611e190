//! Relays one YouTube link: validate, inspect, pick a stream, buffer it and
//! upload it back to the chat, reporting progress on a single status message.

use std::fmt;

use log::{debug, error, info, warn};
use strum::Display;
use teloxide::{
    types::{ChatId, MessageId},
    utils::html,
};

use crate::{
    chat::ChatClient,
    errors::{BotError, BotResult},
    utils::{extract_video_id, is_youtube_url, truncate_chars},
    video::{
        ExtractError, ExtractErrorKind, VideoExtractor, format_duration,
        select::{
            MAX_FILE_SIZE, MAX_FILE_SIZE_MB, MAX_VIDEO_DURATION_SECONDS, is_file_too_large,
            is_video_too_long, select_stream, size_in_mb,
        },
    },
};

pub const INVALID_URL_TEXT: &str =
    "❌ Please send a valid YouTube URL.\n\nExample: https://www.youtube.com/watch?v=...";
pub const PROCESSING_TEXT: &str = "⏳ Processing your video... Please wait.";

const CAPTION_LIMIT: usize = 1024;
const ERROR_PREFIX: &str = "❌ Sorry, I couldn't download this video.\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum Stage {
    Validating,
    MetadataFetch,
    DurationCheck,
    StreamSelect,
    SizeCheck,
    Downloading,
    Uploading,
    Cleanup,
    Done,
}

/// Why a transfer stopped after the status message was posted.
#[derive(Debug)]
pub enum Failure {
    Extraction(ExtractError),
    TooLong { duration: u64 },
    NoStream,
    TooLarge { bytes: u64 },
    /// The download passed the size limit before it finished
    LimitReached { bytes: u64 },
    Chat(BotError),
}

impl Failure {
    /// Text shown in place of the status message. Never contains collaborator output.
    pub fn user_message(&self) -> String {
        match self {
            Failure::Extraction(e) => {
                let hint = match e.kind {
                    ExtractErrorKind::Unavailable => {
                        "The video might be private, deleted, or geo-restricted."
                    }
                    ExtractErrorKind::AccessDenied => {
                        "Access denied. The video might be age-restricted or private."
                    }
                    ExtractErrorKind::Timeout => "Download timeout. Please try again.",
                    ExtractErrorKind::TooLarge | ExtractErrorKind::Other => {
                        "Please try again later or with a different video."
                    }
                };
                format!("{}{}", ERROR_PREFIX, hint)
            }
            Failure::TooLong { duration } => format!(
                "❌ Video is too long ({}, limit is {}). Please try a shorter video.",
                format_duration(*duration),
                format_duration(MAX_VIDEO_DURATION_SECONDS)
            ),
            Failure::NoStream => "❌ No downloadable streams found for this video.".to_string(),
            Failure::TooLarge { bytes } => format!(
                "❌ Video file is too large ({:.1}MB).\nTelegram limit is 2GB.",
                size_in_mb(*bytes)
            ),
            Failure::LimitReached { .. } => format!(
                "❌ Video file is too large (more than {}MB).\nTelegram limit is 2GB.",
                MAX_FILE_SIZE_MB
            ),
            Failure::Chat(_) => format!(
                "{}Please try again later or with a different video.",
                ERROR_PREFIX
            ),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Extraction(e) => write!(f, "extraction failed: {}", e),
            Failure::TooLong { duration } => write!(f, "video is {} seconds long", duration),
            Failure::NoStream => write!(f, "no downloadable streams"),
            Failure::TooLarge { bytes } => write!(f, "stream is {} bytes", bytes),
            Failure::LimitReached { bytes } => {
                write!(f, "download stopped after {} bytes", bytes)
            }
            Failure::Chat(e) => write!(f, "chat request failed: {}", e),
        }
    }
}

impl From<ExtractError> for Failure {
    fn from(err: ExtractError) -> Self {
        match err.kind {
            ExtractErrorKind::TooLarge => Failure::LimitReached {
                bytes: err.received_bytes.unwrap_or(MAX_FILE_SIZE),
            },
            _ => Failure::Extraction(err),
        }
    }
}

impl From<BotError> for Failure {
    fn from(err: BotError) -> Self {
        Failure::Chat(err)
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The text was not a YouTube link, nothing was fetched
    Rejected,
    Delivered { title: String },
    Failed(Failure),
}

/// An incoming text message asking for a video.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: &'a str,
}

/// Handle one request end to end. Only chat errors that happen before the
/// status message exists are returned as `Err`; everything later is reported
/// by editing the status message and returned as [`Outcome::Failed`].
pub async fn relay<C, E>(chat: &C, extractor: &E, request: TransferRequest<'_>) -> BotResult<Outcome>
where
    C: ChatClient + ?Sized,
    E: VideoExtractor + ?Sized,
{
    let url = request.text.trim();
    debug!(
        "{} message {} in chat {}",
        Stage::Validating,
        request.message_id.0,
        request.chat_id
    );

    if !is_youtube_url(url) {
        chat.reply_text(request.chat_id, request.message_id, INVALID_URL_TEXT)
            .await?;
        return Ok(Outcome::Rejected);
    }

    let status_id = chat
        .reply_text(request.chat_id, request.message_id, PROCESSING_TEXT)
        .await?;

    let transfer = Transfer {
        chat,
        extractor,
        chat_id: request.chat_id,
        reply_to: request.message_id,
        status_id,
        url,
        video_id: extract_video_id(url).unwrap_or("unknown"),
    };

    match transfer.run().await {
        Ok(title) => {
            info!("Successfully downloaded and sent video: {}", title);
            Ok(Outcome::Delivered { title })
        }
        Err(failure) => {
            error!("Error downloading video {} ({}): {}", transfer.video_id, url, failure);
            if let Err(e) = chat
                .edit_text(request.chat_id, status_id, &failure.user_message())
                .await
            {
                error!("Failed to report error in chat {}: {}", request.chat_id, e);
            }
            Ok(Outcome::Failed(failure))
        }
    }
}

struct Transfer<'a, C: ?Sized, E: ?Sized> {
    chat: &'a C,
    extractor: &'a E,
    chat_id: ChatId,
    reply_to: MessageId,
    status_id: MessageId,
    url: &'a str,
    video_id: &'a str,
}

impl<C, E> Transfer<'_, C, E>
where
    C: ChatClient + ?Sized,
    E: VideoExtractor + ?Sized,
{
    fn enter(&self, stage: Stage) {
        debug!("{} [{}]", stage, self.video_id);
    }

    async fn status(&self, text: &str) -> Result<(), Failure> {
        self.chat.edit_text(self.chat_id, self.status_id, text).await?;
        Ok(())
    }

    async fn run(&self) -> Result<String, Failure> {
        self.enter(Stage::MetadataFetch);
        let details = self.extractor.fetch_details(self.url).await?;

        self.enter(Stage::DurationCheck);
        if is_video_too_long(details.duration) {
            return Err(Failure::TooLong {
                duration: details.duration,
            });
        }

        self.enter(Stage::StreamSelect);
        let (tier, stream) = select_stream(&details.streams).ok_or(Failure::NoStream)?;
        info!(
            "Picked format {} ({} {}, height {:?}) via {} for {}",
            stream.format_id, stream.kind, stream.extension, stream.height, tier, details.id
        );

        self.enter(Stage::SizeCheck);
        if is_file_too_large(stream.filesize) {
            return Err(Failure::TooLarge {
                bytes: stream.filesize.unwrap_or_default(),
            });
        }

        let duration = format_duration(details.duration);
        let header = format!(
            "📹 <b>{}</b>\n⏱ Duration: {}",
            html::escape(&details.title),
            duration
        );
        self.status(&format!("{}\n\n⬇️ Downloading...", header)).await?;

        self.enter(Stage::Downloading);
        let payload = self
            .extractor
            .fetch_stream(self.url, stream, MAX_FILE_SIZE)
            .await?;

        self.status(&format!("{}\n\n📤 Uploading...", header)).await?;

        self.enter(Stage::Uploading);
        let caption = truncate_chars(&format!("🎬 {}\n⏱ {}", details.title, duration), CAPTION_LIMIT);
        let file_name = format!("{}.{}", details.id, stream.extension);
        self.chat
            .send_video(self.chat_id, self.reply_to, payload, file_name, caption)
            .await?;

        self.enter(Stage::Cleanup);
        if let Err(e) = self.chat.delete_message(self.chat_id, self.status_id).await {
            warn!("Failed to delete status message {}: {}", self.status_id.0, e);
        }

        self.enter(Stage::Done);
        Ok(details.title)
    }
}
