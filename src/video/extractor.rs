use std::fmt;

use async_trait::async_trait;
use strum::Display;

/// What a stream variant carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StreamKind {
    /// Audio and video muxed into one file
    #[strum(to_string = "progressive")]
    Progressive,
    /// Adaptive video track without audio
    #[strum(to_string = "video-only")]
    VideoOnly,
    /// Adaptive audio track without video
    #[strum(to_string = "audio-only")]
    AudioOnly,
}

/// One downloadable stream of a video as reported by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamVariant {
    pub format_id: String,
    pub kind: StreamKind,
    /// Container extension, e.g. `mp4` or `webm`
    pub extension: String,
    /// Frame height in pixels, used as the resolution rank
    pub height: Option<u32>,
    /// Exact or approximate size in bytes, when the extractor knows it
    pub filesize: Option<u64>,
}

impl StreamVariant {
    pub fn is_progressive(&self) -> bool {
        self.kind == StreamKind::Progressive
    }

    pub fn has_video(&self) -> bool {
        matches!(self.kind, StreamKind::Progressive | StreamKind::VideoOnly)
    }

    pub fn is_mp4(&self) -> bool {
        self.extension.eq_ignore_ascii_case("mp4")
    }
}

/// Metadata of a single video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    /// Whole seconds
    pub duration: u64,
    pub streams: Vec<StreamVariant>,
}

/// Failure categories the extractor boundary distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExtractErrorKind {
    /// Private, deleted or geo-restricted video
    Unavailable,
    /// HTTP 403, age gate or sign-in wall
    AccessDenied,
    /// Network timeout or other transient transport failure
    Timeout,
    /// The transferred stream grew past the allowed byte count
    TooLarge,
    /// Anything else
    Other,
}

#[derive(Debug, Clone)]
pub struct ExtractError {
    pub kind: ExtractErrorKind,
    /// Raw collaborator output, for logs only
    pub detail: String,
    /// Bytes received before the transfer was aborted, set for `TooLarge`
    pub received_bytes: Option<u64>,
}

impl ExtractError {
    pub fn new(kind: ExtractErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            received_bytes: None,
        }
    }

    pub fn too_large(received_bytes: u64) -> Self {
        Self {
            kind: ExtractErrorKind::TooLarge,
            detail: format!("stream exceeded limit after {} bytes", received_bytes),
            received_bytes: Some(received_bytes),
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail.trim())
    }
}

impl std::error::Error for ExtractError {}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(
            ExtractErrorKind::Other,
            format!("JSON parsing error: {}", err),
        )
    }
}

/// Source of video metadata and stream bytes.
#[async_trait]
pub trait VideoExtractor: Send + Sync {
    /// Resolve title, duration and the available streams for `url`.
    async fn fetch_details(&self, url: &str) -> Result<VideoDetails, ExtractError>;

    /// Read the whole `stream` into memory. Fails with
    /// [`ExtractErrorKind::TooLarge`] once more than `max_bytes` arrive.
    async fn fetch_stream(
        &self,
        url: &str,
        stream: &StreamVariant,
        max_bytes: u64,
    ) -> Result<Vec<u8>, ExtractError>;
}
