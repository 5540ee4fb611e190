use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use tokio::{io::AsyncReadExt, process};

use super::extractor::{
    ExtractError, ExtractErrorKind, StreamKind, StreamVariant, VideoDetails, VideoExtractor,
};
use crate::config::Config;

const RETRIES: &str = "3";

#[derive(Debug, Deserialize)]
struct YtDlpFormat {
    format_id: String,
    #[serde(default)]
    ext: String,
    vcodec: Option<String>,
    acodec: Option<String>,
    height: Option<u32>,
    filesize: Option<u64>,
    filesize_approx: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    id: String,
    title: String,
    duration: Option<f64>,
    #[serde(default)]
    formats: Vec<YtDlpFormat>,
}

fn has_codec(codec: &Option<String>) -> bool {
    codec.as_deref().is_some_and(|c| c != "none")
}

impl YtDlpFormat {
    /// `None` for entries that carry neither audio nor video (storyboards).
    fn into_variant(self) -> Option<StreamVariant> {
        let kind = match (has_codec(&self.vcodec), has_codec(&self.acodec)) {
            (true, true) => StreamKind::Progressive,
            (true, false) => StreamKind::VideoOnly,
            (false, true) => StreamKind::AudioOnly,
            (false, false) => return None,
        };

        Some(StreamVariant {
            format_id: self.format_id,
            kind,
            extension: self.ext,
            height: self.height.filter(|&h| h > 0),
            filesize: self.filesize.or(self.filesize_approx),
        })
    }
}

/// Parse the output of `yt-dlp -J`
fn parse_info(json: &str) -> Result<VideoDetails, ExtractError> {
    let info: YtDlpInfo = serde_json::from_str(json)?;

    let duration = match info.duration {
        Some(seconds) if seconds.is_finite() && seconds > 0.0 => seconds as u64,
        _ => {
            log::warn!("No duration reported for video {}", info.id);
            0
        }
    };

    Ok(VideoDetails {
        id: info.id,
        title: info.title,
        duration,
        streams: info
            .formats
            .into_iter()
            .filter_map(YtDlpFormat::into_variant)
            .collect(),
    })
}

/// Map yt-dlp stderr onto a failure category. This is the only place where
/// collaborator text is inspected.
pub fn classify_stderr(stderr: &str) -> ExtractErrorKind {
    let stderr = stderr.to_lowercase();

    if stderr.contains("unavailable")
        || stderr.contains("private video")
        || stderr.contains("has been removed")
        || stderr.contains("does not exist")
    {
        ExtractErrorKind::Unavailable
    } else if stderr.contains("403")
        || stderr.contains("forbidden")
        || stderr.contains("confirm your age")
        || stderr.contains("age-restricted")
    {
        ExtractErrorKind::AccessDenied
    } else if stderr.contains("timed out") || stderr.contains("timeout") {
        ExtractErrorKind::Timeout
    } else {
        ExtractErrorKind::Other
    }
}

fn stderr_error(stderr: &[u8]) -> ExtractError {
    let stderr = String::from_utf8_lossy(stderr);
    ExtractError::new(classify_stderr(&stderr), stderr.trim())
}

fn spawn_error(e: std::io::Error) -> ExtractError {
    ExtractError::new(
        ExtractErrorKind::Other,
        format!("failed to run yt-dlp: {}", e),
    )
}

/// yt-dlp driven through its command line
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: String,
    socket_timeout: u64,
}

impl YtDlp {
    pub fn new(binary: impl Into<String>, socket_timeout: u64) -> Self {
        Self {
            binary: binary.into(),
            socket_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ytdlp_path.clone(), config.socket_timeout)
    }

    fn base_command(&self) -> process::Command {
        let socket_timeout = self.socket_timeout.to_string();
        let mut cmd = process::Command::new(&self.binary);
        cmd.arg("--no-playlist")
            .args(["--socket-timeout", socket_timeout.as_str()])
            .args(["--retries", RETRIES])
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl VideoExtractor for YtDlp {
    async fn fetch_details(&self, url: &str) -> Result<VideoDetails, ExtractError> {
        let output = self
            .base_command()
            .arg("-J") // JSON output
            .arg(url)
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(stderr_error(&output.stderr));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        parse_info(&json)
    }

    async fn fetch_stream(
        &self,
        url: &str,
        stream: &StreamVariant,
        max_bytes: u64,
    ) -> Result<Vec<u8>, ExtractError> {
        let mut child = self
            .base_command()
            .args(["-f", stream.format_id.as_str()])
            .args(["--quiet", "--no-warnings", "--no-part"])
            .args(["-o", "-"])
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        info!(
            "Streaming format {} ({}) of {}",
            stream.format_id, stream.kind, url
        );

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExtractError::new(ExtractErrorKind::Other, "yt-dlp stdout missing"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExtractError::new(ExtractErrorKind::Other, "yt-dlp stderr missing"))?;

        // Drain stderr separately so a chatty process can't block on a full pipe
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
            buf
        });

        let capacity = stream.filesize.unwrap_or(0).min(max_bytes) as usize;
        let mut buffer = Vec::with_capacity(capacity);
        let read = (&mut stdout)
            .take(max_bytes + 1)
            .read_to_end(&mut buffer)
            .await;

        // The child may still be writing, so it must not be waited on here
        if let Err(e) = read {
            let _ = child.kill().await;
            return Err(ExtractError::new(
                ExtractErrorKind::Other,
                format!("failed to read yt-dlp output: {}", e),
            ));
        }
        if buffer.len() as u64 > max_bytes {
            let _ = child.kill().await;
            return Err(ExtractError::too_large(buffer.len() as u64));
        }

        let status = child.wait().await.map_err(spawn_error)?;
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(stderr_error(&stderr));
        }

        debug!("Received {} bytes for format {}", buffer.len(), stream.format_id);
        Ok(buffer)
    }
}

pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
