use std::cmp::Reverse;

use strum::Display;

use super::extractor::StreamVariant;

pub const MAX_VIDEO_DURATION_SECONDS: u64 = 21_600; // 6 hours

pub const MAX_FILE_SIZE_MB: u64 = 2000;
pub const MAX_FILE_SIZE: u64 = MAX_FILE_SIZE_MB * 1024 * 1024; // Telegram limit for local Bot API

/// Fallback tier that produced a stream pick, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SelectionTier {
    #[strum(to_string = "best progressive mp4")]
    BestProgressiveMp4,
    #[strum(to_string = "first progressive")]
    AnyProgressive,
    #[strum(to_string = "best video-only mp4")]
    BestVideoOnlyMp4,
    #[strum(to_string = "lowest resolution")]
    LowestResolution,
}

/// Pick one stream to relay, or `None` when nothing downloadable exists.
pub fn select_stream(streams: &[StreamVariant]) -> Option<(SelectionTier, &StreamVariant)> {
    // Ties on height keep the extractor's order
    let best_progressive_mp4 = streams
        .iter()
        .filter(|s| s.is_progressive() && s.is_mp4())
        .min_by_key(|s| Reverse(s.height));
    if let Some(stream) = best_progressive_mp4 {
        return Some((SelectionTier::BestProgressiveMp4, stream));
    }

    if let Some(stream) = streams.iter().find(|s| s.is_progressive()) {
        return Some((SelectionTier::AnyProgressive, stream));
    }

    let best_video_only_mp4 = streams
        .iter()
        .filter(|s| !s.is_progressive() && s.has_video() && s.is_mp4())
        .min_by_key(|s| Reverse(s.height));
    if let Some(stream) = best_video_only_mp4 {
        return Some((SelectionTier::BestVideoOnlyMp4, stream));
    }

    streams
        .iter()
        .filter(|s| s.has_video())
        .min_by_key(|s| (s.height.is_none(), s.height))
        .map(|stream| (SelectionTier::LowestResolution, stream))
}

pub fn is_video_too_long(duration_seconds: u64) -> bool {
    duration_seconds > MAX_VIDEO_DURATION_SECONDS
}

/// Unknown sizes pass.
pub fn is_file_too_large(filesize: Option<u64>) -> bool {
    filesize.is_some_and(|size| size > MAX_FILE_SIZE)
}

pub fn size_in_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::video::extractor::StreamKind;

    fn stream(id: &str, kind: StreamKind, ext: &str, height: Option<u32>) -> StreamVariant {
        StreamVariant {
            format_id: id.to_string(),
            kind,
            extension: ext.to_string(),
            height,
            filesize: None,
        }
    }

    fn picked(streams: &[StreamVariant]) -> Option<(SelectionTier, &str)> {
        select_stream(streams).map(|(tier, s)| (tier, s.format_id.as_str()))
    }

    #[test]
    fn prefers_highest_progressive_mp4() {
        let streams = vec![
            stream("18", StreamKind::Progressive, "mp4", Some(360)),
            stream("22", StreamKind::Progressive, "mp4", Some(720)),
            stream("43", StreamKind::Progressive, "webm", Some(1080)),
            stream("137", StreamKind::VideoOnly, "mp4", Some(1080)),
        ];

        assert_eq!(
            picked(&streams),
            Some((SelectionTier::BestProgressiveMp4, "22"))
        );
    }

    #[test]
    fn equal_heights_keep_first_listed() {
        let streams = vec![
            stream("a", StreamKind::Progressive, "mp4", Some(720)),
            stream("b", StreamKind::Progressive, "mp4", Some(720)),
        ];

        assert_eq!(picked(&streams), Some((SelectionTier::BestProgressiveMp4, "a")));
    }

    #[test]
    fn falls_back_to_first_progressive_of_any_container() {
        let streams = vec![
            stream("140", StreamKind::AudioOnly, "m4a", None),
            stream("43", StreamKind::Progressive, "webm", Some(360)),
            stream("44", StreamKind::Progressive, "webm", Some(480)),
            stream("137", StreamKind::VideoOnly, "mp4", Some(1080)),
        ];

        assert_eq!(picked(&streams), Some((SelectionTier::AnyProgressive, "43")));
    }

    #[test]
    fn falls_back_to_best_video_only_mp4() {
        let streams = vec![
            stream("140", StreamKind::AudioOnly, "m4a", None),
            stream("134", StreamKind::VideoOnly, "mp4", Some(360)),
            stream("137", StreamKind::VideoOnly, "mp4", Some(1080)),
            stream("248", StreamKind::VideoOnly, "webm", Some(1080)),
        ];

        assert_eq!(
            picked(&streams),
            Some((SelectionTier::BestVideoOnlyMp4, "137"))
        );
    }

    #[test]
    fn last_resort_is_lowest_resolution_with_video() {
        let streams = vec![
            stream("140", StreamKind::AudioOnly, "m4a", None),
            stream("unknown", StreamKind::VideoOnly, "webm", None),
            stream("248", StreamKind::VideoOnly, "webm", Some(1080)),
            stream("242", StreamKind::VideoOnly, "webm", Some(240)),
        ];

        assert_eq!(
            picked(&streams),
            Some((SelectionTier::LowestResolution, "242"))
        );
    }

    #[test]
    fn nothing_to_pick() {
        assert_eq!(picked(&[]), None);

        let audio_only = vec![stream("140", StreamKind::AudioOnly, "m4a", None)];
        assert_eq!(picked(&audio_only), None);
    }

    #[test]
    fn duration_limit_is_six_hours() {
        assert!(!is_video_too_long(21_600));
        assert!(is_video_too_long(21_601));
    }

    #[test]
    fn size_limit_is_optimistic_for_unknown_sizes() {
        assert!(!is_file_too_large(None));
        assert!(!is_file_too_large(Some(2000 * 1024 * 1024)));
        assert!(is_file_too_large(Some(2001 * 1024 * 1024)));
    }

    #[test]
    fn size_in_mb_is_mebibytes() {
        assert_eq!(size_in_mb(3 * 1024 * 1024 / 2), 1.5);
    }
}
