pub mod extractor;
pub mod select;
pub mod youtube;

pub use extractor::{ExtractError, ExtractErrorKind, VideoExtractor};
pub use youtube::{YtDlp, format_duration};
