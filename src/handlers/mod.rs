mod link_received;
mod media_received;

pub use link_received::link_received;
pub use media_received::{is_media, media_received};
