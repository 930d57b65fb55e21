//! Apple Podcasts has no lookup wired up. Episode details live in the show's
//! RSS feed, which is not parsed; callers get descriptive placeholders.

use super::MediaMetadata;

pub fn placeholder() -> MediaMetadata {
    MediaMetadata {
        title: "Episode title will be fetched from RSS".to_string(),
        description: "Description will be fetched from RSS".to_string(),
        channel: "Show name will be fetched from RSS".to_string(),
        duration: "Duration will be fetched from RSS".to_string(),
        ..Default::default()
    }
}
