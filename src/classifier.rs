//! Recognises media URLs and pulls out the identifier each platform uses.
//!
//! Rules are held in a single ordered table and tried top to bottom; the
//! first rule whose needle occurs in the input decides the outcome. Input
//! that matches no needle is not an error, it is simply article text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Article,
    Video,
    Podcast,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Video => "video",
            Self::Podcast => "podcast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Youtube,
    Vimeo,
    Spotify,
    ApplePodcasts,
}

/// Identifier of a single video or episode on its host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PlatformId {
    Single(String),
    ApplePair {
        #[serde(rename = "podcastId")]
        podcast_id: String,
        #[serde(rename = "episodeId")]
        episode_id: String,
    },
}

impl PlatformId {
    pub fn single(id: impl Into<String>) -> Self {
        Self::Single(id.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub kind: ContentKind,
    pub platform: Platform,
    pub platform_id: PlatformId,
}

type Extractor = fn(&str) -> Option<PlatformId>;

struct Rule {
    platform: Platform,
    kind: ContentKind,
    needle: &'static str,
    extract: Extractor,
}

static APPLE_EPISODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/id(\d+)\?i=(\d+)").expect("Failed to compile apple podcasts regex"));

static RULES: [Rule; 5] = [
    Rule {
        platform: Platform::Youtube,
        kind: ContentKind::Video,
        needle: "youtube.com/watch?v=",
        extract: youtube_watch_id,
    },
    Rule {
        platform: Platform::Youtube,
        kind: ContentKind::Video,
        needle: "youtu.be/",
        extract: youtube_short_id,
    },
    Rule {
        platform: Platform::Vimeo,
        kind: ContentKind::Video,
        needle: "vimeo.com/",
        extract: vimeo_id,
    },
    Rule {
        platform: Platform::Spotify,
        kind: ContentKind::Podcast,
        needle: "open.spotify.com/episode/",
        extract: spotify_episode_id,
    },
    Rule {
        platform: Platform::ApplePodcasts,
        kind: ContentKind::Podcast,
        needle: "podcasts.apple.com",
        extract: apple_episode_id,
    },
];

/// Classify any input. `None` means either plain text or a recognised
/// platform URL whose identifier could not be extracted.
pub fn classify(input: &str) -> Option<Classification> {
    classify_with(input, |_| true)
}

/// Classify against the rules for one content kind only.
pub fn classify_as(input: &str, kind: ContentKind) -> Option<Classification> {
    classify_with(input, |rule| rule.kind == kind)
}

/// Whether any platform needle occurs in the input, regardless of whether an
/// identifier can be extracted from it.
pub fn looks_like_media_url(input: &str) -> bool {
    let input = input.trim();
    RULES.iter().any(|rule| input.contains(rule.needle))
}

fn classify_with(input: &str, filter: impl Fn(&Rule) -> bool) -> Option<Classification> {
    let input = input.trim();
    let rule = RULES
        .iter()
        .filter(|rule| filter(rule))
        .find(|rule| input.contains(rule.needle))?;

    let platform_id = (rule.extract)(input)?;
    Some(Classification {
        kind: rule.kind,
        platform: rule.platform,
        platform_id,
    })
}

fn youtube_watch_id(input: &str) -> Option<PlatformId> {
    let url = url::Url::parse(input).ok()?;
    let (_, id) = url.query_pairs().find(|(key, _)| key == "v")?;
    valid_id(&id, is_youtube_char)
}

fn youtube_short_id(input: &str) -> Option<PlatformId> {
    valid_id(segment_after(input, "youtu.be/")?, is_youtube_char)
}

fn vimeo_id(input: &str) -> Option<PlatformId> {
    valid_id(segment_after(input, "vimeo.com/")?, |c| c.is_ascii_digit())
}

fn spotify_episode_id(input: &str) -> Option<PlatformId> {
    // Spotify ids are base62.
    valid_id(segment_after(input, "episode/")?, |c| c.is_ascii_alphanumeric())
}

fn apple_episode_id(input: &str) -> Option<PlatformId> {
    let captures = APPLE_EPISODE_REGEX.captures(input)?;
    Some(PlatformId::ApplePair {
        podcast_id: captures[1].to_string(),
        episode_id: captures[2].to_string(),
    })
}

/// The path segment following `marker`.
fn segment_after<'a>(input: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = input.split_once(marker)?;
    rest.split(['/', '?', '#']).next()
}

fn is_youtube_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Ids end up in upstream request paths, so anything outside the platform's
/// id alphabet is refused.
fn valid_id(id: &str, allowed: fn(char) -> bool) -> Option<PlatformId> {
    let id = id.trim();
    if id.is_empty() || !id.chars().all(allowed) {
        None
    } else {
        Some(PlatformId::single(id))
    }
}
