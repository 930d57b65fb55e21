//! Prompt templates.
//!
//! Two profiles exist. `Classic` reproduces the short instructions the
//! service started with; `Grounded` adds strict factual-grounding rules and is
//! paired with a lower temperature.

use std::fmt::Write;
use std::str::FromStr;

use crate::classifier::ContentKind;
use crate::media::MediaMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptProfile {
    Classic,
    #[default]
    Grounded,
}

impl PromptProfile {
    pub fn default_temperature(&self) -> f32 {
        match self {
            Self::Classic => 0.7,
            Self::Grounded => 0.3,
        }
    }
}

impl FromStr for PromptProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "grounded" | "strict" => Ok(Self::Grounded),
            other => Err(format!("unknown analysis profile '{other}'")),
        }
    }
}

/// Extra output the caller asked for on top of summary, email and post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub include_emojis: bool,
    pub include_subject_line: bool,
}

const CLASSIC_ARTICLE: &str = "You are an AI assistant that analyzes articles and provides:
1. A summary in 3 key points
2. A draft email to share the article
3. A social media post about the article";

const CLASSIC_VIDEO: &str = "You are an AI assistant that analyzes video content and provides:
1. A summary in 3 key points based on the video metadata
2. A draft email to share the video, incorporating key highlights and why it's worth watching
3. A social media post that drives engagement for the video content

Consider the video's title, description, duration, and channel when crafting the content.";

const CLASSIC_PODCAST: &str = "You are an AI assistant that analyzes podcast episodes and provides:
1. A summary in 3 key points based on the episode metadata
2. A draft email to share the episode, incorporating key highlights and why it's worth listening to
3. A social media post that drives engagement for the podcast episode

Consider the episode's title, show name, description, duration, and episode number when crafting the content.";

const GROUNDING_RULES: &str = "Strict rules:
- Use only facts stated explicitly in the provided content. Never invent names, numbers or claims.
- Preserve exact statistics, figures, quotes and dates as written.
- The summary must have between 3 and 5 points, each one a specific fact or takeaway.
- Avoid generic filler such as \"in today's fast-paced world\" or \"this is a must-read\".
- If the content is thin, keep the output short rather than padding it.";

fn grounded_intro(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Article => {
            "You are a precise content analyst. Read the article and produce a factual summary, \
             an email sharing it with a colleague, and a social media post about it."
        }
        ContentKind::Video => {
            "You are a precise content analyst. From the video metadata provided, produce a factual \
             summary, an email sharing the video and explaining why it is worth watching, and a \
             social media post that drives engagement. Consider the title, description, duration \
             and channel."
        }
        ContentKind::Podcast => {
            "You are a precise content analyst. From the episode metadata provided, produce a factual \
             summary, an email sharing the episode and explaining why it is worth listening to, and \
             a social media post that drives engagement. Consider the title, show, description, \
             duration and episode number."
        }
    }
}

/// System instructions for one analysis call.
pub fn system_prompt(kind: ContentKind, profile: PromptProfile, options: AnalysisOptions) -> String {
    let mut prompt = match profile {
        PromptProfile::Classic => match kind {
            ContentKind::Article => CLASSIC_ARTICLE,
            ContentKind::Video => CLASSIC_VIDEO,
            ContentKind::Podcast => CLASSIC_PODCAST,
        }
        .to_string(),
        PromptProfile::Grounded => format!("{}\n\n{}", grounded_intro(kind), GROUNDING_RULES),
    };

    let mut keys = vec![
        "summary (array of strings)",
        "emailDraft (string)",
        "socialPost (string)",
    ];
    if options.include_subject_line {
        prompt.push_str(
            "\n\nAlso write a concise email subject line of at most 60 characters, without quotes \
             or a \"Subject:\" prefix.",
        );
        keys.push("subjectLine (string)");
    }
    if options.include_emojis {
        prompt.push_str(
            "\n\nAlso suggest 3 to 5 emojis that fit the tone of the email and 3 to 5 that fit the \
             social post.",
        );
        keys.push("emojiSuggestions (object with arrays \"email\" and \"social\")");
    }

    let _ = write!(
        prompt,
        "\n\nPlease format your response in JSON with keys: {}. Respond with the JSON object only.",
        keys.join(", ")
    );
    prompt
}

/// User message for free text. The text is expected to be sanitized already.
pub fn article_message(text: &str) -> String {
    format!("Please analyze this article: {text}")
}

/// User message for an article that was downloaded from `url`.
pub fn fetched_article_message(url: &str, title: &str, text: &str) -> String {
    format!("Please analyze this article:\nTitle: {title}\nSource: {url}\n\n{text}")
}

/// User message rendering media metadata one field per line. Optional lines
/// are left out when the platform did not provide them.
pub fn media_message(kind: ContentKind, metadata: &MediaMetadata) -> String {
    let mut lines = Vec::new();
    match kind {
        ContentKind::Podcast => {
            lines.push("Please analyze this podcast episode:".to_string());
            lines.push(format!("Title: {}", metadata.title));
            lines.push(format!("Show: {}", metadata.channel));
            lines.push(format!("Duration: {}", metadata.duration));
            if let Some(number) = metadata.episode_number {
                lines.push(format!("Episode Number: {number}"));
            }
            lines.push(format!("Description: {}", metadata.description));
            if let Some(show) = metadata.show_description.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("Show Description: {show}"));
            }
        }
        _ => {
            lines.push("Please analyze this video content:".to_string());
            lines.push(format!("Title: {}", metadata.title));
            lines.push(format!("Channel: {}", metadata.channel));
            lines.push(format!("Duration: {}", metadata.duration));
            lines.push(format!("Description: {}", metadata.description));
            if let Some(tags) = metadata.tags.as_ref().filter(|t| !t.is_empty()) {
                lines.push(format!("Tags: {}", tags.join(", ")));
            }
            match metadata.views {
                Some(views) => lines.push(format!("Views: {views}")),
                None => lines.push("Views: N/A".to_string()),
            }
        }
    }
    lines.join("\n")
}

pub const SUBJECT_SYSTEM_PROMPT: &str = "You write email subject lines for content-sharing emails.
Respond with the subject line only: no \"Subject:\" prefix, no quotes, no explanation.
Keep it under 60 characters, specific to the content, and never clickbait.";

pub fn subject_message(email_content: &str, original_url: Option<&str>) -> String {
    match original_url {
        Some(url) => format!(
            "Write a subject line for this email.\n\nEmail:\n{email_content}\n\nShared link: {url}"
        ),
        None => format!("Write a subject line for this email.\n\nEmail:\n{email_content}"),
    }
}
