use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{AnalysisError, AnalysisOptions};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmojiSuggestions {
    pub email: Vec<String>,
    pub social: Vec<String>,
}

/// What the caller gets back from one analysis.
///
/// `summary`, `emailDraft` and `socialPost` are always present; the optional
/// fields appear only when they were requested and the model produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: Vec<String>,
    pub email_draft: String,
    pub social_post: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_suggestions: Option<EmojiSuggestions>,
}

/// Parse the model's reply. Invalid JSON fails the whole analysis; a valid
/// object with missing or mistyped keys is defaulted field by field.
pub fn parse_analysis(raw: &str, options: AnalysisOptions) -> Result<AnalysisResult, AnalysisError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| AnalysisError::Parse(e.to_string()))?;

    let Value::Object(map) = value else {
        return Err(AnalysisError::Parse(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let subject_line = if options.include_subject_line {
        map.get("subjectLine")
            .and_then(Value::as_str)
            .map(super::subject::clean_subject_line)
            .filter(|s| !s.is_empty())
    } else {
        None
    };

    let emoji_suggestions = options.include_emojis.then(|| {
        let emojis = map.get("emojiSuggestions").and_then(Value::as_object);
        EmojiSuggestions {
            email: emojis.map(|e| string_list(e, "email")).unwrap_or_default(),
            social: emojis.map(|e| string_list(e, "social")).unwrap_or_default(),
        }
    });

    Ok(AnalysisResult {
        summary: string_list(&map, "summary"),
        email_draft: string_field(&map, "emailDraft"),
        social_post: string_field(&map, "socialPost"),
        subject_line,
        emoji_suggestions,
    })
}

fn string_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Array entries as strings. Non-string scalars are rendered, nulls dropped,
/// and anything that is not an array yields an empty list.
fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    let Some(Value::Array(items)) = map.get(key) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect()
}
