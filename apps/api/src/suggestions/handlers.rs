use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::state::AppState;
use crate::suggestions::service::{clamp_count, generate_suggestions, SuggestionRequest};

#[derive(Debug, Serialize)]
pub struct SuggestMessagesResponse {
    pub success: bool,
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Reads the optional body field by field so one malformed field only
/// falls back to its own default.
fn parse_request(body: Option<&Value>) -> SuggestionRequest {
    let field = |name: &str| body.and_then(|b| b.get(name));
    let text = |name: &str| {
        field(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    SuggestionRequest {
        count: clamp_count(field("count").and_then(Value::as_f64).map(|c| c.floor() as i64)),
        exclude: field("exclude")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        topic: text("topic"),
        tone: text("tone"),
        language: text("language"),
    }
}

/// POST /api/suggest-messages
pub async fn handle_suggest_messages(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<impl IntoResponse, AppError> {
    let request = parse_request(body.as_ref().map(|Json(v)| v));
    let suggestions = generate_suggestions(state.llm.as_deref(), &request).await;

    if suggestions.is_empty() {
        return Err(AppError::Llm(
            "No suggestions generated from AI response".to_string(),
        ));
    }

    Ok((
        [
            (
                header::CACHE_CONTROL,
                "no-store, no-cache, must-revalidate, proxy-revalidate",
            ),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Json(SuggestMessagesResponse {
            success: true,
            message: "Suggestions generated".to_string(),
            suggestions,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_missing_body_uses_defaults() {
        let request = parse_request(None);
        assert_eq!(request.count, 3);
        assert!(request.exclude.is_empty());
        assert!(request.topic.is_none());
    }

    #[test]
    fn test_fields_are_read_leniently() {
        let body = json!({
            "count": 42,
            "exclude": ["a", 3, "b"],
            "topic": "  music ",
            "tone": "",
            "language": 12
        });
        let request = parse_request(Some(&body));
        assert_eq!(request.count, 10);
        assert_eq!(request.exclude, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(request.topic.as_deref(), Some("music"));
        assert!(request.tone.is_none());
        assert!(request.language.is_none());
    }

    #[test]
    fn test_bad_count_type_falls_back() {
        let request = parse_request(Some(&json!({"count": "five"})));
        assert_eq!(request.count, 3);
    }
}
