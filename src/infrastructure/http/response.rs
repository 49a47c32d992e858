//! Three-way classification of backend responses.
//!
//! Every call resolves to JSON, a login requirement, or a failure. A backend
//! that redirects unauthenticated API calls to its HTML login page answers
//! 200 with a document; that is a login requirement, not malformed data.

use reqwest::StatusCode;
use serde_json::Value;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    Json(Value),
    AuthRequired,
    Failed(String),
}

impl ApiOutcome {
    pub fn into_result(self) -> Result<Value, DomainError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::AuthRequired => Err(DomainError::AuthRequired),
            Self::Failed(message) => Err(DomainError::Transport(message)),
        }
    }
}

/// Classify a finished response. `sniff_html` turns HTML bodies into
/// [`ApiOutcome::AuthRequired`]; without it they are failures.
pub fn classify(
    status: StatusCode,
    content_type: Option<&str>,
    body: &str,
    sniff_html: bool,
) -> ApiOutcome {
    if status == StatusCode::UNAUTHORIZED {
        return ApiOutcome::AuthRequired;
    }

    let html = looks_like_html(content_type, body);
    if html && sniff_html {
        tracing::debug!("HTML body with status {}, treating as login redirect", status);
        return ApiOutcome::AuthRequired;
    }

    if status.is_success() {
        return match serde_json::from_str::<Value>(body) {
            Ok(value) => ApiOutcome::Json(value),
            Err(e) => ApiOutcome::Failed(format!("Invalid JSON response: {}", e)),
        };
    }

    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_text);
    match detail {
        Some(text) => ApiOutcome::Failed(format!("HTTP {}: {}", status.as_u16(), text)),
        None => ApiOutcome::Failed(format!("HTTP error! status: {}", status.as_u16())),
    }
}

/// Full HTML document, judged by its opening tag. The content type alone
/// only counts when the body is empty.
pub fn looks_like_html(content_type: Option<&str>, body: &str) -> bool {
    let head = body.trim_start();
    if head.is_empty() {
        return content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"));
    }
    let prefix: String = head.chars().take(16).collect::<String>().to_ascii_lowercase();
    prefix.starts_with("<!doctype") || prefix.starts_with("<html")
}

/// Business-level refusal inside a 2xx JSON body: `{error}` or
/// `{success: false, message}`.
pub fn rejection(value: &Value) -> Option<String> {
    let object = value.as_object()?;

    if let Some(error) = object.get("error").filter(|e| !e.is_null()) {
        return Some(as_text(error));
    }

    if object.get("success").and_then(Value::as_bool) == Some(false) {
        let message = object
            .get("message")
            .filter(|m| !m.is_null())
            .map(as_text)
            .unwrap_or_else(|| "Request failed".to_string());
        return Some(message);
    }

    None
}

fn error_text(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    object
        .get("error")
        .or_else(|| object.get("message"))
        .filter(|v| !v.is_null())
        .map(as_text)
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOGIN_PAGE: &str = "\n  <!DOCTYPE html>\n<html><body><form action=\"/login\"></form></body></html>";

    #[test]
    fn test_json_success() {
        let outcome = classify(StatusCode::OK, Some("application/json"), "[{\"id\":1}]", true);
        assert_eq!(outcome, ApiOutcome::Json(json!([{"id": 1}])));
    }

    #[test]
    fn test_401_is_auth_required() {
        let outcome = classify(StatusCode::UNAUTHORIZED, None, "{\"error\":\"nope\"}", false);
        assert_eq!(outcome, ApiOutcome::AuthRequired);
    }

    #[test]
    fn test_html_redirect_is_auth_required() {
        let outcome = classify(StatusCode::OK, Some("text/html; charset=utf-8"), LOGIN_PAGE, true);
        assert_eq!(outcome, ApiOutcome::AuthRequired);

        let outcome = classify(StatusCode::FOUND, None, "<HTML><head></head></HTML>", true);
        assert_eq!(outcome, ApiOutcome::AuthRequired);
    }

    #[test]
    fn test_html_without_sniffing_is_failure() {
        let outcome = classify(StatusCode::OK, Some("text/html"), LOGIN_PAGE, false);
        assert!(matches!(outcome, ApiOutcome::Failed(_)));
    }

    #[test]
    fn test_non_html_garbage_is_failure() {
        let outcome = classify(StatusCode::OK, Some("text/plain"), "Internal hiccup", true);
        assert!(matches!(outcome, ApiOutcome::Failed(m) if m.starts_with("Invalid JSON")));
    }

    #[test]
    fn test_server_error_carries_json_detail() {
        let outcome = classify(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some("application/json"),
            "{\"error\": \"database is locked\"}",
            true,
        );
        assert_eq!(
            outcome,
            ApiOutcome::Failed("HTTP 500: database is locked".to_string())
        );

        let outcome = classify(StatusCode::BAD_GATEWAY, None, "", true);
        assert_eq!(
            outcome,
            ApiOutcome::Failed("HTTP error! status: 502".to_string())
        );
    }

    #[test]
    fn test_rejection_payloads() {
        assert_eq!(
            rejection(&json!({"error": "Already joined this group"})),
            Some("Already joined this group".to_string())
        );
        assert_eq!(
            rejection(&json!({"success": false, "message": "Group not found"})),
            Some("Group not found".to_string())
        );
        assert_eq!(
            rejection(&json!({"success": false})),
            Some("Request failed".to_string())
        );
        assert_eq!(rejection(&json!({"success": true, "message": "ok"})), None);
        assert_eq!(rejection(&json!({"message": "Joined", "group_id": 3})), None);
        assert_eq!(rejection(&json!([{"error": "inside a list"}])), None);
    }

    #[test]
    fn test_into_result_maps_errors() {
        assert!(matches!(
            ApiOutcome::AuthRequired.into_result(),
            Err(DomainError::AuthRequired)
        ));
        assert!(matches!(
            ApiOutcome::Failed("x".into()).into_result(),
            Err(DomainError::Transport(_))
        ));
    }
}
