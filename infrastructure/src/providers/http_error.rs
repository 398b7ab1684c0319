//! Mapping of transport results and HTTP error responses onto [`LlmError`]

use mcpbridge_application::{HttpResponse, LlmError, TransportError};
use mcpbridge_domain::LlmProvider;
use serde_json::Value;
use tracing::{debug, error};

/// Turn the outcome of a completion request into the response body.
pub(crate) fn completion_body(
    provider: LlmProvider,
    model: &str,
    timeout_secs: f64,
    result: Result<HttpResponse, TransportError>,
) -> Result<Value, LlmError> {
    let response = result.map_err(|e| {
        error!(component = "llm_client", provider = %provider, error = %e, "Request failed");
        match e {
            TransportError::Timeout => LlmError::Timeout { timeout_secs },
            TransportError::Connection(reason) => {
                LlmError::Connection(format!("Failed to connect to {provider} service: {reason}"))
            }
        }
    })?;

    if !response.is_success() {
        return Err(error_from_response(provider, model, &response));
    }

    let body: Value = serde_json::from_str(&response.body).map_err(|e| {
        error!(component = "llm_client", provider = %provider, error = %e, "Response is not JSON");
        LlmError::Response(format!("Failed to parse API response as JSON: {e}"))
    })?;
    debug!(component = "llm_client", provider = %provider, "Chat completion request successful");
    Ok(body)
}

/// Classify an error response.
///
/// Status codes are checked first (401, 429, 404); the token-limit
/// heuristic only applies to the remaining statuses.
pub(crate) fn error_from_response(
    provider: LlmProvider,
    model: &str,
    response: &HttpResponse,
) -> LlmError {
    let status_code = response.status;
    let parsed: Option<Value> = serde_json::from_str(&response.body).ok();
    let error_body = parsed.as_ref().and_then(|v| v.get("error"));

    let message = error_body
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("API request failed with status {status_code}"));
    let error_code = error_body.and_then(|e| e.get("code")).and_then(|code| match code {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    });

    error!(
        component = "llm_client",
        provider = %provider,
        status = status_code,
        error_code = error_code.as_deref(),
        %message,
        "API error"
    );

    match status_code {
        401 => LlmError::Authentication {
            status_code,
            error_code,
        },
        429 => LlmError::RateLimit {
            status_code,
            error_code,
            retry_after: response
                .retry_after
                .as_deref()
                .and_then(|v| v.trim().parse::<f64>().ok()),
        },
        404 => LlmError::Model {
            model: model.to_string(),
            status_code,
            error_code,
        },
        _ if is_token_limit(provider, error_code.as_deref(), &message) => LlmError::TokenLimit {
            status_code,
            error_code,
            message,
        },
        _ => LlmError::Api {
            status_code,
            error_code,
            message,
        },
    }
}

fn is_token_limit(provider: LlmProvider, error_code: Option<&str>, message: &str) -> bool {
    let message = message.to_lowercase();
    match provider {
        LlmProvider::OpenAi => {
            error_code == Some("context_length_exceeded") || message.contains("token")
        }
        LlmProvider::Gemini => message.contains("quota") || message.contains("limit"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai_error(status: u16, body: &str) -> LlmError {
        error_from_response(LlmProvider::OpenAi, "gpt-4", &HttpResponse::new(status, body))
    }

    #[test]
    fn test_completion_body_outcomes() {
        let ok = completion_body(
            LlmProvider::OpenAi,
            "gpt-4",
            30.0,
            Ok(HttpResponse::new(200, r#"{"choices": []}"#)),
        )
        .unwrap();
        assert_eq!(ok["choices"], serde_json::json!([]));

        let err = completion_body(LlmProvider::OpenAi, "gpt-4", 30.0, Ok(HttpResponse::new(200, "oops")))
            .unwrap_err();
        assert_eq!(err.kind(), "response");

        let err = completion_body(LlmProvider::Gemini, "gemini-pro", 30.0, Err(TransportError::Timeout))
            .unwrap_err();
        assert!(matches!(err, LlmError::Timeout { timeout_secs } if timeout_secs == 30.0));

        let err = completion_body(
            LlmProvider::Gemini,
            "gemini-pro",
            30.0,
            Err(TransportError::Connection("refused".to_string())),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Connection error: Failed to connect to gemini service: refused");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            openai_error(401, r#"{"error": {"message": "bad key", "code": "invalid_api_key"}}"#),
            LlmError::Authentication { status_code: 401, error_code: Some(code) } if code == "invalid_api_key"
        ));
        assert!(matches!(
            openai_error(404, "not json"),
            LlmError::Model { model, status_code: 404, .. } if model == "gpt-4"
        ));
    }

    #[test]
    fn test_rate_limit_reads_retry_after() {
        let response = HttpResponse::new(429, "{}").with_retry_after("2.5");
        let err = error_from_response(LlmProvider::OpenAi, "gpt-4", &response);
        assert!(matches!(
            err,
            LlmError::RateLimit { retry_after: Some(r), .. } if r == 2.5
        ));

        let response = HttpResponse::new(429, "{}").with_retry_after("Wed, 21 Oct 2015 07:28:00 GMT");
        let err = error_from_response(LlmProvider::OpenAi, "gpt-4", &response);
        assert!(matches!(err, LlmError::RateLimit { retry_after: None, .. }));
    }

    #[test]
    fn test_token_limit_detection() {
        let err = openai_error(
            400,
            r#"{"error": {"message": "This model's maximum context length is 8192", "code": "context_length_exceeded"}}"#,
        );
        assert!(matches!(err, LlmError::TokenLimit { status_code: 400, .. }));

        let err = openai_error(400, r#"{"error": {"message": "Too many tokens requested"}}"#);
        assert!(matches!(err, LlmError::TokenLimit { .. }));

        let err = error_from_response(
            LlmProvider::Gemini,
            "gemini-pro",
            &HttpResponse::new(400, r#"{"error": {"message": "Quota exceeded for project"}}"#),
        );
        assert!(matches!(err, LlmError::TokenLimit { .. }));
    }

    #[test]
    fn test_generic_api_error() {
        let err = openai_error(500, r#"{"error": {"message": "internal failure", "code": 17}}"#);
        match err {
            LlmError::Api {
                status_code,
                error_code,
                message,
            } => {
                assert_eq!(status_code, 500);
                assert_eq!(error_code.as_deref(), Some("17"));
                assert_eq!(message, "internal failure");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = openai_error(502, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "API error (status 502): API request failed with status 502");
    }
}
