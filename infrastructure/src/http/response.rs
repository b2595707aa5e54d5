//! Response classification: HTTP response → [`InvocationResult`]

use restbridge_domain::InvocationResult;
use restbridge_domain::core::string::truncate;
use serde_json::Value;

/// Longest excerpt of a non-JSON 2xx body quoted back to the caller
const BODY_PREVIEW_LEN: usize = 500;

/// Classify a received response.
///
/// 401/403 bodies are never read, so nothing the API says about the
/// credential reaches the caller.
pub async fn classify_response(tool_name: &str, response: reqwest::Response) -> InvocationResult {
    let status = response.status().as_u16();

    if is_auth_failure(status) {
        return InvocationResult::auth_error(tool_name).with_http_status(status);
    }
    if status == 204 {
        return InvocationResult::empty(tool_name).with_http_status(status);
    }

    match response.text().await {
        Ok(text) => classify_body(tool_name, status, &text),
        Err(e) => InvocationResult::transport_error(
            tool_name,
            format!("failed to read response body: {}", e),
        )
        .with_http_status(status),
    }
}

pub fn is_auth_failure(status: u16) -> bool {
    status == 401 || status == 403
}

/// Classify a response whose body has been read
pub fn classify_body(tool_name: &str, status: u16, text: &str) -> InvocationResult {
    if is_auth_failure(status) {
        return InvocationResult::auth_error(tool_name).with_http_status(status);
    }
    if status == 204 {
        return InvocationResult::empty(tool_name).with_http_status(status);
    }

    let result = if (200..300).contains(&status) {
        match serde_json::from_str::<Value>(text) {
            Ok(body) => InvocationResult::ok(tool_name, body),
            Err(e) => InvocationResult::http_error(
                tool_name,
                format!(
                    "response is not valid JSON ({}): {}",
                    e,
                    truncate(text, BODY_PREVIEW_LEN)
                ),
            ),
        }
    } else {
        InvocationResult::http_error(tool_name, text)
    };
    result.with_http_status(status)
}

/// Short description of a transport failure
pub fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
