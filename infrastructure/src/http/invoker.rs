//! HTTP adapter for [`ApiInvokerPort`]
//!
//! One tool call is exactly one HTTP request against the backing API:
//!
//! ```text
//! {verb} {base_url}{path}?{query}
//! Accept: application/json
//! Authorization: Token {token}      (when configured)
//!
//! {json body}                       (when non-empty)
//! ```

use super::response::{classify_response, describe_transport_error};
use crate::config::FileApiConfig;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use restbridge_application::{ApiInvokerPort, InvocationRequest};
use restbridge_domain::{HttpVerb, InvocationResult, ResolvedRequest};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum InvokerError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct HttpApiInvoker {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApiInvoker {
    /// `timeout` bounds each whole call, body included
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, InvokerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &FileApiConfig) -> Result<Self, InvokerError> {
        Self::new(
            config.base_url.clone(),
            config.token().map(str::to_string),
            config.timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method(verb: HttpVerb) -> reqwest::Method {
        match verb {
            HttpVerb::Get => reqwest::Method::GET,
            HttpVerb::Post => reqwest::Method::POST,
            HttpVerb::Put => reqwest::Method::PUT,
            HttpVerb::Patch => reqwest::Method::PATCH,
            HttpVerb::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl ApiInvokerPort for HttpApiInvoker {
    async fn execute(&self, request: InvocationRequest) -> InvocationResult {
        let start = Instant::now();
        let resolved =
            ResolvedRequest::resolve(request.verb, &request.path_template, &request.arguments);
        let url = format!("{}{}", self.base_url, resolved.path);

        debug!(
            tool = %request.tool_name,
            "{} {} (query: {}, body fields: {})",
            request.verb,
            url,
            resolved.query.len(),
            resolved.body.len()
        );

        let mut builder = self
            .client
            .request(Self::method(request.verb), &url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Token {}", token));
        }
        if !resolved.query.is_empty() {
            builder = builder.query(&resolved.query);
        }
        if !resolved.body.is_empty() {
            builder = builder.json(&resolved.body);
        }

        let result = match builder.send().await {
            Ok(response) => classify_response(&request.tool_name, response).await,
            Err(e) => InvocationResult::transport_error(&request.tool_name, describe_transport_error(&e)),
        };

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            tool = %request.tool_name,
            "{} in {}ms",
            result.status,
            elapsed
        );
        result.with_duration(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, Method, StatusCode, Uri},
        routing::{any, get},
    };
    use restbridge_domain::{Arguments, InvocationStatus};
    use serde_json::{Value, json};
    use std::net::SocketAddr;

    async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(json!({
            "method": method.as_str(),
            "path": uri.path(),
            "query": uri.query(),
            "authorization": header("authorization"),
            "accept": header("accept"),
            "body": if body.is_empty() { Value::Null } else { serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body)) },
        }))
    }

    async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
        let code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (code, "internal detail: token abc123".to_string())
    }

    async fn slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({}))
    }

    async fn not_json() -> &'static str {
        "plain text"
    }

    async fn spawn_backend() -> SocketAddr {
        let app = Router::new()
            .route("/status/{code}", any(status))
            .route("/slow", get(slow))
            .route("/text", get(not_json))
            .fallback(echo);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn invoker(addr: SocketAddr, token: Option<&str>) -> HttpApiInvoker {
        HttpApiInvoker::new(
            format!("http://{}/", addr),
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request(verb: HttpVerb, path: &str, arguments: Value) -> InvocationRequest {
        let arguments: Arguments = arguments.as_object().cloned().unwrap();
        InvocationRequest {
            tool_name: "test_tool".to_string(),
            verb,
            path_template: path.to_string(),
            arguments,
        }
    }

    #[tokio::test]
    async fn test_put_places_path_and_body() {
        let addr = spawn_backend().await;
        let result = invoker(addr, Some("secret"))
            .execute(request(
                HttpVerb::Put,
                "/tasks/{id}/",
                json!({"id": 7, "title": "x", "description": null}),
            ))
            .await;

        assert_eq!(result.status, InvocationStatus::Ok);
        let body = result.body().unwrap();
        assert_eq!(body["method"], "PUT");
        assert_eq!(body["path"], "/tasks/7/");
        assert_eq!(body["query"], Value::Null);
        assert_eq!(body["body"], json!({"title": "x"}));
        assert_eq!(body["authorization"], "Token secret");
        assert_eq!(body["accept"], "application/json");
        assert!(result.metadata.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_get_query_without_token() {
        let addr = spawn_backend().await;
        let result = invoker(addr, None)
            .execute(request(
                HttpVerb::Get,
                "/tasks/",
                json!({"page": 2, "tag": ["a", "b"], "search": null}),
            ))
            .await;

        let body = result.body().unwrap();
        assert_eq!(body["query"], "page=2&tag=a&tag=b");
        assert_eq!(body["body"], Value::Null);
        assert_eq!(body["authorization"], Value::Null);
    }

    #[tokio::test]
    async fn test_forbidden_is_auth_error_without_body() {
        let addr = spawn_backend().await;
        let result = invoker(addr, Some("expired"))
            .execute(request(HttpVerb::Get, "/status/{code}", json!({"code": 403})))
            .await;

        assert_eq!(result.status, InvocationStatus::AuthError);
        assert_eq!(result.metadata.http_status, Some(403));
        assert!(!result.render().contains("abc123"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_auth_error() {
        let addr = spawn_backend().await;
        let result = invoker(addr, None)
            .execute(request(HttpVerb::Get, "/status/{code}", json!({"code": 401})))
            .await;

        assert_eq!(result.status, InvocationStatus::AuthError);
        assert_eq!(result.metadata.http_status, Some(401));
    }

    #[tokio::test]
    async fn test_no_content_is_empty() {
        let addr = spawn_backend().await;
        let result = invoker(addr, None)
            .execute(request(HttpVerb::Delete, "/status/{code}", json!({"code": 204})))
            .await;
        assert_eq!(result.status, InvocationStatus::Empty);
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let addr = spawn_backend().await;
        let result = invoker(addr, None)
            .execute(request(HttpVerb::Post, "/status/{code}", json!({"code": 500})))
            .await;
        assert_eq!(result.status, InvocationStatus::HttpError);
        assert_eq!(result.metadata.http_status, Some(500));
        assert!(result.text().unwrap().contains("internal detail"));
    }

    #[tokio::test]
    async fn test_non_json_success_is_http_error() {
        let addr = spawn_backend().await;
        let result = invoker(addr, None)
            .execute(request(HttpVerb::Get, "/text", json!({})))
            .await;
        assert_eq!(result.status, InvocationStatus::HttpError);
        assert_eq!(result.metadata.http_status, Some(200));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let addr = spawn_backend().await;
        let invoker =
            HttpApiInvoker::new(format!("http://{}", addr), None, Duration::from_millis(100))
                .unwrap();
        let result = invoker
            .execute(request(HttpVerb::Get, "/slow", json!({})))
            .await;
        assert_eq!(result.status, InvocationStatus::TransportError);
        assert_eq!(result.text(), Some("request timed out"));
        assert!(result.metadata.http_status.is_none());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = invoker(addr, None)
            .execute(request(HttpVerb::Get, "/tasks/", json!({})))
            .await;
        assert_eq!(result.status, InvocationStatus::TransportError);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let invoker =
            HttpApiInvoker::new("http://localhost:8000/api/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(invoker.base_url(), "http://localhost:8000/api");
    }
}
