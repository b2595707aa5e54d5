//! MCP server over stdio
//!
//! JSON-RPC 2.0, one message per line:
//!
//! | Method | Reply |
//! |--------|-------|
//! | `initialize` | server info and the `tools` capability |
//! | `ping` | `{}` |
//! | `tools/list` | every tool with its `inputSchema` |
//! | `tools/call` | `content: [{type: "text", text}]`, `isError` unless the call succeeded |
//! | `notifications/cancelled` | none; aborts the named in-flight call |
//!
//! Calls run concurrently and replies are written as they complete, so they
//! may arrive out of request order.

use restbridge_application::ToolSchemaPort;
use restbridge_domain::{Arguments, InvocationResult, ToolRegistry};
use restbridge_infrastructure::{JsonSchemaToolConverter, LocalToolHost};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Protocol revision offered when the client asks for one we do not know
pub const PROTOCOL_VERSION: &str = "2025-06-18";
const SUPPORTED_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// Raw JSON-RPC envelope
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    #[serde(default)]
    protocol_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Arguments>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelledParams {
    request_id: Value,
}

/// One decoded line
#[derive(Debug, PartialEq)]
pub enum Incoming {
    Initialize {
        id: Value,
        protocol_version: Option<String>,
    },
    Ping {
        id: Value,
    },
    ListTools {
        id: Value,
    },
    CallTool {
        id: Value,
        name: String,
        arguments: Arguments,
    },
    Cancelled {
        request_id: Value,
    },
    /// Any other notification; ignored
    Notification(String),
    /// A reply from the client; this server never sends requests
    Reply,
    Unknown {
        id: Value,
        method: String,
    },
}

/// A request that gets an error reply
#[derive(Debug, Clone, PartialEq)]
pub struct RpcFailure {
    pub id: Value,
    pub code: i64,
    pub message: String,
}

impl RpcFailure {
    fn new(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
struct RpcReply {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

impl RpcReply {
    fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":-32603,"message":"failed to encode reply: {}"}}}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }
}

impl From<RpcFailure> for RpcReply {
    fn from(failure: RpcFailure) -> Self {
        Self {
            jsonrpc: "2.0",
            id: failure.id,
            result: None,
            error: Some(RpcError {
                code: failure.code,
                message: failure.message,
            }),
        }
    }
}

/// Decode one line into a request, notification or reply
pub fn parse_message(line: &str) -> Result<Incoming, RpcFailure> {
    let raw: Value = serde_json::from_str(line)
        .map_err(|e| RpcFailure::new(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)))?;
    let envelope: Envelope = serde_json::from_value(raw).map_err(|e| {
        RpcFailure::new(Value::Null, INVALID_REQUEST, format!("Invalid request: {}", e))
    })?;

    let Some(method) = envelope.method else {
        return match envelope.id {
            Some(_) => Ok(Incoming::Reply),
            None => Err(RpcFailure::new(
                Value::Null,
                INVALID_REQUEST,
                "Invalid request: missing method",
            )),
        };
    };

    let Some(id) = envelope.id else {
        return Ok(match method.as_str() {
            "notifications/cancelled" => {
                match serde_json::from_value::<CancelledParams>(envelope.params) {
                    Ok(params) => Incoming::Cancelled {
                        request_id: params.request_id,
                    },
                    Err(_) => Incoming::Notification(method),
                }
            }
            _ => Incoming::Notification(method),
        });
    };

    match method.as_str() {
        "initialize" => {
            let params: InitializeParams =
                serde_json::from_value(envelope.params).unwrap_or_default();
            Ok(Incoming::Initialize {
                id,
                protocol_version: params.protocol_version,
            })
        }
        "ping" => Ok(Incoming::Ping { id }),
        "tools/list" => Ok(Incoming::ListTools { id }),
        "tools/call" => match serde_json::from_value::<CallParams>(envelope.params) {
            Ok(params) => Ok(Incoming::CallTool {
                id,
                name: params.name,
                arguments: params.arguments.unwrap_or_default(),
            }),
            Err(e) => Err(RpcFailure::new(
                id,
                INVALID_PARAMS,
                format!("Invalid params: {}", e),
            )),
        },
        _ => Ok(Incoming::Unknown { id, method }),
    }
}

/// `initialize` result; the client's revision is echoed when supported
fn initialize_result(requested: Option<&str>) -> Value {
    let version = requested
        .filter(|v| SUPPORTED_VERSIONS.contains(v))
        .unwrap_or(PROTOCOL_VERSION);
    json!({
        "protocolVersion": version,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

/// `tools/call` result
fn call_result(result: &InvocationResult) -> Value {
    json!({
        "content": [{ "type": "text", "text": result.render() }],
        "isError": !result.is_success(),
    })
}

/// `tools/list` entries, sorted by name
pub fn tool_listing(registry: &ToolRegistry) -> Vec<Value> {
    JsonSchemaToolConverter
        .all_tools_schema(registry)
        .into_iter()
        .map(|schema| {
            json!({
                "name": schema["name"],
                "description": schema["description"],
                "inputSchema": schema["input_schema"],
            })
        })
        .collect()
}

/// Key for the in-flight table; ids may be numbers or strings
fn id_key(id: &Value) -> String {
    id.to_string()
}

/// Read stdin lines on a plain thread.
///
/// Tokio's stdin keeps the runtime from shutting down until its pending read
/// returns; this thread is simply abandoned when the process exits.
pub fn stdin_lines() -> std::io::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

/// Serve MCP messages from `lines` until the channel closes or `shutdown`.
///
/// When input closes, calls already in flight run to completion first. On
/// shutdown, in-flight calls are cancelled.
pub async fn serve<W>(
    host: Arc<LocalToolHost>,
    tools: Vec<Value>,
    mut lines: mpsc::UnboundedReceiver<String>,
    writer: W,
    shutdown: CancellationToken,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });
    let reply = |reply: RpcReply| {
        let _ = tx.send(reply.to_line());
    };

    let in_flight: Arc<Mutex<HashMap<String, CancellationToken>>> =
        Arc::new(Mutex::new(HashMap::new()));
    let mut calls = JoinSet::new();

    info!("Serving {} tools over MCP stdio", host.len());

    loop {
        let line = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, stopping request loop");
                break;
            }
            line = lines.recv() => line,
        };
        let Some(line) = line else {
            debug!("Input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let message = match parse_message(&line) {
            Ok(message) => message,
            Err(failure) => {
                warn!("Rejected message: {}", failure.message);
                reply(failure.into());
                continue;
            }
        };

        match message {
            Incoming::Initialize {
                id,
                protocol_version,
            } => {
                debug!("Client requested protocol {:?}", protocol_version);
                reply(RpcReply::result(
                    id,
                    initialize_result(protocol_version.as_deref()),
                ));
            }
            Incoming::Ping { id } => reply(RpcReply::result(id, json!({}))),
            Incoming::ListTools { id } => {
                reply(RpcReply::result(id, json!({ "tools": tools })));
            }
            Incoming::CallTool {
                id,
                name,
                arguments,
            } => {
                let key = id_key(&id);
                let token = shutdown.child_token();
                {
                    let mut table = in_flight.lock().await;
                    if table.contains_key(&key) {
                        reply(
                            RpcFailure::new(
                                id,
                                INVALID_REQUEST,
                                format!("Request id {} is already in flight", key),
                            )
                            .into(),
                        );
                        continue;
                    }
                    table.insert(key.clone(), token.clone());
                }

                let host = Arc::clone(&host);
                let in_flight = Arc::clone(&in_flight);
                let shutdown = shutdown.clone();
                let tx = tx.clone();
                calls.spawn(async move {
                    debug!("Calling '{}' (request {})", name, key);
                    let result = host.invoke_with_cancellation(&name, arguments, &token).await;
                    in_flight.lock().await.remove(&key);

                    // A call cancelled by the client gets no reply
                    if token.is_cancelled() && !shutdown.is_cancelled() {
                        debug!("Request {} cancelled by client", key);
                        return;
                    }
                    let _ = tx.send(RpcReply::result(id, call_result(&result)).to_line());
                });
            }
            Incoming::Cancelled { request_id } => {
                match in_flight.lock().await.get(&id_key(&request_id)) {
                    Some(token) => token.cancel(),
                    None => debug!("Cancellation for unknown request {}", request_id),
                }
            }
            Incoming::Notification(method) => debug!("Ignoring notification {}", method),
            Incoming::Reply => debug!("Ignoring client reply"),
            Incoming::Unknown { id, method } => {
                reply(
                    RpcFailure::new(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
                        .into(),
                );
            }
        }
    }

    while let Some(joined) = calls.join_next().await {
        if let Err(e) = joined {
            warn!("Call task failed: {}", e);
        }
    }

    drop(tx);
    writer_task.await.map_err(std::io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use restbridge_application::{ToolHandler, ToolHostPort};
    use restbridge_domain::{FieldLocation, FieldSpec, HttpVerb, ToolDescriptor, TypeHint};
    use std::time::Duration;
    use tokio::io::AsyncReadExt;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn call(&self, arguments: Arguments) -> InvocationResult {
            InvocationResult::ok("echo", Value::Object(arguments))
        }
    }

    struct Hang;

    #[async_trait]
    impl ToolHandler for Hang {
        async fn call(&self, _arguments: Arguments) -> InvocationResult {
            std::future::pending::<InvocationResult>().await
        }
    }

    fn host() -> Arc<LocalToolHost> {
        let mut host = LocalToolHost::new();
        let pk = FieldSpec::new("pk", true, FieldLocation::Path, TypeHint::Integer);
        host.register("echo", "Echo", std::slice::from_ref(&pk), Arc::new(Echo))
            .unwrap();
        host.register("hang", "Never returns", &[], Arc::new(Hang))
            .unwrap();
        Arc::new(host)
    }

    async fn run(input: &[&str], shutdown: CancellationToken) -> Vec<Value> {
        let (tx, rx) = mpsc::unbounded_channel();
        for line in input {
            tx.send(line.to_string()).unwrap();
        }
        drop(tx);

        let (client, server) = tokio::io::duplex(64 * 1024);
        serve(host(), vec![json!({"name": "echo"})], rx, server, shutdown)
            .await
            .unwrap();

        let mut output = String::new();
        let mut client = client;
        client.read_to_string(&mut output).await.unwrap();
        output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn by_id(replies: &[Value], id: i64) -> &Value {
        replies
            .iter()
            .find(|r| r["id"] == json!(id))
            .unwrap_or_else(|| panic!("no reply for id {id}: {replies:?}"))
    }

    #[test]
    fn test_parse_requests_and_notifications() {
        assert_eq!(
            parse_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","capabilities":{}}}"#)
                .unwrap(),
            Incoming::Initialize {
                id: json!(1),
                protocol_version: Some("2025-03-26".to_string()),
            }
        );

        let call = parse_message(
            r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"echo","arguments":{"pk":7}}}"#,
        )
        .unwrap();
        let mut expected = Arguments::new();
        expected.insert("pk".to_string(), json!(7));
        assert_eq!(
            call,
            Incoming::CallTool {
                id: json!("a"),
                name: "echo".to_string(),
                arguments: expected,
            }
        );

        assert_eq!(
            parse_message(
                r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":"a","reason":"user"}}"#
            )
            .unwrap(),
            Incoming::Cancelled {
                request_id: json!("a"),
            }
        );
        assert_eq!(
            parse_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap(),
            Incoming::Notification("notifications/initialized".to_string())
        );
        assert_eq!(
            parse_message(r#"{"jsonrpc":"2.0","id":3,"result":{}}"#).unwrap(),
            Incoming::Reply
        );
    }

    #[test]
    fn test_parse_failures() {
        let failure = parse_message("not json").unwrap_err();
        assert_eq!(failure.code, PARSE_ERROR);
        assert_eq!(failure.id, Value::Null);

        let failure = parse_message(r#"{"jsonrpc":"2.0","params":{}}"#).unwrap_err();
        assert_eq!(failure.code, INVALID_REQUEST);

        let failure =
            parse_message(r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{}}"#)
                .unwrap_err();
        assert_eq!(failure.code, INVALID_PARAMS);
        assert_eq!(failure.id, json!(9));
    }

    #[test]
    fn test_initialize_version_negotiation() {
        assert_eq!(
            initialize_result(Some("2024-11-05"))["protocolVersion"],
            json!("2024-11-05")
        );
        assert_eq!(
            initialize_result(Some("1999-01-01"))["protocolVersion"],
            json!(PROTOCOL_VERSION)
        );
        assert_eq!(initialize_result(None)["serverInfo"]["name"], json!("restbridge"));
    }

    #[test]
    fn test_tool_listing_uses_input_schema() {
        let mut registry = ToolRegistry::new();
        registry
            .insert(ToolDescriptor {
                name: "task_retrieve".to_string(),
                verb: HttpVerb::Get,
                path_template: "/tasks/{pk}/".to_string(),
                description: "Fetch a task.".to_string(),
                fields: vec![FieldSpec::new(
                    "pk",
                    true,
                    FieldLocation::Path,
                    TypeHint::Integer,
                )],
            })
            .unwrap();

        let tools = tool_listing(&registry);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], json!("task_retrieve"));
        assert_eq!(tools[0]["inputSchema"]["type"], json!("object"));
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["pk"]));
        assert!(tools[0].get("input_schema").is_none());
    }

    #[tokio::test]
    async fn test_session_lists_and_calls_tools() {
        let replies = run(
            &[
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18","capabilities":{}}}"#,
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
                "",
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"echo","arguments":{"pk":7}}}"#,
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"missing"}}"#,
            ],
            CancellationToken::new(),
        )
        .await;
        assert_eq!(replies.len(), 4);

        let init = by_id(&replies, 1);
        assert_eq!(init["jsonrpc"], json!("2.0"));
        assert!(init["result"]["capabilities"]["tools"].is_object());

        assert_eq!(by_id(&replies, 2)["result"]["tools"], json!([{"name": "echo"}]));

        let call = &by_id(&replies, 3)["result"];
        assert_eq!(call["isError"], json!(false));
        assert_eq!(call["content"][0]["type"], json!("text"));
        assert!(call["content"][0]["text"].as_str().unwrap().contains("\"pk\": 7"));

        let missing = &by_id(&replies, 4)["result"];
        assert_eq!(missing["isError"], json!(true));
    }

    #[tokio::test]
    async fn test_cancelled_call_gets_no_reply() {
        let replies = run(
            &[
                r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"hang"}}"#,
                r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":1}}"#,
                r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":42}}"#,
                r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            ],
            CancellationToken::new(),
        )
        .await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["id"], json!(2));
        assert_eq!(replies[0]["result"], json!({}));
    }

    #[tokio::test]
    async fn test_unknown_method_and_duplicate_id() {
        let replies = run(
            &[
                r#"{"jsonrpc":"2.0","id":1,"method":"resources/list"}"#,
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"hang"}}"#,
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"pk":1}}}"#,
                r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":2}}"#,
            ],
            CancellationToken::new(),
        )
        .await;
        assert_eq!(replies.len(), 2);
        assert_eq!(by_id(&replies, 1)["error"]["code"], json!(METHOD_NOT_FOUND));
        assert_eq!(by_id(&replies, 2)["error"]["code"], json!(INVALID_REQUEST));
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let replies = run(&[r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#], shutdown).await;
        assert!(replies.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_with_input_still_open() {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let (_client, server) = tokio::io::duplex(64 * 1024);
        let shutdown = CancellationToken::new();

        let canceller = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            serve(host(), Vec::new(), rx, server, shutdown),
        )
        .await
        .expect("serve should return once shutdown is requested")
        .unwrap();
        drop(tx);
    }
}
