//! Minimal JSON-RPC client used to probe a configured endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("JSON-RPC error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `eth_chainId`
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let result = self.call("eth_chainId", Vec::new()).await?;
        let quantity = result
            .as_str()
            .ok_or_else(|| RpcError::Malformed(format!("expected hex string, got {result}")))?;
        parse_quantity(quantity)
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let request = Request {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        log::debug!("{method} -> {}", self.url);
        let response = self.http.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Status(status));
        }

        let body: Response = response
            .json()
            .await
            .map_err(|e| RpcError::Malformed(e.to_string()))?;
        extract_result(body)
    }
}

fn extract_result(body: Response) -> Result<Value, RpcError> {
    if let Some(err) = body.error {
        return Err(RpcError::Remote {
            code: err.code,
            message: err.message,
        });
    }
    body.result
        .ok_or_else(|| RpcError::Malformed("response has neither result nor error".to_string()))
}

/// Decode a JSON-RPC hex quantity such as `0x2105`
pub fn parse_quantity(s: &str) -> Result<u64, RpcError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| RpcError::Malformed(format!("quantity without 0x prefix: {s}")))?;
    if digits.is_empty() {
        return Err(RpcError::Malformed(format!("empty quantity: {s}")));
    }
    u64::from_str_radix(digits, 16).map_err(|e| RpcError::Malformed(format!("{s}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x2105").unwrap(), 8453);
        assert_eq!(parse_quantity("0x1").unwrap(), 1);
        assert_eq!(parse_quantity("0X0").unwrap(), 0);
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        for bad in ["2105", "0x", "0xzz", "", "0x10000000000000000"] {
            assert!(parse_quantity(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_request_shape() {
        let request = Request {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_chainId",
            params: Vec::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "eth_chainId", "params": []})
        );
    }

    #[test]
    fn test_extract_result_and_error() {
        let ok: Response = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x2105"}"#).unwrap();
        assert_eq!(extract_result(ok).unwrap(), Value::String("0x2105".into()));

        let err: Response = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"method not found"}}"#,
        )
        .unwrap();
        match extract_result(err) {
            Err(RpcError::Remote { code, message }) => {
                assert_eq!(code, -32601);
                assert_eq!(message, "method not found");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let empty: Response = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(extract_result(empty), Err(RpcError::Malformed(_))));
    }

    async fn serve_once(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // headers, then the JSON body announced by content-length
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                    let body_len = headers
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + body_len {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_chain_id_from_endpoint() {
        let url = serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":"0x2105"}"#).await;
        let client = RpcClient::new(url, Duration::from_millis(5_000)).unwrap();
        assert_eq!(client.chain_id().await.unwrap(), 8453);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let url = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let client = RpcClient::new(url, Duration::from_millis(5_000)).unwrap();
        match client.chain_id().await {
            Err(RpcError::Status(status)) => assert_eq!(status.as_u16(), 500),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remote_error_object() {
        let url = serve_once(
            "200 OK",
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"method not found"}}"#,
        )
        .await;
        let client = RpcClient::new(url, Duration::from_millis(5_000)).unwrap();
        assert!(matches!(
            client.chain_id().await,
            Err(RpcError::Remote { code: -32601, .. })
        ));
    }

    #[tokio::test]
    async fn test_non_string_result_is_malformed() {
        let url = serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":8453}"#).await;
        let client = RpcClient::new(url, Duration::from_millis(5_000)).unwrap();
        assert!(matches!(client.chain_id().await, Err(RpcError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // port 9 (discard) is closed on loopback in test environments
        let client = RpcClient::new("http://127.0.0.1:9", Duration::from_millis(2_000)).unwrap();
        assert!(matches!(client.chain_id().await, Err(RpcError::Transport(_))));
    }
}
