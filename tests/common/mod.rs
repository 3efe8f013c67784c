//! Shared utilities for integration tests.

#![allow(dead_code)]

use ledger_client::ledger::{GatewayResponse, LedgerGateway, LedgerResult};
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request observed by [`ScriptedGateway`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    /// Route segments joined with `/`, with a leading `/`.
    pub path: String,
    pub segments: Vec<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    fn new(method: &'static str, route: &[&str], body: Option<Value>) -> Self {
        Self {
            method,
            path: format!("/{}", route.join("/")),
            segments: route.iter().map(|s| s.to_string()).collect(),
            body,
        }
    }
}

type Handler = dyn Fn(&RecordedRequest) -> LedgerResult<GatewayResponse> + Send + Sync;

/// In-memory gateway answering every request through a closure.
pub struct ScriptedGateway {
    handler: Box<Handler>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedGateway {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> LedgerResult<GatewayResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose path starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .count()
    }

    fn handle(&self, request: RecordedRequest) -> LedgerResult<GatewayResponse> {
        let response = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

impl LedgerGateway for ScriptedGateway {
    async fn get(&self, route: &[&str]) -> LedgerResult<GatewayResponse> {
        self.handle(RecordedRequest::new("GET", route, None))
    }

    async fn post(&self, route: &[&str], body: &Value) -> LedgerResult<GatewayResponse> {
        self.handle(RecordedRequest::new("POST", route, Some(body.clone())))
    }
}

/// A raw HTTP request seen by the programmable backend.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a programmable HTTP backend with async support.
pub async fn start_programmable_backend<F, Fut>(addr: SocketAddr, f: F)
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

async fn read_request(socket: &mut TcpStream) -> Option<HttpRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.lines();
        let request_line = lines.next()?;
        let mut parts = request_line.split_whitespace();
        let method = parts.next()?.to_string();
        let path = parts.next()?.to_string();

        let headers: Vec<(String, String)> = lines
            .filter_map(|line| {
                let (k, v) = line.split_once(':')?;
                Some((k.trim().to_string(), v.trim().to_string()))
            })
            .collect();
        let content_length = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        if buf.len() < body_start + content_length {
            continue;
        }
        let body_end = body_start + content_length;
        let body = String::from_utf8_lossy(&buf[body_start..body_end]).to_string();

        return Some(HttpRequest {
            method,
            path,
            headers,
            body,
        });
    }
}
