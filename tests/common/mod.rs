//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// What the mock backend saw for one request.
#[derive(Debug, Clone, Default)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    /// Header names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Canned reply from the mock backend.
pub struct Reply {
    pub status: u16,
    /// Reason phrase sent on the status line; the canonical one when `None`.
    pub reason: Option<&'static str>,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, content_type: Option<&'static str>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            content_type,
            body: body.into(),
        }
    }

    #[allow(dead_code)]
    pub fn with_reason(mut self, reason: &'static str) -> Self {
        self.reason = Some(reason);
        self
    }

    fn status_line(&self) -> String {
        let reason = self.reason.unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(self.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or_else(|| panic!("status {} needs an explicit reason", self.status))
        });
        format!("{} {}", self.status, reason)
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// Every connection is answered with whatever `f` returns for the parsed request,
/// then closed.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(SeenRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (read, mut write) = socket.into_split();
                        let mut reader = BufReader::new(read);

                        let mut line = String::new();
                        if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                            return;
                        }
                        let mut parts = line.split_whitespace();
                        let mut seen = SeenRequest {
                            method: parts.next().unwrap_or_default().to_string(),
                            path: parts.next().unwrap_or_default().to_string(),
                            ..Default::default()
                        };

                        let mut content_length = 0usize;
                        loop {
                            line.clear();
                            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                                break;
                            }
                            let header = line.trim_end();
                            if header.is_empty() {
                                break;
                            }
                            if let Some((k, v)) = header.split_once(':') {
                                let k = k.trim().to_ascii_lowercase();
                                let v = v.trim().to_string();
                                if k == "content-length" {
                                    content_length = v.parse().unwrap_or(0);
                                }
                                seen.headers.push((k, v));
                            }
                        }

                        let mut body = vec![0u8; content_length];
                        if reader.read_exact(&mut body).await.is_ok() {
                            seen.body = String::from_utf8_lossy(&body).into_owned();
                        }

                        let reply = f(seen).await;
                        let content_type = reply
                            .content_type
                            .map(|ct| format!("Content-Type: {}\r\n", ct))
                            .unwrap_or_default();
                        let response_str = format!(
                            "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            reply.status_line(),
                            content_type,
                            reply.body.len(),
                            reply.body
                        );
                        let _ = write.write_all(response_str.as_bytes()).await;
                        let _ = write.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend that always returns the same reply.
#[allow(dead_code)]
pub async fn start_mock_backend(
    status: u16,
    content_type: Option<&'static str>,
    body: &'static str,
) -> SocketAddr {
    start_programmable_backend(move |_| async move { Reply::new(status, content_type, body) }).await
}
