//! Scripted local Bitget server.
//!
//! [`ScriptedExchange`] listens on `127.0.0.1`, answers each request path
//! from a queue of canned responses, and records every request it receives
//! so tests can assert on signatures, query strings and bodies.
//!
//! Queues pop in order; the last response for a path is sticky and answers
//! every later request. Unscripted paths get a 404 with a Bitget-style body.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Path of the public time endpoint.
pub const TIME_PATH: &str = "/api/v2/public/time";

/// A canned HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedResponse {
    pub status: u16,
    pub body: String,
}

impl ScriptedResponse {
    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 with an arbitrary JSON body.
    pub fn json(value: Value) -> Self {
        Self::raw(200, value.to_string())
    }

    /// 200 with a success envelope around `data`.
    pub fn ok(data: Value) -> Self {
        Self::json(json!({
            "code": "00000",
            "msg": "success",
            "requestTime": 1_700_000_000_000_i64,
            "data": data
        }))
    }

    /// 400 with a Bitget error envelope.
    pub fn error(code: &str, msg: &str) -> Self {
        Self::raw(
            400,
            json!({"code": code, "msg": msg, "requestTime": 1_700_000_000_000_i64, "data": null})
                .to_string(),
        )
    }

    /// Public time endpoint reply.
    pub fn server_time(ms: i64) -> Self {
        Self::ok(json!({"serverTime": ms.to_string()}))
    }
}

/// One request as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    /// Raw query string, empty when absent.
    pub query: String,
    /// Header names lowercased.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Path plus query, as signed by the client.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

#[derive(Default)]
struct State {
    routes: HashMap<String, VecDeque<ScriptedResponse>>,
    requests: Vec<RecordedRequest>,
}

impl State {
    fn respond(&mut self, path: &str) -> ScriptedResponse {
        match self.routes.get_mut(path) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(not_scripted),
            Some(queue) => queue.front().cloned().unwrap_or_else(not_scripted),
            None => not_scripted(),
        }
    }
}

fn not_scripted() -> ScriptedResponse {
    ScriptedResponse::raw(404, json!({"code": "40404", "msg": "not scripted"}).to_string())
}

/// Local HTTP server answering scripted Bitget responses.
pub struct ScriptedExchange {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
    task: JoinHandle<()>,
}

impl ScriptedExchange {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind scripted exchange");
        let addr = listener.local_addr().expect("local addr");
        let state = Arc::new(Mutex::new(State::default()));

        let shared = Arc::clone(&state);
        let task = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let state = Arc::clone(&shared);
                tokio::spawn(async move {
                    let _ = serve(socket, state).await;
                });
            }
        });

        Self { addr, state, task }
    }

    /// Base URL to point a client at.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queue `response` for `path`.
    pub fn on(&self, path: &str, response: ScriptedResponse) -> &Self {
        self.state
            .lock()
            .routes
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Queue a success envelope around `data` for `path`.
    pub fn on_ok(&self, path: &str, data: Value) -> &Self {
        self.on(path, ScriptedResponse::ok(data))
    }

    /// Answer the public time endpoint with `ms`.
    pub fn with_server_time(&self, ms: i64) -> &Self {
        self.on(TIME_PATH, ScriptedResponse::server_time(ms))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|req| req.path == path)
            .cloned()
            .collect()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|req| req.path == path)
            .count()
    }
}

impl Drop for ScriptedExchange {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(mut socket: TcpStream, state: Arc<Mutex<State>>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();

    let headers: BTreeMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (target.clone(), String::new()),
    };

    let response = {
        let mut state = state.lock();
        state.requests.push(RecordedRequest {
            method,
            path: path.clone(),
            query,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        state.respond(&path)
    };

    let reply = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason(response.status),
        response.body.len(),
        response.body
    );
    socket.write_all(reply.as_bytes()).await?;
    socket.shutdown().await
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Status",
    }
}
