//! Shared test infrastructure for integration tests.
#![allow(dead_code)]

use std::io::Read;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

/// A request as the stub backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub body: String,
}

/// Scripted analysis backend: answers requests with `replies` in order, then
/// stops listening.
pub struct StubBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StubBackend {
    pub fn spawn(replies: Vec<(u16, String)>) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind stub backend");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("stub backend has an IP address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            for (status, body) in replies {
                let mut request = match server.recv_timeout(Duration::from_secs(5)) {
                    Ok(Some(request)) => request,
                    _ => return,
                };
                let mut request_body = String::new();
                let _ = request.as_reader().read_to_string(&mut request_body);
                recorded
                    .lock()
                    .expect("lock recorded requests")
                    .push(RecordedRequest {
                        method: request.method().to_string(),
                        url: request.url().to_string(),
                        body: request_body,
                    });
                let content_type =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("valid header");
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(content_type);
                let _ = request.respond(response);
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            requests,
            handle: Some(handle),
        }
    }

    pub fn json(status: u16, body: serde_json::Value) -> (u16, String) {
        (status, body.to_string())
    }

    /// Wait for the scripted replies to be consumed and return what was seen.
    pub fn finish(mut self) -> Vec<RecordedRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("stub backend thread");
        }
        self.requests.lock().expect("lock recorded requests").clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock recorded requests").clone()
    }
}

/// A base URL nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let addr = listener.local_addr().expect("probe port address");
    drop(listener);
    format!("http://{addr}")
}

pub fn analysis_body(headline: &str) -> serde_json::Value {
    serde_json::json!({
        "headline": headline,
        "summary": "Summary text",
        "charts": [{
            "type": "dot",
            "title": "EPA per play",
            "data": [{"name": "KC", "value": 0.21}, {"name": "BUF", "value": 0.18}]
        }],
        "insights": ["Kansas City edges Buffalo"]
    })
}
