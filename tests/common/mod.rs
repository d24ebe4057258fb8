//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Request targets (`path?query`) seen by a mock service, in arrival order.
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl RequestLog {
    pub fn targets(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    /// Value of `name` in the query string of every request.
    pub fn query_values(&self, name: &str) -> Vec<Option<String>> {
        self.targets()
            .iter()
            .map(|target| {
                let url = url::Url::parse(&format!("http://mock{target}")).unwrap();
                url.query_pairs()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.into_owned())
            })
            .collect()
    }
}

/// Start a mock configuration service on an ephemeral port.
///
/// `f` receives the request target and returns `(status, body)`.
pub async fn start_mock_service<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = RequestLog::default();
    let f = Arc::new(f);

    let requests = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let Some(target) = read_request_target(&mut socket).await else {
                            return;
                        };
                        requests.0.lock().unwrap().push(target.clone());

                        let (status, body) = f(target).await;
                        let status_text = match status {
                            200 => "200 OK".to_string(),
                            400 => "400 Bad Request".to_string(),
                            403 => "403 Forbidden".to_string(),
                            404 => "404 Not Found".to_string(),
                            500 => "500 Internal Server Error".to_string(),
                            503 => "503 Service Unavailable".to_string(),
                            other => format!("{other} Unknown"),
                        };
                        write_response(&mut socket, &status_text, &body).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

async fn write_response(socket: &mut tokio::net::TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Read the request head and return the target of the request line.
async fn read_request_target(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        head.extend_from_slice(&buf[..n]);
    }

    let head = String::from_utf8_lossy(&head);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

/// JSON body of a multi-entry snapshot.
#[allow(dead_code)]
pub fn app_snapshot(entries: &[(&str, &str, i64)], recent_index: u64) -> String {
    let data: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(key, value, ts)| {
            (
                key.to_string(),
                serde_json::json!({"key": key, "value": value, "timestamp": ts}),
            )
        })
        .collect();
    serde_json::json!({"data": data, "recentIndex": recent_index}).to_string()
}
