//! Helpers shared by the unit tests: scratch directories and a one-shot
//! HTTP stub standing in for the sheet export and the script endpoint.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A fresh path under the system temp dir. Not created.
pub fn temp_dir(label: &str) -> PathBuf {
    let n = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("pagegate-test-{}-{}-{}", std::process::id(), label, n))
}

pub struct StubServer {
    pub url: String,
    request: JoinHandle<String>,
}

impl StubServer {
    /// The raw request the stub received (head and body).
    pub async fn request(self) -> String {
        self.request.await.unwrap()
    }
}

/// Accept exactly one connection and answer it with the given response.
pub async fn serve_once(status: u16, content_type: &str, body: &str) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        if status < 400 { "OK" } else { "Error" },
        content_type,
        body.len(),
        body
    );

    let request = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    StubServer {
        url: format!("http://{}/exec", addr),
        request,
    }
}

/// A URL on which nothing is listening.
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/exec", addr)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Remembers every redirect instead of performing it.
#[derive(Default)]
pub struct RecordingNavigator {
    redirects: std::sync::Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl crate::guard::Navigator for RecordingNavigator {
    fn redirect(&self, target: &str) {
        self.redirects.lock().unwrap().push(target.to_string());
    }
}
