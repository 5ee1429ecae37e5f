//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use audio_relay::{HttpServer, ProxyConfig, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A canned upstream reply.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
    /// Wait this long before sending anything.
    pub delay: Duration,
    /// Bytes sent after a pause, once `body` has been written.
    pub tail: Option<(Duration, Vec<u8>)>,
}

impl MockReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            delay: Duration::ZERO,
            tail: None,
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[allow(dead_code)]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[allow(dead_code)]
    pub fn tail(mut self, pause: Duration, bytes: impl Into<Vec<u8>>) -> Self {
        self.tail = Some((pause, bytes.into()));
        self
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        206 => "Partial Content",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Request heads seen by a mock upstream, lower-cased.
pub type SeenRequests = Arc<Mutex<Vec<String>>>;

/// Read an HTTP/1.1 request head from the socket.
pub async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).to_lowercase()
}

/// Start a programmable upstream on an ephemeral port.
///
/// `f` receives the lower-cased request head and the upstream's own address.
pub async fn start_upstream<F>(f: F) -> (SocketAddr, SeenRequests)
where
    F: Fn(&str, SocketAddr) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: SeenRequests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = seen.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let head = read_head(&mut socket).await;
                recorded.lock().unwrap().push(head.clone());

                let reply = f(&head, addr);
                tokio::time::sleep(reply.delay).await;

                let mut response = format!("HTTP/1.1 {} {}\r\n", reply.status, reason(reply.status));
                for (name, value) in &reply.headers {
                    response.push_str(&format!("{name}: {value}\r\n"));
                }
                response.push_str("Connection: close\r\n\r\n");

                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.write_all(&reply.body).await;
                let _ = socket.flush().await;
                if let Some((pause, tail)) = reply.tail {
                    tokio::time::sleep(pause).await;
                    let _ = socket.write_all(&tail).await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, seen)
}

/// Start a raw upstream that hands each accepted socket to `f`.
#[allow(dead_code)]
pub async fn start_raw_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(TcpStream) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(f(socket));
        }
    });

    addr
}

/// Config allowing the loopback address as a target.
pub fn loopback_config() -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.access.allowed_domains.push("127.0.0.1".to_string());
    config
}

/// Start the relay on an ephemeral port.
pub async fn start_relay(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config).unwrap();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// `/proxy` URL on the relay for `target`.
pub fn proxy_url(relay: SocketAddr, target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("http://{relay}/proxy?url={encoded}")
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
