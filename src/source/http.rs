//! HTTP history source.
//!
//! Queries `GET {endpoint}/history?limit=N` on the prediction service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{parse_history, FetchError, HistoryRecord, HistorySource};

/// Default location of the prediction service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// A history source backed by the prediction service's `/history` route.
///
/// No request deadline is imposed unless a timeout is configured on the
/// builder.
#[derive(Debug, Clone)]
pub struct HttpHistorySource {
    client: Client,
    endpoint: String,
    description: String,
}

impl HttpHistorySource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpHistorySourceBuilder {
        HttpHistorySourceBuilder::default()
    }

    /// Returns the base endpoint (without the `/history` path).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request URL for a window of `limit` records.
    pub fn history_url(&self, limit: usize) -> String {
        format!("{}/history?limit={}", self.endpoint, limit)
    }
}

#[async_trait]
impl HistorySource for HttpHistorySource {
    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, FetchError> {
        let url = self.history_url(limit);
        debug!(%url, "fetching history");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_history(&body)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpHistorySource`].
#[derive(Debug, Default)]
pub struct HttpHistorySourceBuilder {
    endpoint: Option<String>,
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
    no_proxy: bool,
}

impl HttpHistorySourceBuilder {
    /// Set the service endpoint (e.g., "http://localhost:5000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the TCP connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set a whole-request timeout. Unset by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ignore proxy settings from the environment.
    pub fn no_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<HttpHistorySource, FetchError> {
        let mut client = Client::builder();
        if let Some(timeout) = self.connect_timeout {
            client = client.connect_timeout(timeout);
        }
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        if self.no_proxy {
            client = client.no_proxy();
        }
        let client = client
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        let description = format!("http: {}", endpoint);

        Ok(HttpHistorySource {
            client,
            endpoint,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and return the request head.
    async fn serve_once(status: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_builder_defaults() {
        let source = HttpHistorySource::builder().build().unwrap();
        assert_eq!(source.endpoint(), "http://localhost:5000");
        assert_eq!(source.description(), "http: http://localhost:5000");
    }

    #[test]
    fn test_history_url_trims_trailing_slash() {
        let source = HttpHistorySource::builder()
            .endpoint("http://pdm.local:8080/")
            .build()
            .unwrap();
        assert_eq!(
            source.history_url(50),
            "http://pdm.local:8080/history?limit=50"
        );
    }

    #[tokio::test]
    async fn test_fetch_history_success() {
        let body = r#"[{"timestamp":"t1","mse":0.5,"classification":"A"},{"timestamp":"t2","mse":1.5,"classification":"D (Not Allowed)"}]"#;
        let (endpoint, server) = serve_once("200 OK", body).await;

        let source = HttpHistorySource::builder()
            .endpoint(endpoint)
            .no_proxy()
            .build()
            .unwrap();
        let records = source.fetch_history(50).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, "t1");
        assert_eq!(records[1].mse, 1.5);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /history?limit=50 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_fetch_history_server_error() {
        let (endpoint, server) =
            serve_once("500 Internal Server Error", r#"{"error":"Internal server error"}"#).await;

        let source = HttpHistorySource::builder()
            .endpoint(endpoint)
            .no_proxy()
            .build()
            .unwrap();
        let result = source.fetch_history(50).await;

        assert!(matches!(result, Err(FetchError::Status(500))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_history_malformed_body() {
        let (endpoint, server) = serve_once("200 OK", "not json").await;

        let source = HttpHistorySource::builder()
            .endpoint(endpoint)
            .no_proxy()
            .build()
            .unwrap();
        let result = source.fetch_history(50).await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_history_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpHistorySource::builder()
            .endpoint(format!("http://{}", addr))
            .no_proxy()
            .build()
            .unwrap();
        let result = source.fetch_history(50).await;

        assert!(matches!(result, Err(FetchError::Connection(_))));
    }

    #[tokio::test]
    async fn test_request_timeout_bounds_slow_service() {
        // Accept the connection but never answer
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let source = HttpHistorySource::builder()
            .endpoint(format!("http://{}", addr))
            .timeout(Duration::from_millis(100))
            .no_proxy()
            .build()
            .unwrap();

        let started = std::time::Instant::now();
        let result = source.fetch_history(50).await;

        assert!(matches!(result, Err(FetchError::Timeout)));
        assert!(started.elapsed() < Duration::from_secs(5));
        server.abort();
    }
}
