use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const GENERIC_FAILURE: &str = "Failed to scan URL";

/// Client for a scan service exposing `GET <endpoint>?url=<target>`.
///
/// The service answers `{ lcp, cls, seoScore }` on success and
/// `{ error }` with a non-2xx status on failure.
pub struct EndpointBackend {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl EndpointBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScanBackend for EndpointBackend {
    async fn scan(&self, url: &str) -> Result<ScanReport, ScanError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!("Scan endpoint returned {} for {}", status, url);
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            return Err(ScanError::Api(message));
        }

        response
            .json::<ScanReport>()
            .await
            .map_err(|e| ScanError::Parse(e.to_string()))
    }

    fn name(&self) -> &str {
        "Scan Endpoint"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/api/scan", addr)
    }

    #[tokio::test]
    async fn test_success_body_parses() {
        let endpoint = serve_once("200 OK", r#"{"lcp":"1.2 s","cls":"0.01","seoScore":92}"#).await;
        let report = EndpointBackend::new(endpoint).scan("example.com").await.unwrap();
        assert_eq!(report.lcp, "1.2 s");
        assert_eq!(report.seo_score, 92.0);
    }

    #[tokio::test]
    async fn test_error_body_message_is_surfaced() {
        let endpoint = serve_once("400 Bad Request", r#"{"error":"Invalid URL"}"#).await;
        let err = EndpointBackend::new(endpoint).scan("nope").await.unwrap_err();
        assert!(matches!(err, ScanError::Api(ref m) if m == "Invalid URL"));
    }

    #[tokio::test]
    async fn test_error_without_message_falls_back() {
        let endpoint = serve_once("500 Internal Server Error", "oops").await;
        let backend = EndpointBackend::new(endpoint);
        let err = backend.scan("example.com").await.unwrap_err();
        assert!(matches!(err, ScanError::Api(ref m) if m == GENERIC_FAILURE));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = EndpointBackend::new(format!("http://{}/api/scan", addr));
        let err = backend.scan("example.com").await.unwrap_err();
        assert!(matches!(err, ScanError::Transport(_)));
        assert!(!backend.ping("example.com").await);
    }
}
