use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Upstream rejected the scan; carries the upstream message.
    #[error("API error: {0}")]
    Api(String),
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub lcp: String,
    pub cls: String,
    #[serde(rename = "seoScore")]
    pub seo_score: f64,
}

#[async_trait]
pub trait ScanBackend: Send + Sync {
    async fn scan(&self, url: &str) -> Result<ScanReport, ScanError>;

    /// Reachability check used by monitors.
    async fn ping(&self, url: &str) -> bool {
        match self.scan(url).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Ping {} failed: {}", url, e);
                false
            }
        }
    }

    fn name(&self) -> &str;
}
