use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

pub const PAGESPEED_API: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Talks to Google PageSpeed Insights directly.
pub struct PageSpeedBackend {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl PageSpeedBackend {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_api_url(PAGESPEED_API, api_key)
    }

    pub fn with_api_url(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }
}

/// Prefixes `https://` unless the target already names a scheme.
pub fn normalize_target(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Pulls LCP, CLS and the SEO score (scaled to 0-100) out of a PageSpeed
/// response.
pub fn extract_report(json: &Value) -> Result<ScanReport, ScanError> {
    if let Some(error) = json.get("error") {
        let message = error["message"]
            .as_str()
            .unwrap_or(crate::endpoint::GENERIC_FAILURE)
            .to_string();
        return Err(ScanError::Api(message));
    }

    let lighthouse = &json["lighthouseResult"];
    let audit_display = |audit: &str| -> Result<String, ScanError> {
        lighthouse["audits"][audit]["displayValue"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ScanError::Parse(format!("Missing audit: {}", audit)))
    };

    let lcp = audit_display("largest-contentful-paint")?;
    let cls = audit_display("cumulative-layout-shift")?;
    let seo = lighthouse["categories"]["seo"]["score"]
        .as_f64()
        .ok_or_else(|| ScanError::Parse("Missing SEO category score".to_string()))?;

    Ok(ScanReport {
        lcp,
        cls,
        seo_score: seo * 100.0,
    })
}

#[async_trait]
impl ScanBackend for PageSpeedBackend {
    async fn scan(&self, url: &str) -> Result<ScanReport, ScanError> {
        let Some(api_key) = &self.api_key else {
            return Err(ScanError::Config(
                "Server configuration error: Missing API Key".to_string(),
            ));
        };

        let target = normalize_target(url);
        tracing::info!("Requesting PageSpeed report for {}", target);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("url", target.as_str()),
                ("key", api_key.as_str()),
                ("category", "seo"),
                ("category", "performance"),
            ])
            .send()
            .await
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| ScanError::Parse(e.to_string()))?;

        extract_report(&json)
    }

    fn name(&self) -> &str {
        "PageSpeed Insights"
    }
}
