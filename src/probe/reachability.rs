//! HTTP GET reachability probe

use super::ConnectivityProbe;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Probes a known-good external URL
pub struct HttpProbe {
    http: reqwest::Client,
    url: String,
}

impl HttpProbe {
    /// Create a probe for `url` with the given request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn is_reachable(&self) -> bool {
        match self.http.get(&self.url).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(url = %self.url, status = status.as_u16(), "Probe answered");
                status == StatusCode::OK
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "Probe request failed");
                false
            }
        }
    }
}
