//! HTTP client for the portal login endpoint

use super::{LoginAction, LoginRequest};
use async_trait::async_trait;
use campus_autologin_shared::{classify, ClassifyError, CodecError, ErrorTable, Outcome, ResolveError};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that end a single login attempt
///
/// None of these are fatal; the owning loop logs them and carries on.
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed response from {url}: {source}")]
    Envelope {
        url: String,
        #[source]
        source: CodecError,
    },

    #[error("Unclassified response from {url}: {source}")]
    Resolve {
        url: String,
        #[source]
        source: ResolveError,
    },
}

impl AttemptError {
    /// Pipeline stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            AttemptError::Transport { .. } | AttemptError::HttpStatus { .. } => "transport",
            AttemptError::Envelope { .. } => "decode",
            AttemptError::Resolve { .. } => "resolve",
        }
    }

    /// URL of the failed request, password masked
    pub fn url(&self) -> &str {
        match self {
            AttemptError::Transport { url, .. }
            | AttemptError::HttpStatus { url, .. }
            | AttemptError::Envelope { url, .. }
            | AttemptError::Resolve { url, .. } => url,
        }
    }
}

/// Performs login attempts against the portal
pub struct GatewayClient {
    http: reqwest::Client,
    request: LoginRequest,
    table: Arc<ErrorTable>,
}

impl GatewayClient {
    /// Create a client for `request`, resolving failures against `table`
    pub fn new(
        request: LoginRequest,
        table: Arc<ErrorTable>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            request,
            table,
        })
    }

    /// Send the login request and classify the gateway's answer
    pub async fn login(&self) -> Result<Outcome, AttemptError> {
        let url = self.request.redacted_url();
        info!(url = %url, "The url trying to fetch");

        let response = self
            .http
            .get(self.request.url())
            .send()
            .await
            .map_err(|source| AttemptError::Transport {
                url: url.to_string(),
                source: source.without_url(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| AttemptError::Transport {
                url: url.to_string(),
                source: source.without_url(),
            })?;
        debug!(bytes = body.len(), "Gateway response received");

        classify(&body, &self.table).map_err(|e| match e {
            ClassifyError::Codec(source) => AttemptError::Envelope {
                url: url.to_string(),
                source,
            },
            ClassifyError::Resolve(source) => AttemptError::Resolve {
                url: url.to_string(),
                source,
            },
        })
    }
}

#[async_trait]
impl LoginAction for GatewayClient {
    async fn attempt(&self) -> Result<Outcome, AttemptError> {
        self.login().await
    }
}
