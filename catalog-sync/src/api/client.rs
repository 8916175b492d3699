//! HTTP transport for payload submissions

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// Status and body of a completed POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostResponse {
    pub status: u16,
    pub body: String,
}

/// Posts serialized payloads to an endpoint
#[async_trait]
pub trait PayloadPoster: Send + Sync {
    /// POST `body` as `application/json`. Any status counts as a response;
    /// only transport failures are errors.
    async fn post_json(&self, url: &str, body: &str) -> Result<PostResponse>;
}

/// reqwest-backed poster. Uses the client's default timeouts.
#[derive(Debug, Clone, Default)]
pub struct HttpPoster {
    http: reqwest::Client,
}

impl HttpPoster {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PayloadPoster for HttpPoster {
    async fn post_json(&self, url: &str, body: &str) -> Result<PostResponse> {
        log::debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        // The request was delivered once a status arrives; a broken body
        // only loses the text used in log lines.
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                log::debug!("Failed to read response body from {}: {}", url, e);
                String::new()
            }
        };

        Ok(PostResponse { status, body })
    }
}
