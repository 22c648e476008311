//! `reqwest` implementation of page fetching and webhook posting.

use crate::skill_runtime::ports::{
    FetchedPage, OutboundError, OutboundResult, PageFetcher, WebhookPoster, WebhookReply,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Timeout applied to every outbound request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_HEADERS: [(&str, &str); 10] = [
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("DNT", "1"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Cache-Control", "max-age=0"),
];

/// Builds the shared client with the runtime timeout.
///
/// # Errors
///
/// Returns the `reqwest` builder error when TLS initialisation fails.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// Page fetcher and webhook poster over one `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    /// Wraps an existing client.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for ReqwestHttp {
    async fn fetch(
        &self,
        url: &Url,
        headers: &BTreeMap<String, String>,
    ) -> OutboundResult<FetchedPage> {
        let mut request = self.client.get(url.clone());
        for (name, value) in BROWSER_HEADERS {
            if !headers.keys().any(|custom| custom.eq_ignore_ascii_case(name)) {
                request = request.header(name, value);
            }
        }
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(OutboundError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(OutboundError::transport)?;
        Ok(FetchedPage {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
        })
    }
}

#[async_trait]
impl WebhookPoster for ReqwestHttp {
    async fn post_json(&self, url: &Url, payload: &Value) -> OutboundResult<WebhookReply> {
        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(OutboundError::transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(OutboundError::transport)?;
        Ok(WebhookReply { status, body })
    }
}
