//! Outbound document fetching.
//!
//! Every request is rewritten through a fixed CORS-style proxy that wraps the
//! target document in a JSON envelope; the core only needs the rewrite to be
//! applied, not the reason for it.  Failures classify into the two
//! user-facing fetch errors: [`Error::Timeout`] for an elapsed deadline and
//! [`Error::Network`] for everything else.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Proxy endpoint every outbound fetch is routed through.
const PROXY_URL: &str = "https://allorigins.hexlet.app/get";

/// Total per-request deadline.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "feedloop/0.1 (RSS aggregator)";

/// JSON envelope returned by the proxy; `contents` holds the raw document.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    contents: String,
}

/// Rewrite a target URL through the proxy, with the cache-bypass flag set.
pub fn proxied(url: &str) -> Result<Url> {
    let mut proxy = Url::parse(PROXY_URL)
        .map_err(|e| Error::Internal(format!("bad proxy template: {e}")))?;
    proxy
        .query_pairs_mut()
        .append_pair("disableCache", "true")
        .append_pair("url", url);
    Ok(proxy)
}

/// Async HTTP client for feed documents.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
}

impl FetchClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch the raw document text behind `url`, via the proxy transform.
    pub async fn fetch_document(&self, url: &str) -> Result<String> {
        let target = proxied(url)?;
        let response = self.client.get(target).send().await.map_err(classify)?;

        if !response.status().is_success() {
            return Err(Error::Network(format!("HTTP {}", response.status())));
        }

        let envelope: ProxyEnvelope = response.json().await.map_err(classify)?;
        Ok(envelope.contents)
    }
}

fn classify(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else if e.is_decode() {
        Error::Network(format!("bad proxy envelope: {e}"))
    } else {
        Error::Network(e.to_string())
    }
}
