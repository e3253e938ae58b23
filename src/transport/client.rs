// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Outbound JSON request helper shared by every chain adapter.
//!
//! All provider traffic goes through [`JsonClient`], which sets JSON headers,
//! applies the configured timeout, optionally forwards through a proxy
//! endpoint, and classifies failures into [`ProviderError`] variants.

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, Instrument};
use url::Url;

use crate::config::{HttpSettings, ProviderEndpoint};
use crate::errors::ProviderError;
use crate::tracing::spans;

/// JSON-over-HTTP client used by all adapters
///
/// # Proxy forwarding
///
/// When [`HttpSettings::proxy_url`] is set, a request for
/// `https://mempool.space/api/tx/abc` is sent as
/// `GET {proxy}?url=https%3A%2F%2Fmempool.space%2Fapi%2Ftx%2Fabc` instead.
///
/// # Example
///
/// ```rust,ignore
/// use sbtcscan::transport::JsonClient;
///
/// let client = JsonClient::new(registry.http())?;
/// let tip: String = client.get_text(&provider, "/blocks/tip/height").await?;
/// ```
#[derive(Debug, Clone)]
pub struct JsonClient {
    http: reqwest::Client,
    proxy_url: Option<Url>,
}

impl JsonClient {
    /// Build a client from HTTP settings
    pub fn new(settings: &HttpSettings) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .user_agent(concat!("sbtcscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::network("http-client", "<builder>", e))?;

        Ok(Self {
            http,
            proxy_url: settings.proxy_url.clone(),
        })
    }

    /// Fetch `path` from `provider` and decode the body as `T`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &ProviderEndpoint,
        path: &str,
    ) -> Result<T, ProviderError> {
        let body = self.get_bytes(provider, path).await?;
        serde_json::from_slice(&body).map_err(|e| {
            ProviderError::malformed(&provider.name, format!("{path}: {e}"))
        })
    }

    /// Fetch `path` from `provider` as trimmed UTF-8 text
    ///
    /// Esplora answers a few endpoints (tip height, height-to-hash) with bare
    /// text rather than JSON.
    pub async fn get_text(
        &self,
        provider: &ProviderEndpoint,
        path: &str,
    ) -> Result<String, ProviderError> {
        let body = self.get_bytes(provider, path).await?;
        String::from_utf8(body)
            .map(|text| text.trim().to_string())
            .map_err(|e| ProviderError::malformed(&provider.name, format!("{path}: {e}")))
    }

    /// The URL actually requested for `path` on `provider`
    pub fn request_url(
        &self,
        provider: &ProviderEndpoint,
        path: &str,
    ) -> Result<Url, ProviderError> {
        let target = format!("{}{}", provider.base(), path);
        let parsed = match &self.proxy_url {
            Some(proxy) => Url::parse_with_params(proxy.as_str(), &[("url", target.as_str())]),
            None => Url::parse(&target),
        };
        parsed.map_err(|e| ProviderError::InvalidUrl {
            url: target,
            details: e.to_string(),
        })
    }

    async fn get_bytes(
        &self,
        provider: &ProviderEndpoint,
        path: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let url = self.request_url(provider, path)?;
        let span = spans::provider_request(&provider.name, url.as_str());

        async {
            let started = Instant::now();
            let response = self.http.get(url.clone()).send().await.map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        provider: provider.name.clone(),
                        url: url.to_string(),
                    }
                } else {
                    ProviderError::network(&provider.name, url.as_str(), e)
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                debug!(
                    provider = %provider.name,
                    status = status.as_u16(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Provider returned non-success status"
                );
                return Err(ProviderError::Status {
                    provider: provider.name.clone(),
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = response.bytes().await.map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        provider: provider.name.clone(),
                        url: url.to_string(),
                    }
                } else {
                    ProviderError::network(&provider.name, url.as_str(), e)
                }
            })?;

            debug!(
                provider = %provider.name,
                bytes = body.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Provider request completed"
            );
            trace!(body = %String::from_utf8_lossy(&body), "Provider response body");

            Ok(body.to_vec())
        }
        .instrument(span)
        .await
    }
}
