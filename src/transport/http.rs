use super::{FetchedResponse, TargetRequest, Transport, TransportError};
use crate::Result;
use async_trait::async_trait;
use reqwest::Proxy;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use url::Url;

/// HTTP transport backed by a pooled `reqwest` client.
///
/// By default requests have no timeout: slow targets stay in flight until
/// the server answers or the connection drops, and the window simply waits
/// for them. Set `VOLLEY_HTTP_TIMEOUT_SECS` to bound individual calls;
/// timed-out calls surface as per-item transport errors.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        // Minimal production-friendly defaults (env-overridable).
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(
                env::var("VOLLEY_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(
                env::var("VOLLEY_HTTP_POOL_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(90),
            )));

        if let Some(timeout_secs) = env::var("VOLLEY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        if let Ok(proxy_url) = env::var("VOLLEY_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    /// Build a transport around an existing client, keeping its pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Buffer a live response into an owned [`FetchedResponse`].
async fn realize(response: reqwest::Response) -> std::result::Result<FetchedResponse, TransportError> {
    let status = response.status().as_u16();

    let mut headers = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str().to_string(), value.to_string());
        }
    }

    let body = response.bytes().await?;

    Ok(FetchedResponse {
        status,
        headers,
        body,
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        request: &TargetRequest,
    ) -> std::result::Result<FetchedResponse, TransportError> {
        let url = Url::parse(&request.url).map_err(|e| TransportError::InvalidTarget {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let mut req = match request.method.to_uppercase().as_str() {
            "POST" => self.client.post(url),
            "PUT" => self.client.put(url),
            "DELETE" => self.client.delete(url),
            "HEAD" => self.client.head(url),
            _ => self.client.get(url),
        };

        for (k, v) in &request.headers {
            req = req.header(k, v);
        }

        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await?;

        realize(response).await
    }
}
