//! HTTP transport backed by a blocking `reqwest` client.

use std::time::Duration;

use reqwest::{
    blocking::{Client, RequestBuilder},
    header::CONTENT_TYPE,
    Url,
};
use serde_json::Value;

use super::{ApiError, ApiRequest, Envelope, Method, Transport};
use crate::config::Config;

/// Sends requests to the configured backend base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport from configuration, validating the base URL.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base_url = config.api_base_url.trim().to_string();
        Url::parse(&base_url).map_err(|_| ApiError::InvalidUrl(base_url.clone()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn builder(&self, method: Method, url: &str) -> RequestBuilder {
        match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> Result<Envelope<Value>, ApiError> {
        let url = self.url(&request.path);
        let mut builder = self
            .builder(request.method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|err| {
            if err.is_connect() || err.is_timeout() {
                ApiError::Unreachable(format!("{}: {}", url, err))
            } else {
                ApiError::Http(err)
            }
        })?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            tracing::debug!(%url, code = status.as_u16(), "non-success status");
            return Ok(Envelope::http_failure(status.as_u16(), &text));
        }

        Ok(serde_json::from_str(&text)?)
    }
}
