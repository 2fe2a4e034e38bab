//! HTTP client shared by every store adapter.

use std::time::Duration;

use reqwest::{Client, Method, Url};

use crate::error::ScraperError;

/// Descriptor of one outbound store call, produced by an adapter and sent by
/// [`StoreClient::send_json`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RequestSpec {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn with_headers<'a, I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Full URL including query pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the base URL does not parse.
    pub fn resolved_url(&self) -> Result<Url, ScraperError> {
        let mut url = Url::parse(&self.url).map_err(|e| ScraperError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

/// Thin wrapper over `reqwest::Client` with a fixed per-request timeout.
///
/// Non-2xx responses and non-JSON bodies come back as typed errors. No
/// retries: one failure is final for the request that produced it.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: Client,
}

impl StoreClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Sends the request and parses the response body as JSON.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`]: the request URL does not parse.
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network, TLS, or timeout failure.
    /// - [`ScraperError::Deserialize`]: response body is not valid JSON.
    pub async fn send_json(&self, spec: &RequestSpec) -> Result<serde_json::Value, ScraperError> {
        let url = spec.resolved_url()?;

        let mut request = self
            .client
            .request(spec.method.clone(), url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<serde_json::Value>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("{} {}", spec.method, url),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
