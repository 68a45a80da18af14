//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with extra request headers
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> crate::Result<HttpResponse>;

    /// Send a POST request with form-encoded body
    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse>;

    /// Send a POST request with a plain text body
    async fn post_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Client whose requests fail once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::WatchError::Http(format!("Building HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn finish(
        method: &str,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> crate::Result<HttpResponse> {
        let response = request.send().await.map_err(|e| {
            crate::WatchError::Http(format!("{} {} failed: {}", method, url, e))
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::WatchError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Self::finish("GET", url, request).await
    }

    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", url);
        let request = self.client.post(url).form(params);
        Self::finish("POST", url, request).await
    }

    async fn post_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {} ({} bytes)", url, body.len());
        let mut request = self.client.post(url).body(body.to_string());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Self::finish("POST", url, request).await
    }
}
