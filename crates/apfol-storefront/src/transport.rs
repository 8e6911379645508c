//! GraphQL transport.
//!
//! [`HttpTransport`] posts requests to the Storefront API with reqwest.
//! The [`GraphqlTransport`] trait lets tests script responses instead.

use crate::request::GraphqlRequest;
use crate::response::GraphqlResponse;
use crate::timeout::TimeoutConfig;
use crate::StorefrontError;
use async_trait::async_trait;
use tracing::debug;

/// Header carrying the public Storefront access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Sends a GraphQL request and returns the decoded envelope.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, StorefrontError>;
}

/// Store endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Store domain, e.g. `apfol.myshopify.com`.
    pub domain: String,
    pub access_token: String,
    /// API version, e.g. `2024-01`.
    pub api_version: String,
}

impl Endpoint {
    pub fn new(
        domain: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            access_token: access_token.into(),
            api_version: api_version.into(),
        }
    }

    /// Domain without scheme or trailing slash.
    pub fn host(&self) -> &str {
        self.domain
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
    }

    /// GraphQL endpoint URL.
    pub fn url(&self) -> String {
        format!("https://{}/api/{}/graphql.json", self.host(), self.api_version)
    }
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    /// Build a transport with the given timeouts.
    pub fn new(endpoint: Endpoint, timeouts: TimeoutConfig) -> Result<Self, StorefrontError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.total)
            .user_agent(concat!("apfol/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

fn classify(error: reqwest::Error) -> StorefrontError {
    if error.is_timeout() {
        StorefrontError::Timeout
    } else if error.is_connect() {
        StorefrontError::Connection(error.to_string())
    } else {
        StorefrontError::Http(error)
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, StorefrontError> {
        debug!(operation = request.operation_name, "Sending Storefront request");

        let response = self
            .http
            .post(self.endpoint.url())
            .header(ACCESS_TOKEN_HEADER, &self.endpoint.access_token)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorefrontError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(classify)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let endpoint = Endpoint::new("https://apfol.myshopify.com/", "token", "2024-01");
        assert_eq!(
            endpoint.url(),
            "https://apfol.myshopify.com/api/2024-01/graphql.json"
        );
    }

    #[test]
    fn test_http_transport_builds() {
        let endpoint = Endpoint::new("apfol.myshopify.com", "token", "2024-01");
        let transport = HttpTransport::new(endpoint.clone(), TimeoutConfig::default()).unwrap();
        assert_eq!(transport.endpoint(), &endpoint);
    }
}
