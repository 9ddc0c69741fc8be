use serde_json::Value;
use tracing::trace;
use url::Url;

use super::EndpointSoftFailure;
use crate::common::request::{Client, RequestClient};

/// Fetches an endpoint's JSON body.
///
/// Deadlines are enforced by the caller.
#[async_trait::async_trait]
pub trait EndpointTransport: Send + Sync {
    async fn fetch_json(&self, url: &Url) -> Result<Value, EndpointSoftFailure>;
}

/// reqwest backed transport: browser user agent, `Accept: application/json`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: RequestClient,
}
impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::json()?,
        })
    }
}

#[async_trait::async_trait]
impl EndpointTransport for HttpTransport {
    async fn fetch_json(&self, url: &Url) -> Result<Value, EndpointSoftFailure> {
        let res = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| EndpointSoftFailure::Network(e.to_string()))?;
        trace!(?res, "Got response from endpoint");

        let status = res.status();
        if !status.is_success() {
            return Err(EndpointSoftFailure::Status(status.as_u16()));
        }

        res.json::<Value>()
            .await
            .map_err(|e| EndpointSoftFailure::Parse(e.to_string()))
    }
}
