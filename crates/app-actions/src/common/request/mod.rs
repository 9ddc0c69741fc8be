use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
pub use reqwest::{Client as RequestClient, ClientBuilder as RequestClientBuilder};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct Client;

impl Client {
    pub fn base() -> Result<RequestClient, reqwest::Error> {
        Self::builder().build()
    }

    /// Client for the metadata APIs: asks for JSON on every request.
    pub fn json() -> Result<RequestClient, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self::builder().default_headers(headers).build()
    }

    pub fn builder() -> RequestClientBuilder {
        RequestClient::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}
