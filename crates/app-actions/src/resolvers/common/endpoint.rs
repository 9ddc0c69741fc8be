use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::link_candidate::LinkCandidate;
use crate::resolvers::handlers::ResponseShape;

/// Replaced with the url-encoded link in [`EndpointDescriptor::url_template`]
pub const LINK_PLACEHOLDER: &str = "{url}";

pub const DEFAULT_ENDPOINT_TIMEOUT: Duration = Duration::from_secs(8);

/// One metadata API, tried as a unit by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub name: String,
    pub url_template: String,
    pub shape: ResponseShape,
    pub timeout: Duration,
}
impl EndpointDescriptor {
    #[must_use]
    pub fn new<N, T>(name: N, url_template: T, shape: ResponseShape) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            shape,
            timeout: DEFAULT_ENDPOINT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn request_url(&self, link: &LinkCandidate) -> Result<Url, EndpointSoftFailure> {
        let encoded = form_urlencoded::byte_serialize(link.as_str().as_bytes()).collect::<String>();
        let url = self.url_template.replace(LINK_PLACEHOLDER, &encoded);

        Url::parse(&url).map_err(|e| EndpointSoftFailure::BadTemplate(format!("{url:?}: {e}")))
    }
}

/// The built-in endpoint list, in priority order
#[must_use]
pub fn default_endpoints() -> Vec<EndpointDescriptor> {
    vec![
        EndpointDescriptor::new(
            "tiklydown",
            "https://api.tiklydown.com/api/download?url={url}",
            ResponseShape::Flat,
        ),
        EndpointDescriptor::new(
            "tikwm",
            "https://www.tikwm.com/api/?url={url}&hd=1",
            ResponseShape::Nested,
        ),
        EndpointDescriptor::new(
            "tikcdn",
            "https://tikcdn.io/api/ajaxSearch?url={url}",
            ResponseShape::Nested,
        ),
    ]
}

/// Why a single endpoint didn't produce metadata.
///
/// Never fatal on its own, the resolver moves on to the next endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointSoftFailure {
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Endpoint responded with status {0}")]
    Status(u16),
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Response had no playable source url")]
    MissingSource,
    #[error("Invalid endpoint url {0}")]
    BadTemplate(String),
}
