use std::{fmt, sync::Arc, time::Instant};

use app_config::common::EndpointConfig;
pub use common::{
    endpoint::{default_endpoints, EndpointDescriptor, EndpointSoftFailure, LINK_PLACEHOLDER},
    link_candidate::{LinkCandidate, LinkError, LinkKind},
    media_metadata::{MediaMetadata, Preview},
};
pub use handlers::ResponseShape;
use thiserror::Error;
use tracing::{debug, info, warn};
pub use transport::{EndpointTransport, HttpTransport};

mod common;
pub mod handlers;
mod transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftFailureReport {
    pub endpoint: String,
    pub failure: EndpointSoftFailure,
}
impl fmt::Display for SoftFailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.failure)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    #[error(transparent)]
    InvalidLink(#[from] LinkError),
    #[error("All {} sources failed: {}", .0.len(), join_reports(.0))]
    AllSourcesExhausted(Vec<SoftFailureReport>),
}

fn join_reports(reports: &[SoftFailureReport]) -> String {
    reports
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Turns a link into [`MediaMetadata`] by asking endpoints one at a time.
///
/// Endpoints are tried strictly in order. A failing endpoint only costs its
/// own timeout, the first usable answer wins and nothing after it is called.
#[derive(Clone)]
pub struct Resolver {
    endpoints: Vec<EndpointDescriptor>,
    transport: Arc<dyn EndpointTransport>,
}
impl Resolver {
    #[must_use]
    pub fn new<T>(endpoints: Vec<EndpointDescriptor>, transport: T) -> Self
    where
        T: EndpointTransport + 'static,
    {
        Self {
            endpoints,
            transport: Arc::new(transport),
        }
    }

    /// Built-in endpoints minus the disabled ones, all with the configured timeout.
    pub fn from_config(config: &EndpointConfig) -> Result<Self, reqwest::Error> {
        let endpoints = default_endpoints()
            .into_iter()
            .filter(|x| config.is_endpoint_enabled(&x.name))
            .map(|x| x.with_timeout(config.endpoint_timeout()))
            .collect();

        Ok(Self::new(endpoints, HttpTransport::new()?))
    }

    #[must_use]
    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, link: &str) -> Result<MediaMetadata, ResolutionFailure> {
        let link = LinkCandidate::parse(link)?;

        self.resolve_link(&link).await
    }

    pub async fn resolve_link(
        &self,
        link: &LinkCandidate,
    ) -> Result<MediaMetadata, ResolutionFailure> {
        let mut failures = Vec::with_capacity(self.endpoints.len());

        for endpoint in &self.endpoints {
            let started = Instant::now();

            match self.try_endpoint(endpoint, link).await {
                Ok(meta) => {
                    info!(endpoint = %endpoint.name, took = ?started.elapsed(), "Resolved link");
                    return Ok(meta);
                }
                Err(failure) => {
                    warn!(
                        endpoint = %endpoint.name,
                        %failure,
                        took = ?started.elapsed(),
                        "Endpoint failed, trying next one"
                    );
                    failures.push(SoftFailureReport {
                        endpoint: endpoint.name.clone(),
                        failure,
                    });
                }
            }
        }

        Err(ResolutionFailure::AllSourcesExhausted(failures))
    }

    async fn try_endpoint(
        &self,
        endpoint: &EndpointDescriptor,
        link: &LinkCandidate,
    ) -> Result<MediaMetadata, EndpointSoftFailure> {
        let url = endpoint.request_url(link)?;
        debug!(endpoint = %endpoint.name, %url, "Trying endpoint");

        let body = tokio::time::timeout(endpoint.timeout, self.transport.fetch_json(&url))
            .await
            .map_err(|_| EndpointSoftFailure::Timeout(endpoint.timeout))??;

        endpoint.shape.adapt(link, &endpoint.name, &body)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}
