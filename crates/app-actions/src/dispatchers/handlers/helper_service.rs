use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, trace, warn};
use url::Url;

use crate::{
    common::request::{Client, RequestClient},
    dispatchers::{FallbackLookup, MediaKind},
    resolvers::LinkCandidate,
};

/// Asks an external helper service for a direct media url.
///
/// Best effort: most of the time the service answers with an html page,
/// which isn't something we can save, so the lookup comes back empty.
#[derive(Debug, Clone)]
pub struct HelperServiceLookup {
    base_url: Url,
    timeout: Duration,
    client: RequestClient,
}
impl HelperServiceLookup {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url,
            timeout,
            client: Client::base()?,
        })
    }

    #[must_use]
    pub fn lookup_url(&self, link: &LinkCandidate, kind: MediaKind) -> Url {
        let mut url = self.base_url.clone();

        {
            let mut q = url.query_pairs_mut();
            q.append_pair("url", link.as_str());
            if kind == MediaKind::Audio {
                q.append_pair("type", "audio");
            }
        }

        url
    }
}

#[async_trait::async_trait]
impl FallbackLookup for HelperServiceLookup {
    #[tracing::instrument(skip(self, link), fields(link = %link))]
    async fn lookup(&self, link: &LinkCandidate, kind: MediaKind) -> Option<Url> {
        let url = self.lookup_url(link, kind);
        debug!(%url, "Asking helper service");

        let res = match self
            .client
            .get(url.as_str())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                warn!(?e, "Helper service request failed");
                return None;
            }
        };
        trace!(?res, "Got response from helper service");

        if !res.status().is_success() {
            warn!(status = ?res.status(), "Helper service refused");
            return None;
        }

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|x| x.to_str().ok())
            .unwrap_or_default();

        if is_media_content_type(content_type) {
            Some(res.url().clone())
        } else {
            debug!(?content_type, "Helper service answer isn't media");
            None
        }
    }
}

fn is_media_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("video/") || mime.starts_with("audio/") || mime == "application/octet-stream"
}
