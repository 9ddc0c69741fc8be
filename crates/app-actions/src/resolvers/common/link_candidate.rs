use std::fmt;

use app_helpers::domain::DomainParser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const ROOT_DOMAIN: &str = "tiktok.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// `tiktok.com/@handle/video/<id>`
    Post,
    /// `tiktok.com/@handle/photo/<id>`
    PhotoPost,
    /// `vm.tiktok.com/<code>` and friends
    Redirector,
    /// `tiktok.com/t/<code>`
    ShortPath,
    /// `m.tiktok.com/v/<id>.html`
    Mobile,
}

struct LinkPattern {
    kind: LinkKind,
    /// Allowed subdomains, `""` being the bare domain
    subdomains: &'static [&'static str],
    path: Regex,
}

static LINK_PATTERNS: Lazy<Vec<LinkPattern>> = Lazy::new(|| {
    vec![
        LinkPattern {
            kind: LinkKind::Post,
            subdomains: &["", "www", "m"],
            path: Regex::new(r"^/@[\w.\-]+/video/\d+/?$").expect("Invalid regex"),
        },
        LinkPattern {
            kind: LinkKind::PhotoPost,
            subdomains: &["", "www", "m"],
            path: Regex::new(r"^/@[\w.\-]+/photo/\d+/?$").expect("Invalid regex"),
        },
        LinkPattern {
            kind: LinkKind::Redirector,
            subdomains: &["vm", "vt"],
            path: Regex::new(r"^/[A-Za-z0-9]+/?$").expect("Invalid regex"),
        },
        LinkPattern {
            kind: LinkKind::ShortPath,
            subdomains: &["", "www"],
            path: Regex::new(r"^/t/[A-Za-z0-9]+/?$").expect("Invalid regex"),
        },
        LinkPattern {
            kind: LinkKind::Mobile,
            subdomains: &["m"],
            path: Regex::new(r"^/v/\d+(\.html)?/?$").expect("Invalid regex"),
        },
    ]
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("No link given")]
    Empty,
    #[error("{0:?} is not a valid URL")]
    Malformed(String),
    #[error("{0:?} doesn't look like a supported video link")]
    Unrecognized(String),
}

/// A user supplied link that passed the shape check.
///
/// Only the shape is checked. Nothing here talks to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    url: Url,
    kind: LinkKind,
}
impl LinkCandidate {
    pub fn parse(raw: &str) -> Result<Self, LinkError> {
        let raw = raw.trim();

        if raw.is_empty() {
            return Err(LinkError::Empty);
        }

        let url = parse_lenient(raw).ok_or_else(|| LinkError::Malformed(raw.to_string()))?;

        Self::match_kind(&url)
            .map(|kind| Self { url, kind })
            .ok_or_else(|| LinkError::Unrecognized(raw.to_string()))
    }

    #[must_use]
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    #[must_use]
    pub const fn kind(&self) -> LinkKind {
        self.kind
    }

    fn match_kind(url: &Url) -> Option<LinkKind> {
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        if !DomainParser::has_domain_root(url, ROOT_DOMAIN) {
            return None;
        }

        let subdomain = DomainParser::get_subdomain(url).unwrap_or_default();

        LINK_PATTERNS
            .iter()
            .find(|x| x.subdomains.contains(&subdomain) && x.path.is_match(url.path()))
            .map(|x| x.kind)
    }
}

impl fmt::Display for LinkCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LinkCandidate {
    type Error = LinkError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

/// Pasted links often lack the scheme.
fn parse_lenient(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) if url.has_host() => Some(url),
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{raw}")).ok()
        }
        Err(_) => None,
    }
}
