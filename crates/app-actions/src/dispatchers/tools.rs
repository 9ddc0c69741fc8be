use once_cell::sync::Lazy;
use url::Url;

use super::MediaKind;
use crate::resolvers::LinkCandidate;

static SNAPTIK: Lazy<Url> =
    Lazy::new(|| Url::parse("https://snaptik.app/en").expect("Invalid url"));
static SSSTIK: Lazy<Url> = Lazy::new(|| Url::parse("https://ssstik.io/en").expect("Invalid url"));
static TIKDOWN: Lazy<Url> =
    Lazy::new(|| Url::parse("https://tikdown.org/en").expect("Invalid url"));

/// Third party web downloaders the user can fall back to by hand.
///
/// Opened fire-and-forget with the link pre-filled, nothing is parsed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTool {
    Snaptik,
    Ssstik,
    Tikdown,
}
impl FallbackTool {
    pub const ALL: [Self; 3] = [Self::Snaptik, Self::Ssstik, Self::Tikdown];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Snaptik => "snaptik",
            Self::Ssstik => "ssstik",
            Self::Tikdown => "tikdown",
        }
    }

    /// The tool suggested when nothing could be saved for `kind`
    #[must_use]
    pub const fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Video => Self::Ssstik,
            MediaKind::Audio => Self::Snaptik,
        }
    }

    #[must_use]
    pub fn url_for(self, link: &LinkCandidate) -> Url {
        let mut url = match self {
            Self::Snaptik => SNAPTIK.clone(),
            Self::Ssstik => SSSTIK.clone(),
            Self::Tikdown => TIKDOWN.clone(),
        };

        url.query_pairs_mut().append_pair("url", link.as_str());

        url
    }
}

#[must_use]
pub fn fallback_tools(link: &LinkCandidate) -> Vec<(FallbackTool, Url)> {
    FallbackTool::ALL
        .iter()
        .map(|x| (*x, x.url_for(link)))
        .collect()
}
