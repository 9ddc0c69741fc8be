use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::link_candidate::LinkCandidate;
use crate::format::{format_count, format_duration};

pub const DEFAULT_TITLE: &str = "TikTok Video";
pub const DEFAULT_AUTHOR: &str = "@user";

/// Normalized result of one successful resolution.
///
/// A new resolution produces a new value, it is never merged into an older one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub link: LinkCandidate,
    /// Name of the endpoint that produced this record
    pub endpoint: String,
    pub title: String,
    pub author: String,
    pub duration_seconds: Option<f64>,
    pub like_count: Option<u64>,
    pub thumbnail_url: Option<Url>,
    pub video_source_url: Option<Url>,
    pub audio_source_url: Option<Url>,
}
impl MediaMetadata {
    #[must_use]
    pub fn new(link: LinkCandidate, endpoint: &str) -> Self {
        Self {
            link,
            endpoint: endpoint.to_string(),
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            duration_seconds: None,
            like_count: None,
            thumbnail_url: None,
            video_source_url: None,
            audio_source_url: None,
        }
    }

    /// Stand-in shown by the UI when every endpoint failed.
    ///
    /// Carries no source urls, downloading it goes straight to the fallbacks.
    #[must_use]
    pub fn placeholder(link: LinkCandidate) -> Self {
        Self {
            duration_seconds: Some(45.0),
            like_count: Some(1_200),
            ..Self::new(link, "placeholder")
        }
    }

    /// Sample record shown on the very first run.
    #[must_use]
    pub fn demo() -> Option<Self> {
        let link = LinkCandidate::parse("https://www.tiktok.com/@tiktok/video/7324356767578967302")
            .ok()?;

        Some(Self {
            title: "Beautiful Nature - Scenic Views".to_string(),
            author: "@nature_lover".to_string(),
            duration_seconds: Some(75.0),
            like_count: Some(25_400),
            thumbnail_url: Url::parse(
                "https://images.unsplash.com/photo-1593693399708-8f2f13d84f1f?w=400&h=225&fit=crop&auto=format",
            )
            .ok(),
            video_source_url: Url::parse("https://example.com/video.mp4").ok(),
            audio_source_url: Url::parse("https://example.com/audio.mp3").ok(),
            ..Self::new(link, "demo")
        })
    }

    #[must_use]
    pub fn has_playable_source(&self) -> bool {
        self.video_source_url.is_some()
    }

    #[must_use]
    pub fn preview(&self) -> Preview {
        Preview {
            title: self.title.clone(),
            author: self.author.clone(),
            duration: format_duration(self.duration_seconds),
            likes: format_count(self.like_count),
            thumbnail: self.thumbnail_url.as_ref().map(ToString::to_string),
        }
    }
}

/// Display ready strings for a [`MediaMetadata`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub title: String,
    pub author: String,
    pub duration: String,
    pub likes: String,
    pub thumbnail: Option<String>,
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  by {}", self.author)?;
        write!(f, "  {} | {} likes", self.duration, self.likes)?;

        if let Some(thumbnail) = &self.thumbnail {
            write!(f, "\n  thumbnail: {thumbnail}")?;
        }

        Ok(())
    }
}
