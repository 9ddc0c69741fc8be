pub mod flat;
mod lenient;
pub mod nested;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{EndpointSoftFailure, LinkCandidate, MediaMetadata};

/// Known response layouts, each with its own adapter.
///
/// A new endpoint with a new layout gets a new variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// `{ "data": { "play": ..., ... } }`
    Nested,
    /// `{ "play": ..., ... }`
    Flat,
}
impl ResponseShape {
    /// Normalizes `body` into metadata for `link`.
    ///
    /// Fails unless the result has a playable video source.
    pub fn adapt(
        self,
        link: &LinkCandidate,
        endpoint: &str,
        body: &Value,
    ) -> Result<MediaMetadata, EndpointSoftFailure> {
        let meta = match self {
            Self::Nested => nested::adapt(link, endpoint, body),
            Self::Flat => flat::adapt(link, endpoint, body),
        }?;

        if !meta.has_playable_source() {
            return Err(EndpointSoftFailure::MissingSource);
        }

        Ok(meta)
    }
}

/// Fields both layouts share.
///
/// Everything is optional and loosely typed, these APIs are undocumented.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoFields {
    title: Option<Value>,
    author: Option<Value>,
    duration: Option<Value>,
    cover: Option<Value>,
    origin_cover: Option<Value>,
    hdplay: Option<Value>,
    play: Option<Value>,
    music: Option<Value>,
}
impl VideoFields {
    fn from_value(value: &Value) -> Result<Self, EndpointSoftFailure> {
        if !value.is_object() {
            return Err(EndpointSoftFailure::Parse(format!(
                "expected an object, got {}",
                type_name(value)
            )));
        }

        Self::deserialize(value).map_err(|e| EndpointSoftFailure::Parse(e.to_string()))
    }

    fn into_metadata(
        self,
        link: &LinkCandidate,
        endpoint: &str,
        like_count: Option<u64>,
    ) -> MediaMetadata {
        let base = MediaMetadata::new(link.clone(), endpoint);

        MediaMetadata {
            title: lenient::string(self.title.as_ref()).unwrap_or_else(|| base.title.clone()),
            author: lenient::author(self.author.as_ref()).unwrap_or_else(|| base.author.clone()),
            duration_seconds: lenient::number(self.duration.as_ref()),
            like_count,
            thumbnail_url: lenient::url(self.cover.as_ref(), &["url"])
                .or_else(|| lenient::url(self.origin_cover.as_ref(), &["url"])),
            video_source_url: lenient::url(self.hdplay.as_ref(), &[])
                .or_else(|| lenient::url(self.play.as_ref(), &[])),
            audio_source_url: lenient::url(self.music.as_ref(), &["play_url", "play", "url"]),
            ..base
        }
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
