use serde_json::Value;

use super::{lenient, VideoFields};
use crate::resolvers::{EndpointSoftFailure, LinkCandidate, MediaMetadata};

/// `{ "play": "...", "likes": 12, ... }` at the top level
pub fn adapt(
    link: &LinkCandidate,
    endpoint: &str,
    body: &Value,
) -> Result<MediaMetadata, EndpointSoftFailure> {
    let like_count =
        lenient::count(body.get("likes")).or_else(|| lenient::count(body.get("like_count")));

    Ok(VideoFields::from_value(body)?.into_metadata(link, endpoint, like_count))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resolvers::handlers::ResponseShape;

    fn link() -> LinkCandidate {
        LinkCandidate::parse("https://vm.tiktok.com/ZMeAbCdEf/").expect("valid link")
    }

    #[test]
    fn maps_top_level_fields() {
        let body = json!({
            "title": "  Dance  ",
            "author": "dancer",
            "duration": "31.7",
            "likes": 999,
            "cover": "https://cdn.example/c.jpg",
            "play": "https://cdn.example/p.mp4",
            "music": { "play_url": "https://cdn.example/m.mp3" },
        });

        let meta = ResponseShape::Flat
            .adapt(&link(), "tiklydown", &body)
            .expect("usable response");

        assert_eq!(meta.title, "Dance");
        assert_eq!(meta.author, "@dancer");
        assert_eq!(meta.duration_seconds, Some(31.7));
        assert_eq!(meta.like_count, Some(999));
        assert_eq!(
            meta.audio_source_url.map(String::from).as_deref(),
            Some("https://cdn.example/m.mp3")
        );
        assert_eq!(meta.link, link());
    }

    #[test]
    fn wrong_types_are_dropped_not_fatal() {
        let body = json!({
            "title": 42,
            "duration": [1, 2],
            "cover": "not a url",
            "play": "https://cdn.example/p.mp4",
        });

        let meta = ResponseShape::Flat
            .adapt(&link(), "tiklydown", &body)
            .expect("usable response");

        assert_eq!(meta.title, "TikTok Video");
        assert_eq!(meta.duration_seconds, None);
        assert_eq!(meta.thumbnail_url, None);
    }

    #[test]
    fn missing_play_is_not_usable() {
        let body = json!({ "title": "x", "music": "https://cdn.example/m.mp3" });

        assert_eq!(
            ResponseShape::Flat.adapt(&link(), "tiklydown", &body),
            Err(EndpointSoftFailure::MissingSource)
        );
    }

    #[test]
    fn non_object_body_is_a_parse_failure() {
        assert!(matches!(
            ResponseShape::Flat.adapt(&link(), "tiklydown", &json!("rate limited")),
            Err(EndpointSoftFailure::Parse(_))
        ));
    }
}
