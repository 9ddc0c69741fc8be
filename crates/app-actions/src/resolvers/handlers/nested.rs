use serde_json::Value;

use super::{lenient, VideoFields};
use crate::resolvers::{EndpointSoftFailure, LinkCandidate, MediaMetadata};

/// `{ "code": 0, "data": { "play": "...", "like_count": 12, ... } }`
pub fn adapt(
    link: &LinkCandidate,
    endpoint: &str,
    body: &Value,
) -> Result<MediaMetadata, EndpointSoftFailure> {
    let data = body
        .get("data")
        .filter(|x| x.is_object())
        .ok_or_else(|| EndpointSoftFailure::Parse("no `data` object in response".to_string()))?;

    let like_count = lenient::count(data.get("like_count"))
        .or_else(|| lenient::count(data.get("digg_count")));

    Ok(VideoFields::from_value(data)?.into_metadata(link, endpoint, like_count))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resolvers::handlers::ResponseShape;

    fn link() -> LinkCandidate {
        LinkCandidate::parse("https://www.tiktok.com/@tiktok/video/7324356767578967302")
            .expect("valid link")
    }

    #[test]
    fn maps_the_data_envelope() {
        let body = json!({
            "code": 0,
            "msg": "success",
            "data": {
                "title": "Cat video",
                "author": { "unique_id": "tiktok", "nickname": "TikTok" },
                "duration": 75,
                "like_count": 1500,
                "cover": "https://cdn.example/cover.jpg",
                "play": "https://cdn.example/play.mp4",
                "hdplay": "https://cdn.example/hd.mp4",
                "music": "https://cdn.example/music.mp3",
            }
        });

        let meta = ResponseShape::Nested
            .adapt(&link(), "tikwm", &body)
            .expect("usable response");

        assert_eq!(meta.endpoint, "tikwm");
        assert_eq!(meta.title, "Cat video");
        assert_eq!(meta.author, "@tiktok");
        assert_eq!(meta.duration_seconds, Some(75.0));
        assert_eq!(meta.like_count, Some(1_500));
        assert_eq!(
            meta.video_source_url.map(String::from).as_deref(),
            Some("https://cdn.example/hd.mp4")
        );
        assert_eq!(
            meta.audio_source_url.map(String::from).as_deref(),
            Some("https://cdn.example/music.mp3")
        );
        assert_eq!(
            meta.thumbnail_url.map(String::from).as_deref(),
            Some("https://cdn.example/cover.jpg")
        );
    }

    #[test]
    fn falls_back_to_play_and_digg_count() {
        let body = json!({
            "data": {
                "play": "https://cdn.example/play.mp4",
                "digg_count": "2500000",
                "hdplay": "",
            }
        });

        let meta = ResponseShape::Nested
            .adapt(&link(), "tikwm", &body)
            .expect("usable response");

        assert_eq!(
            meta.video_source_url.map(String::from).as_deref(),
            Some("https://cdn.example/play.mp4")
        );
        assert_eq!(meta.like_count, Some(2_500_000));
        assert_eq!(meta.title, "TikTok Video");
        assert_eq!(meta.author, "@user");
        assert_eq!(meta.audio_source_url, None);
    }

    #[test]
    fn flat_body_is_not_nested() {
        let body = json!({ "play": "https://cdn.example/play.mp4" });

        assert!(matches!(
            ResponseShape::Nested.adapt(&link(), "tikwm", &body),
            Err(EndpointSoftFailure::Parse(_))
        ));
    }

    #[test]
    fn error_envelope_has_no_source() {
        let body = json!({ "code": -1, "msg": "Url parsing is failed!", "data": {} });

        assert_eq!(
            ResponseShape::Nested.adapt(&link(), "tikwm", &body),
            Err(EndpointSoftFailure::MissingSource)
        );
    }
}
