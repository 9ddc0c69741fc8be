use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use app_config::Config;
use app_helpers::id::epoch_millis;
pub use handlers::{helper_service::HelperServiceLookup, local::LocalSaveMechanism};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::resolvers::{LinkCandidate, MediaMetadata};
pub use tools::{fallback_tools, FallbackTool};

pub mod handlers;
pub mod tools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}
impl MediaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "mp3",
        }
    }

    /// `<kind>_<epoch-millis>.<ext>`
    #[must_use]
    pub fn file_name(self, epoch_millis: u128) -> String {
        format!("{}_{}.{}", self.as_str(), epoch_millis, self.extension())
    }

    #[must_use]
    pub const fn source_url(self, metadata: &MediaMetadata) -> Option<&Url> {
        match self {
            Self::Video => metadata.video_source_url.as_ref(),
            Self::Audio => metadata.audio_source_url.as_ref(),
        }
    }
}
impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMethod {
    /// Written to disk
    File(PathBuf),
    /// Handed to the system url opener
    NewContext,
    /// Shown to the user to open themselves
    Navigated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Saved {
        url: Url,
        filename: String,
        method: SaveMethod,
    },
    /// No usable url, even after the fallback lookup
    Unavailable,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Url opener failed: {0}")]
    Opener(String),
    #[error("No url opener available")]
    NoOpener,
}

/// Where a resolved url ends up. Tried as save, then open, then navigate.
#[async_trait::async_trait]
pub trait SaveMechanism: Send + Sync {
    async fn save_file(&self, url: &Url, filename: &str) -> Result<PathBuf, SaveError>;

    async fn open_in_new_context(&self, url: &Url) -> Result<(), SaveError>;

    async fn navigate(&self, url: &Url) -> Result<(), SaveError>;
}

/// Second chance at a source url when metadata doesn't carry one for the kind
#[async_trait::async_trait]
pub trait FallbackLookup: Send + Sync {
    async fn lookup(&self, link: &LinkCandidate, kind: MediaKind) -> Option<Url>;
}

#[derive(Clone)]
pub struct Dispatcher {
    lookup: Arc<dyn FallbackLookup>,
    saver: Arc<dyn SaveMechanism>,
}
impl Dispatcher {
    #[must_use]
    pub fn new<L, S>(lookup: L, saver: S) -> Self
    where
        L: FallbackLookup + 'static,
        S: SaveMechanism + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
            saver: Arc::new(saver),
        }
    }

    pub fn from_config(config: &Config, output_dir: &Path) -> anyhow::Result<Self> {
        let lookup = HelperServiceLookup::new(
            Url::parse(&config.endpoint.helper_service_base_url)?,
            config.endpoint.endpoint_timeout(),
        )?;
        let saver = LocalSaveMechanism::new(
            output_dir,
            config.dependency_paths.url_opener_path().map(Path::to_path_buf),
        )?;

        Ok(Self::new(lookup, saver))
    }

    #[tracing::instrument(skip(self, metadata), fields(link = %metadata.link))]
    pub async fn download(&self, metadata: &MediaMetadata, kind: MediaKind) -> DispatchOutcome {
        let Some(url) = self.source_url(metadata, kind).await else {
            warn!("No source url found");
            return DispatchOutcome::Unavailable;
        };

        let filename = kind.file_name(epoch_millis());
        debug!(%url, ?filename, "Saving");

        match self.save(&url, &filename).await {
            Some(method) => {
                info!(?method, ?filename, "Dispatched");
                DispatchOutcome::Saved {
                    url,
                    filename,
                    method,
                }
            }
            None => DispatchOutcome::Unavailable,
        }
    }

    /// Opens the manual fallback tool for `kind`, pre-filled with `link`.
    pub async fn open_alternative(
        &self,
        link: &LinkCandidate,
        kind: MediaKind,
    ) -> Result<Url, SaveError> {
        let url = FallbackTool::for_kind(kind).url_for(link);

        self.saver.open_in_new_context(&url).await.map(|()| url)
    }

    /// Opens every fallback tool, stopping at nothing.
    pub async fn open_all_alternatives(
        &self,
        link: &LinkCandidate,
    ) -> Vec<(FallbackTool, Result<Url, SaveError>)> {
        let mut results = vec![];

        for (tool, url) in fallback_tools(link) {
            let res = self.saver.open_in_new_context(&url).await.map(|()| url);
            results.push((tool, res));
        }

        results
    }

    async fn source_url(&self, metadata: &MediaMetadata, kind: MediaKind) -> Option<Url> {
        if let Some(url) = kind.source_url(metadata) {
            return Some(url.clone());
        }

        debug!(%kind, "Metadata has no source url, asking helper service");

        self.lookup.lookup(&metadata.link, kind).await
    }

    async fn save(&self, url: &Url, filename: &str) -> Option<SaveMethod> {
        match self.saver.save_file(url, filename).await {
            Ok(path) => return Some(SaveMethod::File(path)),
            Err(e) => warn!(?e, "Failed to save file, opening instead"),
        }

        match self.saver.open_in_new_context(url).await {
            Ok(()) => return Some(SaveMethod::NewContext),
            Err(e) => warn!(?e, "Failed to open url, showing it instead"),
        }

        match self.saver.navigate(url).await {
            Ok(()) => Some(SaveMethod::Navigated),
            Err(e) => {
                warn!(?e, "Failed to show url");
                None
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Lookup(MediaKind),
        Save(String, String),
        Open(String),
        Navigate(String),
    }

    type Calls = Arc<Mutex<Vec<Call>>>;

    struct FakeLookup {
        found: Option<Url>,
        calls: Calls,
    }

    #[async_trait::async_trait]
    impl FallbackLookup for FakeLookup {
        async fn lookup(&self, _link: &LinkCandidate, kind: MediaKind) -> Option<Url> {
            self.calls.lock().expect("lock").push(Call::Lookup(kind));
            self.found.clone()
        }
    }

    /// Succeeds at the first step whose flag is set
    struct FakeSaver {
        save_works: bool,
        open_works: bool,
        navigate_works: bool,
        calls: Calls,
    }

    #[async_trait::async_trait]
    impl SaveMechanism for FakeSaver {
        async fn save_file(&self, url: &Url, filename: &str) -> Result<PathBuf, SaveError> {
            self.calls
                .lock()
                .expect("lock")
                .push(Call::Save(url.to_string(), filename.to_string()));

            if self.save_works {
                Ok(PathBuf::from("/downloads").join(filename))
            } else {
                Err(SaveError::Request("status 403".to_string()))
            }
        }

        async fn open_in_new_context(&self, url: &Url) -> Result<(), SaveError> {
            self.calls
                .lock()
                .expect("lock")
                .push(Call::Open(url.to_string()));

            if self.open_works {
                Ok(())
            } else {
                Err(SaveError::NoOpener)
            }
        }

        async fn navigate(&self, url: &Url) -> Result<(), SaveError> {
            self.calls
                .lock()
                .expect("lock")
                .push(Call::Navigate(url.to_string()));

            if self.navigate_works {
                Ok(())
            } else {
                Err(SaveError::Opener("closed".to_string()))
            }
        }
    }

    struct Setup {
        dispatcher: Dispatcher,
        calls: Calls,
    }

    fn setup(found: Option<&str>, save: bool, open: bool, navigate: bool) -> Setup {
        let calls = Calls::default();
        let lookup = FakeLookup {
            found: found.map(|x| Url::parse(x).expect("valid url")),
            calls: calls.clone(),
        };
        let saver = FakeSaver {
            save_works: save,
            open_works: open,
            navigate_works: navigate,
            calls: calls.clone(),
        };

        Setup {
            dispatcher: Dispatcher::new(lookup, saver),
            calls,
        }
    }

    fn metadata(video: Option<&str>, audio: Option<&str>) -> MediaMetadata {
        let link = LinkCandidate::parse("https://www.tiktok.com/@tiktok/video/7324356767578967302")
            .expect("valid link");

        MediaMetadata {
            video_source_url: video.map(|x| Url::parse(x).expect("valid url")),
            audio_source_url: audio.map(|x| Url::parse(x).expect("valid url")),
            ..MediaMetadata::new(link, "test")
        }
    }

    fn is_file_name(name: &str, kind: &str, ext: &str) -> bool {
        name.strip_prefix(kind)
            .and_then(|x| x.strip_prefix('_'))
            .and_then(|x| x.strip_suffix(ext))
            .and_then(|x| x.strip_suffix('.'))
            .is_some_and(|x| !x.is_empty() && x.chars().all(|c| c.is_ascii_digit()))
    }

    #[test]
    fn file_names_follow_kind() {
        assert_eq!(MediaKind::Video.file_name(1_712_345_678_901), "video_1712345678901.mp4");
        assert_eq!(MediaKind::Audio.file_name(5), "audio_5.mp3");
    }

    #[tokio::test]
    async fn video_source_is_saved_as_is() {
        let s = setup(None, true, true, true);

        let outcome = s
            .dispatcher
            .download(&metadata(Some("https://x/a.mp4"), None), MediaKind::Video)
            .await;

        let DispatchOutcome::Saved {
            url,
            filename,
            method,
        } = outcome
        else {
            panic!("expected a save");
        };
        assert_eq!(url.as_str(), "https://x/a.mp4");
        assert!(is_file_name(&filename, "video", "mp4"), "{filename}");
        assert_eq!(method, SaveMethod::File(PathBuf::from("/downloads").join(&filename)));

        let calls = s.calls.lock().expect("lock").clone();
        assert_eq!(calls, [Call::Save("https://x/a.mp4".to_string(), filename)]);
    }

    #[tokio::test]
    async fn missing_audio_asks_the_lookup_before_giving_up() {
        let s = setup(None, true, true, true);

        let outcome = s
            .dispatcher
            .download(&metadata(Some("https://x/a.mp4"), None), MediaKind::Audio)
            .await;

        assert_eq!(outcome, DispatchOutcome::Unavailable);
        let calls = s.calls.lock().expect("lock").clone();
        assert_eq!(calls, [Call::Lookup(MediaKind::Audio)]);
    }

    #[tokio::test]
    async fn lookup_result_is_used_when_found() {
        let s = setup(Some("https://helper.test/audio.mp3"), true, true, true);

        let outcome = s
            .dispatcher
            .download(&metadata(None, None), MediaKind::Audio)
            .await;

        match outcome {
            DispatchOutcome::Saved { url, filename, .. } => {
                assert_eq!(url.as_str(), "https://helper.test/audio.mp3");
                assert!(is_file_name(&filename, "audio", "mp3"), "{filename}");
            }
            DispatchOutcome::Unavailable => panic!("expected a save"),
        }
    }

    #[tokio::test]
    async fn rejected_save_opens_in_new_context() {
        let s = setup(None, false, true, true);

        let outcome = s
            .dispatcher
            .download(&metadata(Some("https://x/a.mp4"), None), MediaKind::Video)
            .await;

        assert!(matches!(
            outcome,
            DispatchOutcome::Saved {
                method: SaveMethod::NewContext,
                ..
            }
        ));
        let calls = s.calls.lock().expect("lock").clone();
        assert!(matches!(calls.as_slice(), [Call::Save(..), Call::Open(_)]));
    }

    #[tokio::test]
    async fn navigation_is_the_last_resort() {
        let s = setup(None, false, false, true);

        let outcome = s
            .dispatcher
            .download(&metadata(Some("https://x/a.mp4"), None), MediaKind::Video)
            .await;

        assert!(matches!(
            outcome,
            DispatchOutcome::Saved {
                method: SaveMethod::Navigated,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn nothing_working_is_unavailable() {
        let s = setup(None, false, false, false);

        let outcome = s
            .dispatcher
            .download(&metadata(Some("https://x/a.mp4"), None), MediaKind::Video)
            .await;

        assert_eq!(outcome, DispatchOutcome::Unavailable);
        assert_eq!(s.calls.lock().expect("lock").len(), 3);
    }

    #[tokio::test]
    async fn alternative_tool_is_opened_for_the_kind() {
        let s = setup(None, true, true, true);
        let link = metadata(None, None).link;

        let url = s
            .dispatcher
            .open_alternative(&link, MediaKind::Audio)
            .await
            .expect("opened");

        assert_eq!(url.host_str(), Some("snaptik.app"));
        assert_eq!(
            s.calls.lock().expect("lock").clone(),
            [Call::Open(url.to_string())]
        );
    }

    #[tokio::test]
    async fn all_alternatives_are_attempted_even_when_failing() {
        let s = setup(None, true, false, true);
        let link = metadata(None, None).link;

        let results = s.dispatcher.open_all_alternatives(&link).await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|(_, res)| res.is_err()));
    }
}
