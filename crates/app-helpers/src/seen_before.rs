use std::{
    fs, io,
    path::{Path, PathBuf},
};

use app_config::Config;
use tracing::{debug, warn};

const MARKER_FILE_NAME: &str = "initialized";

/// Persisted "has this app run before" flag.
///
/// The only state kept between runs: an empty marker file.
#[derive(Debug, Clone)]
pub struct SeenBefore {
    marker: PathBuf,
}
impl SeenBefore {
    /// Marker in the application cache directory
    #[must_use]
    pub fn from_config() -> Self {
        Self::in_dir(Config::cache_dir())
    }

    #[must_use]
    pub fn in_dir<T>(dir: T) -> Self
    where
        T: AsRef<Path>,
    {
        Self {
            marker: dir.as_ref().join(MARKER_FILE_NAME),
        }
    }

    #[must_use]
    pub fn marker_path(&self) -> &Path {
        &self.marker
    }

    /// Returns whether the app was seen before and marks it as seen.
    ///
    /// IO errors count as "seen" so a broken cache dir doesn't replay the first run forever.
    #[must_use]
    pub fn check_and_mark(&self) -> bool {
        if self.marker.exists() {
            return true;
        }

        match self.mark() {
            Ok(()) => {
                debug!(marker = ?self.marker, "First run, marker created");
                false
            }
            Err(e) => {
                warn!(?e, marker = ?self.marker, "Failed to create first run marker");
                true
            }
        }
    }

    fn mark(&self) -> io::Result<()> {
        if let Some(parent) = self.marker.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.marker, b"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_check_is_unseen_then_seen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let flag = SeenBefore::in_dir(dir.path().join("nested"));

        assert!(!flag.check_and_mark());
        assert!(flag.marker_path().exists());
        assert!(flag.check_and_mark());
    }

    #[test]
    fn unwritable_location_counts_as_seen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").expect("write");

        let flag = SeenBefore::in_dir(&blocker);

        assert!(flag.check_and_mark());
    }
}
