use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::{fs::File, io::AsyncWriteExt, process::Command};
use tracing::{debug, info, trace};
use url::Url;

use crate::{
    common::request::{Client, RequestClient},
    dispatchers::{SaveError, SaveMechanism},
};

/// Saves into a directory, opens through the system url opener
/// and falls back to printing the url on stdout.
#[derive(Debug, Clone)]
pub struct LocalSaveMechanism {
    output_dir: PathBuf,
    url_opener: Option<PathBuf>,
    client: RequestClient,
}
impl LocalSaveMechanism {
    pub fn new<T>(output_dir: T, url_opener: Option<PathBuf>) -> Result<Self, reqwest::Error>
    where
        T: Into<PathBuf>,
    {
        Ok(Self {
            output_dir: output_dir.into(),
            url_opener,
            client: Client::base()?,
        })
    }

    async fn write_to(&self, url: &Url, file_path: &Path) -> Result<(), SaveError> {
        let mut res = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| SaveError::Request(format!("Failed to send request: {e:?}")))?
            .error_for_status()
            .map_err(|e| SaveError::Request(format!("Failed to get response: {e:?}")))?;
        trace!(?res, "Got response");

        let mut out_file = File::create(file_path).await?;

        while let Some(chunk) = res
            .chunk()
            .await
            .map_err(|e| SaveError::Request(format!("Failed to get chunk: {e:?}")))?
        {
            out_file.write_all(&chunk).await?;
        }

        out_file.flush().await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl SaveMechanism for LocalSaveMechanism {
    async fn save_file(&self, url: &Url, filename: &str) -> Result<PathBuf, SaveError> {
        let file_path = self.output_dir.join(filename);
        info!(%url, ?file_path, "Saving file");

        if let Err(e) = self.write_to(url, &file_path).await {
            if tokio::fs::remove_file(&file_path).await.is_ok() {
                debug!(?file_path, "Removed partial file");
            }

            return Err(e);
        }

        Ok(file_path)
    }

    async fn open_in_new_context(&self, url: &Url) -> Result<(), SaveError> {
        let opener = self.url_opener.as_ref().ok_or(SaveError::NoOpener)?;
        debug!(?opener, %url, "Opening url");

        let status = Command::new(opener)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| SaveError::Opener(format!("Failed to run {opener:?}: {e}")))?;

        if !status.success() {
            return Err(SaveError::Opener(format!(
                "{opener:?} exited with {status}"
            )));
        }

        Ok(())
    }

    async fn navigate(&self, url: &Url) -> Result<(), SaveError> {
        println!("{url}");

        Ok(())
    }
}
