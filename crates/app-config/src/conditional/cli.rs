use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum, ValueHint};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = "Cli options")]
#[allow(clippy::struct_excessive_bools)]
pub struct CliConfig {
    #[clap(flatten)]
    #[serde(skip)]
    pub entries_group: LinkGroup,

    /// Directory to save files to
    ///
    /// Will error if it is not a valid path.
    #[clap(short = 'd', long, default_value = ".", value_hint = ValueHint::DirPath, value_parser = validate_valid_resolved_directory())]
    #[validate(custom(function = "valid_directory"))]
    pub output_directory: PathBuf,

    /// Which media to save for each link
    #[clap(short = 'k', long, value_enum, default_value_t = KindSelection::Video)]
    pub kind: KindSelection,

    /// Only resolve and print a preview of each link. Nothing gets saved.
    #[clap(long)]
    pub preview_only: bool,

    /// When every endpoint fails, show placeholder preview data instead of failing the link.
    #[clap(long)]
    pub placeholder_on_failure: bool,

    /// Open the alternative web downloaders for each link and exit.
    #[clap(long)]
    pub alternatives: bool,
}

#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
#[group(required = true, multiple = true)]
pub struct LinkGroup {
    /// Links to resolve.
    ///
    /// Has the same behaviour as specifying the link as a raw argument.
    #[clap(short = 'u', long = "url")]
    pub urls: Vec<String>,

    /// Link to resolve
    ///
    /// Multiple links can be specified.
    /// Links that don't look like a supported video link are reported and skipped.
    #[clap(id = "LINK", value_hint = ValueHint::Url)]
    pub links: Vec<String>,
}
impl LinkGroup {
    /// All links, explicit `--url` ones first, in the order given.
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        self.urls
            .iter()
            .chain(self.links.iter())
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KindSelection {
    #[default]
    Video,
    Audio,
    Both,
}
impl KindSelection {
    #[must_use]
    pub const fn wants_video(self) -> bool {
        matches!(self, Self::Video | Self::Both)
    }

    #[must_use]
    pub const fn wants_audio(self) -> bool {
        matches!(self, Self::Audio | Self::Both)
    }
}

#[must_use]
pub fn validate_valid_resolved_directory() -> impl clap::builder::TypedValueParser {
    move |s: &str| {
        let path = Path::new(s);

        if !path.exists() {
            return Err("File does not exist");
        }

        if !path.is_dir() {
            return Err("Path is not a directory");
        }

        let path = path
            .to_path_buf()
            .canonicalize()
            .map_err(|_| "Failed to canonicalize path")?;

        Ok(path)
    }
}

pub fn valid_directory(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::new("Directory does not exist"));
    }

    if !path.is_dir() {
        return Err(ValidationError::new("Path is not a directory"));
    }

    Ok(())
}
