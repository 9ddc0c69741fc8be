use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{ArgAction, Args, CommandFactory, ValueEnum, ValueHint};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

use crate::cli::CliArgs;

/// Programs tried, in order, when no URL opener is configured.
pub const URL_OPENER_CANDIDATES: &[&str] = &["xdg-open", "open"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("Program paths"))]
pub struct ProgramPathConfig {
    /// Path to the program used to open URLs in a browser.
    ///
    /// If not provided, xdg-open and then open will be searched for in $PATH.
    /// Without one, links that can't be saved are only printed.
    #[arg(long, default_value = None, env = "TIKFETCH_URL_OPENER", value_hint = ValueHint::FilePath, value_parser = validate_valid_path())]
    #[validate(custom(function = "valid_path"))]
    url_opener_path: Option<PathBuf>,
}
impl ProgramPathConfig {
    #[must_use]
    pub fn url_opener_path(&self) -> Option<&Path> {
        self.url_opener_path.as_deref()
    }

    #[must_use]
    pub fn resolve_paths(mut self) -> Self {
        self.with_resolved_paths();
        self
    }

    pub fn with_resolved_paths(&mut self) -> &Self {
        self.url_opener_path = self.url_opener_path.clone().or_else(|| {
            URL_OPENER_CANDIDATES
                .iter()
                .find_map(|x| which::which(x).ok())
        });

        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("External endpoints/APIs"))]
pub struct EndpointConfig {
    /// How long a single metadata endpoint may take before the next one is tried.
    ///
    /// In milliseconds.
    #[arg(long, default_value_t = 8_000, env = "TIKFETCH_ENDPOINT_TIMEOUT_MS")]
    #[validate(range(min = 1_000, max = 60_000))]
    pub endpoint_timeout_ms: u64,

    /// The base URL of the helper service used when metadata has no source for the requested kind.
    #[arg(long, default_value = "https://ssstik.io/abc", env = "TIKFETCH_ENDPOINT_HELPER_SERVICE", value_hint = ValueHint::Url, value_parser = validate_absolute_url())]
    #[validate(custom(function = "absolute_url"))]
    pub helper_service_base_url: String,

    /// Names of metadata endpoints to skip (eg. tikwm).
    #[arg(long = "disable-endpoint", env = "TIKFETCH_ENDPOINT_DISABLED", value_delimiter = ',')]
    pub disabled_endpoints: Vec<String>,
}
impl EndpointConfig {
    #[must_use]
    pub const fn endpoint_timeout(&self) -> Duration {
        Duration::from_millis(self.endpoint_timeout_ms)
    }

    #[must_use]
    pub fn is_endpoint_enabled(&self, name: &str) -> bool {
        !self
            .disabled_endpoints
            .iter()
            .any(|x| x.eq_ignore_ascii_case(name))
    }
}
impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            endpoint_timeout_ms: 8_000,
            helper_service_base_url: "https://ssstik.io/abc".to_string(),
            disabled_endpoints: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ValueEnum)]
pub enum DumpConfigType {
    Json,
    Toml,
}
#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[allow(clippy::option_option)]
#[clap(next_help_heading = Some("Run options"))]
pub struct RunConfig {
    /// Dump the config to stdout
    #[arg(long, value_enum, default_value = None)]
    pub dump_config: Option<Option<DumpConfigType>>,

    /// Dump shell completions to stdout
    #[arg(long, default_value = None, value_name = "SHELL", value_parser = hacky_dump_completions())]
    #[serde(skip)]
    pub dump_completions: Option<Shell>,

    /// Log more. Can be repeated (-vv) for trace output.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,
}

#[must_use]
pub fn validate_valid_path() -> impl clap::builder::TypedValueParser {
    move |s: &str| {
        let path = Path::new(s);
        if !path.exists() {
            return Err("File does not exist");
        }

        Ok(path.to_path_buf())
    }
}

pub fn valid_path(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::new("File does not exist"));
    }

    if !path.is_file() {
        return Err(ValidationError::new("Path is not a valid file"));
    }

    Ok(())
}

#[must_use]
pub fn validate_absolute_url() -> impl clap::builder::TypedValueParser {
    move |s: &str| {
        let parsed = match Url::parse(s) {
            Ok(parsed) => parsed,
            Err(e) => return Err(format!("URL must be absolute: {e}")),
        };

        if parsed.cannot_be_a_base() {
            return Err("URL must be absolute".to_string());
        }

        Ok(s.trim_end_matches('/').to_string())
    }
}

#[must_use]
pub fn hacky_dump_completions() -> impl clap::builder::TypedValueParser {
    move |s: &str| {
        let parsed = Shell::from_str(s, true);

        if let Ok(shell) = &parsed {
            let bin_name = if cfg!(feature = "cli") {
                "tikfetch-cli"
            } else {
                return Err(ValidationError::new("Unknown application name"));
            };

            clap_complete::generate(
                *shell,
                &mut CliArgs::command(),
                bin_name,
                &mut std::io::stdout(),
            );
            std::process::exit(0);
        }

        parsed
            .map(|_| ())
            .map_err(|_| ValidationError::new("Invalid shell"))
    }
}

pub fn absolute_url<'a, T>(url: T) -> Result<(), ValidationError>
where
    T: Into<Cow<'a, str>>,
{
    let parsed =
        Url::parse(url.into().as_ref()).map_err(|_| ValidationError::new("Invalid URL"))?;

    if parsed.cannot_be_a_base() {
        return Err(ValidationError::new("URL must be absolute"));
    }

    Ok(())
}
