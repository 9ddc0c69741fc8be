use clap::Args;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "cli")]
pub mod cli;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, Args)]
pub struct ConditionalConfig {
    #[cfg(feature = "cli")]
    /// Config for the CLI
    #[validate(nested)]
    #[clap(flatten)]
    pub cli: cli::CliConfig,
}
