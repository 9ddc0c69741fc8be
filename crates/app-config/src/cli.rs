use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

use crate::{common, conditional};

/// Resolve TikTok links through a list of fallback APIs,
/// preview the result and save the video or audio track.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[clap(disable_help_flag = true)]
pub struct CliArgs {
    /// Print help
    #[clap(action = ArgAction::Help, long)]
    help: Option<bool>,

    #[command(flatten)]
    pub dependency_path: common::ProgramPathConfig,

    #[command(flatten)]
    pub endpoint: common::EndpointConfig,

    #[command(flatten)]
    pub run: common::RunConfig,

    #[command(flatten)]
    pub conditional: conditional::ConditionalConfig,
}
