use std::env;

use tracing::Level;
pub use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "TIKFETCH_LOG_LEVEL";

pub const COMPONENT_LEVELS: &[(&str, Level)] = &[
    ("tikfetch_cli", Level::INFO),
    ("app_actions", Level::INFO),
    ("app_config", Level::INFO),
    ("app_helpers", Level::INFO),
    ("app_logger", Level::INFO),
];

/// Initialize the logger
///
/// # Panics
/// Panics if the logger fails to initialize
pub fn init() {
    init_with(COMPONENT_LEVELS.to_vec());
}

/// Maps a `-v` count to the level applied to every app component.
///
/// `0` keeps the defaults from [`COMPONENT_LEVELS`].
#[must_use]
pub const fn level_for_verbosity(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

pub fn init_with_verbosity(verbosity: u8) {
    match level_for_verbosity(verbosity) {
        Some(level) => init_with_app_level(level),
        None => init(),
    }
}

pub fn init_with_app_level(level: Level) {
    let levels = COMPONENT_LEVELS
        .iter()
        .map(|(k, _v)| (k.to_owned(), level))
        .collect::<Vec<_>>();

    init_with(levels);
}

pub fn init_with<T>(levels: T)
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    let mut base_level = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .parse_lossy(default_directives(levels));

    for d in env_directives(&env::var(LOG_LEVEL_ENV).unwrap_or_default()) {
        base_level = base_level.add_directive(d);
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(base_level)
        .try_init()
        .expect("setting default subscriber failed");
}

fn default_directives<T>(levels: T) -> String
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    levels
        .into_iter()
        .map(|(k, v)| {
            if k.is_empty() {
                v.to_string()
            } else {
                format!("{}={}", k, v)
            }
        })
        .fold(String::new(), |acc, a| format!("{},{}", acc, a))
}

fn env_directives(raw: &str) -> Vec<Directive> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("Failed to parse log level directive {s:?}: {e:?}");
                None
            }
        })
        .collect()
}
