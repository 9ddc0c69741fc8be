use std::time;

/// Milliseconds since the unix epoch.
///
/// A clock set before 1970 yields `0` instead of failing.
#[must_use]
pub fn epoch_millis() -> u128 {
    time::SystemTime::now()
        .duration_since(time::UNIX_EPOCH)
        .map(|x| x.as_millis())
        .unwrap_or_default()
}
