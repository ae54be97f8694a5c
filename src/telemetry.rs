use std::{fs::OpenOptions, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GIM_VIEWER_LOG";

/// Routes `tracing` output to `log_file`. Without one nothing is installed:
/// the dashboard owns the terminal and stray log lines would corrupt it.
///
/// Returns `Ok(false)` when a global subscriber was already set.
pub fn init(log_file: Option<&Path>) -> Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {} failed", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_log_file_installs_nothing() {
        assert!(!init(None).expect("no-op init"));
    }

    #[test]
    fn unwritable_log_path_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("viewer.log");
        assert!(init(Some(&path)).is_err());
    }
}
