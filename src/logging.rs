//! Log setup
//!
//! The terminal belongs to the game while it runs, so logs only go to a file.
//! Without `--log-file` no subscriber is installed and `tracing` calls are no-ops.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;

/// Install a file-backed subscriber filtered by `RUST_LOG` (default `info`)
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_log_file_is_a_no_op() {
        assert!(init_logging(None).is_ok());
    }

    #[test]
    fn test_unopenable_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("snake.log");
        assert!(init_logging(Some(&path)).is_err());
    }
}
