//! File-backed logger setup.
//!
//! The terminal belongs to the renderer, so log records go to a file under
//! the state directory. `RFC_UI_LOG` takes an `env_logger` filter spec.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Context;
use env_logger::{Builder, Env, Target};

pub const LOG_ENV: &str = "RFC_UI_LOG";

/// Install the global logger writing to `path`, or discarding output when
/// `path` is `None`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(path: Option<&Path>) -> anyhow::Result<()> {
    let target = match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Target::Pipe(Box::new(file))
        }
        None => Target::Pipe(Box::new(std::io::sink())),
    };

    // A second init (tests, re-entry) keeps the first logger.
    let _ = Builder::from_env(Env::default().filter_or(LOG_ENV, "info"))
        .target(target)
        .format_timestamp_millis()
        .try_init();
    Ok(())
}
