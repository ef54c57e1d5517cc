//! File logging.
//!
//! The terminal is owned by the UI, so log records go to a file in the
//! platform data directory instead of stderr. Filtering follows `RUST_LOG`
//! and defaults to `warn`.

use std::fs::{self, File};
use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use env_logger::{Env, Target};

/// Name of the log file.
const LOG_FILE: &str = "stardrift.log";

/// Install the global logger. Returns the log file path, or `None` when no
/// data directory is available (logging is then disabled).
pub fn init() -> Result<Option<PathBuf>> {
    let Some(dirs) = ProjectDirs::from("", "", "stardrift") else {
        return Ok(None);
    };
    let dir = dirs.data_local_dir();
    fs::create_dir_all(dir).wrap_err_with(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(LOG_FILE);
    let file =
        File::create(&path).wrap_err_with(|| format!("failed to create {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .wrap_err("failed to install logger")?;
    Ok(Some(path))
}
