pub mod add;
pub mod config;
pub mod list;
pub mod output_format;
pub mod output_types;
pub mod project;

use crate::i18n::Messages;
use std::path::PathBuf;

/// Settings shared by every command, resolved from global flags and user config.
#[derive(Debug, Clone)]
pub struct Context {
    pub messages: Messages,
    /// Package store directory
    pub store: PathBuf,
}

/// Directory a command operates on: `--project` if given, else the cwd.
pub(crate) fn project_dir(flag: Option<&PathBuf>) -> crate::error::Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir.clone()),
        None => Ok(std::env::current_dir()?),
    }
}
