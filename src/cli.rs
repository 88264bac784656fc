use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, UploadError};
use crate::types::RunOptions;

/// Upload the files listed in a configuration document over SFTP
#[derive(Parser, Debug)]
#[command(name = "quick-sftp", version, about)]
pub struct Cli {
    /// Overwrite remote files that already exist
    #[arg(long)]
    pub force: bool,

    /// Path to the YAML (or .json) configuration document
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "")]
    pub config: Option<String>,
}

impl Cli {
    /// The `--config` path; missing and empty values are both rejected.
    pub fn config_path(&self) -> Result<PathBuf> {
        match self.config.as_deref() {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Err(UploadError::MissingConfigArgument),
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions { force: self.force }
    }
}
