// Module declarations
pub mod cli;
mod client;
pub mod config;
pub mod credential;
pub mod driver;
pub mod error;
pub mod mapping;
mod operations;
mod session;
pub mod transport;
mod types;
pub mod utils;

use std::io::Write;
use std::path::Path;

use tracing::debug;

// Public API exports
pub use client::SftpClient;
pub use config::{AuthConfig, Config, load_config};
pub use credential::Credential;
pub use driver::Uploader;
pub use error::{ConfigIssue, Result, UploadError};
pub use session::SftpSessionManager;
pub use transport::Transport;
pub use types::{
    Outcome, RemoteStat, RunOptions, RunSummary, SftpClientConfig, SkipReason, Tag, UploadedFile,
};

/// Loads the configuration at `config_path`, resolves the credential and
/// uploads every configured file through `transport`.
///
/// Nothing is sent to `transport` until the configuration has validated and
/// the credential has been resolved.
///
/// # Errors
///
/// Returns an error for any configuration, credential, connection or
/// authentication failure. Per-file failures are reported on `out` instead.
pub async fn run<T, W>(
    config_path: &Path,
    options: RunOptions,
    transport: &mut T,
    out: W,
) -> Result<RunSummary>
where
    T: Transport,
    W: Write,
{
    let config = load_config(config_path)?;
    let credential = Credential::resolve(&config.auth)?;
    debug!(?credential, force = options.force, "Starting upload pass");

    Uploader::new(transport, out, options)
        .run(&config, &credential)
        .await
}
