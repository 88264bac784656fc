use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use quick_sftp::cli::Cli;
use quick_sftp::{SftpClientConfig, SftpSessionManager, UploadError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the status lines
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match upload(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, field = ?e.field(), "Run aborted");
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn upload(cli: &Cli) -> Result<(), UploadError> {
    let config_path = cli.config_path()?;
    let mut session = SftpSessionManager::new(SftpClientConfig::default());

    let result = quick_sftp::run(
        &config_path,
        cli.run_options(),
        &mut session,
        std::io::stdout(),
    )
    .await;

    if let Err(e) = session.close().await {
        warn!(error = %e, "Session did not close cleanly");
    }
    result.map(|_| ())
}
