use std::collections::HashSet;
use std::io::Write;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::credential::Credential;
use crate::error::{Result, UploadError};
use crate::mapping::FileMapping;
use crate::transport::Transport;
use crate::types::{Outcome, RunOptions, RunSummary, SkipReason, Tag};
use crate::utils::{has_extension, remote_parent};

/// Runs one ordered upload pass over the configured `files` entries.
///
/// Status lines are written to `out` as `TAG: message`. Only connection and
/// authentication failures (and a broken `out`) end the run early; every
/// per-entry problem becomes an [`Outcome`] and the pass continues.
pub struct Uploader<'a, T, W> {
    transport: &'a mut T,
    out: W,
    options: RunOptions,
    known_dirs: HashSet<String>,
}

impl<'a, T: Transport, W: Write> Uploader<'a, T, W> {
    pub fn new(transport: &'a mut T, out: W, options: RunOptions) -> Self {
        Self {
            transport,
            out,
            options,
            known_dirs: HashSet::new(),
        }
    }

    /// Connects, authenticates once and uploads every entry in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened, the server
    /// rejects the credential, or a status line cannot be written.
    pub async fn run(&mut self, config: &Config, credential: &Credential) -> Result<RunSummary> {
        self.transport.connect(&config.host, config.port).await?;
        if !self.transport.login(&config.user, credential).await? {
            return Err(UploadError::AuthenticationFailed {
                user: config.user.clone(),
                host: config.host.clone(),
            });
        }

        self.marker(Tag::Star, "Process start.")?;

        let mut summary = RunSummary::default();
        for raw in &config.files {
            let outcome = self.process(raw).await;
            summary.record(&outcome);
            writeln!(self.out, "{outcome}")?;
        }

        self.marker(Tag::Done, "Process done.")?;
        self.out.flush()?;

        info!(
            total = summary.total(),
            succeeded = summary.succeeded,
            failed = summary.failed,
            already_exists = summary.already_exists,
            skipped = summary.skipped,
            "Upload pass finished"
        );
        Ok(summary)
    }

    /// Handles a single raw `local:remote` entry to completion.
    pub async fn process(&mut self, raw: &str) -> Outcome {
        let Some(mapping) = FileMapping::parse(raw) else {
            return Outcome::Skipped(SkipReason::Malformed(raw.to_string()));
        };
        let local = mapping.local_display();
        let remote = mapping.remote.clone();

        if !mapping.local.exists() {
            return Outcome::Skipped(SkipReason::LocalMissing(local));
        }
        if !has_extension(&remote) {
            return Outcome::Skipped(SkipReason::InvalidRemote(remote));
        }

        let dir = remote_parent(&remote);
        if !self.ensure_dir(dir).await {
            return Outcome::Skipped(SkipReason::MkdirFailed(dir.to_string()));
        }

        if let Some(existing) = self.transport.stat(&remote).await {
            if !self.options.force {
                return Outcome::Skipped(SkipReason::AlreadyExists(remote));
            }
            debug!(remote = %remote, size = ?existing.size, "Overwriting existing remote file");
        }

        match self.transport.upload(&mapping.local, &remote).await {
            Ok(uploaded) => {
                debug!(
                    local = %uploaded.src_file,
                    remote = %uploaded.dest_file,
                    bytes = uploaded.file_size,
                    elapsed_ms = uploaded.elapsed.as_millis() as u64,
                    "Upload complete"
                );
                Outcome::Succeeded { local, remote }
            }
            Err(e) => {
                warn!(local = %local, remote = %remote, error = %e, "Upload failed");
                Outcome::Failed { local, remote }
            }
        }
    }

    async fn ensure_dir(&mut self, dir: &str) -> bool {
        if self.known_dirs.contains(dir) {
            return true;
        }
        if !self.transport.is_dir(dir).await {
            if let Err(e) = self.transport.mkdir_recursive(dir).await {
                warn!(remote_dir = %dir, error = %e, "Cannot create remote directory");
                return false;
            }
        }
        self.known_dirs.insert(dir.to_string());
        true
    }

    fn marker(&mut self, tag: Tag, message: &str) -> Result<()> {
        writeln!(self.out, "{tag}: {message}")?;
        Ok(())
    }
}
