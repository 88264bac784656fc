use std::path::Path;

use anyhow::anyhow;
use russh_sftp::client::SftpSession;
use russh_sftp::client::error::Error as SftpError;
use russh_sftp::protocol::StatusCode;
use tracing::debug;

use crate::operations::upload;
use crate::types::{RemoteStat, SftpClientConfig, UploadedFile};

/// SFTP client for performing file operations on a remote server
pub struct SftpClient {
    pub(crate) sftp: SftpSession,
    pub(crate) config: SftpClientConfig,
}

impl std::fmt::Debug for SftpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SftpClient {
    /// Creates a new SFTP client instance (internal use)
    pub(crate) fn new(sftp: SftpSession, config: SftpClientConfig) -> Self {
        Self { sftp, config }
    }

    /// Closes the SFTP client and releases resources
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on successful close, or an error if the close operation fails
    pub async fn close(self) -> Result<(), anyhow::Error> {
        self.sftp.close().await?;
        Ok(())
    }

    /// Reads the attributes of a remote path
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` when the server reports that nothing exists at `path`
    pub async fn stat(&self, path: &str) -> Result<Option<RemoteStat>, anyhow::Error> {
        match self.sftp.metadata(path).await {
            Ok(attrs) => Ok(Some(RemoteStat {
                size: attrs.size,
                is_dir: attrs.is_dir(),
            })),
            Err(SftpError::Status(status)) if matches!(status.status_code, StatusCode::NoSuchFile) => {
                Ok(None)
            }
            Err(e) => Err(anyhow!("Failed to stat {path}: {e}")),
        }
    }

    /// Returns `true` if `path` exists and is a directory
    pub async fn is_dir(&self, path: &str) -> Result<bool, anyhow::Error> {
        Ok(self.stat(path).await?.is_some_and(|stat| stat.is_dir))
    }

    /// Creates a directory and all of its missing parents
    ///
    /// # Errors
    ///
    /// Returns an error if a component cannot be created and does not already
    /// exist as a directory
    pub async fn mkdir_recursive(&self, path: &str) -> Result<(), anyhow::Error> {
        let mut current = String::new();
        if path.starts_with('/') {
            current.push('/');
        }

        for component in path.split('/').filter(|c| !c.is_empty() && *c != ".") {
            if !current.is_empty() && !current.ends_with('/') {
                current.push('/');
            }
            current.push_str(component);

            if self.is_dir(&current).await? {
                continue;
            }
            if let Err(e) = self.sftp.create_dir(current.as_str()).await {
                // Another client may have created it in between
                if !self.is_dir(&current).await? {
                    return Err(anyhow!("Cannot create remote directory {current}: {e}"));
                }
            }
            debug!(remote_dir = %current, "Remote directory created");
        }

        Ok(())
    }

    /// Uploads a local file to the remote server
    ///
    /// # Arguments
    ///
    /// * `local_path` - Path to the local file
    /// * `remote_path` - Destination path on the remote server
    ///
    /// # Returns
    ///
    /// Returns an `UploadedFile` describing the completed transfer
    ///
    /// # Example
    ///
    /// ```ignore
    /// let uploaded = client.put(Path::new("/local/file.txt"), "/remote/file.txt").await?;
    /// ```
    pub async fn put(
        &self,
        local_path: &Path,
        remote_path: &str,
    ) -> Result<UploadedFile, anyhow::Error> {
        upload::put(self, local_path, remote_path).await
    }
}
