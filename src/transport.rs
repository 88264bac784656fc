use std::path::Path;

use crate::credential::Credential;
use crate::error::Result;
use crate::types::{RemoteStat, UploadedFile};

/// Remote file operations the upload driver relies on.
///
/// Implemented over SSH/SFTP by [`crate::SftpSessionManager`]; tests use an
/// in-memory implementation. Calls are issued one at a time, in order.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Open the connection to `host:port`
    async fn connect(&mut self, host: &str, port: u16) -> Result<()>;

    /// Authenticate once; `Ok(false)` means the server rejected the credential
    async fn login(&mut self, user: &str, credential: &Credential) -> Result<bool>;

    async fn is_dir(&mut self, path: &str) -> bool;

    /// Create `path` and any missing parents
    async fn mkdir_recursive(&mut self, path: &str) -> Result<()>;

    /// `None` when nothing exists at `path`
    async fn stat(&mut self, path: &str) -> Option<RemoteStat>;

    /// Copy the whole local file to `remote`, replacing any existing content
    async fn upload(&mut self, local: &Path, remote: &str) -> Result<UploadedFile>;
}
