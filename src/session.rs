use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use russh::client::{self, Handle, Handler};
use russh::keys::key::PrivateKeyWithHashAlg;
use russh::keys::{HashAlg, PublicKey};
use russh_sftp::client::SftpSession;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::client::SftpClient;
use crate::credential::Credential;
use crate::error::{Result, UploadError};
use crate::transport::Transport;
use crate::types::{RemoteStat, SftpClientConfig, UploadedFile};
use crate::utils::sanitize_ssh_error;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// russh event handler for the upload connection
pub struct ClientHandler {
    host: String,
}

impl Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        // Host keys are not pinned
        info!(
            host = %self.host,
            fingerprint = %server_public_key.fingerprint(HashAlg::Sha256),
            "Accepting server host key"
        );
        Ok(true)
    }
}

/// Manager for the SSH session and the SFTP client opened on it
pub struct SftpSessionManager {
    config: SftpClientConfig,
    host: String,
    handle: Option<Handle<ClientHandler>>,
    client: Option<SftpClient>,
}

impl std::fmt::Debug for SftpSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpSessionManager")
            .field("host", &self.host)
            .field("connected", &self.handle.is_some())
            .field("client", &self.client)
            .finish()
    }
}

impl SftpSessionManager {
    pub fn new(config: SftpClientConfig) -> Self {
        Self {
            config,
            host: String::new(),
            handle: None,
            client: None,
        }
    }

    /// Authenticates on the connected session and opens the SFTP subsystem
    ///
    /// # Returns
    ///
    /// Returns `Ok(false)` if the server rejected the credential
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is not connected
    /// - The authentication exchange itself fails
    /// - The SFTP subsystem cannot be initialized
    async fn authenticate(&mut self, user: &str, credential: &Credential) -> Result<bool> {
        let host = self.host.clone();
        let handle = self.handle.as_mut().ok_or_else(|| UploadError::Connection {
            host: host.clone(),
            reason: "SSH session not connected".to_string(),
        })?;

        let auth_result = match credential {
            Credential::Password(password) => {
                handle
                    .authenticate_password(user, password.as_str())
                    .await
            }
            Credential::Key(key) => {
                let hash_alg = handle
                    .best_supported_rsa_hash()
                    .await
                    .ok()
                    .flatten()
                    .flatten();
                handle
                    .authenticate_publickey(user, PrivateKeyWithHashAlg::new(key.clone(), hash_alg))
                    .await
            }
        };

        let method = match credential {
            Credential::Password(_) => "password",
            Credential::Key(_) => "key",
        };
        let auth_result = auth_result.map_err(|e| {
            error!(host = %host, user = %user, method, error = %sanitize_ssh_error(&e), "SSH authentication error");
            UploadError::AuthenticationFailed {
                user: user.to_string(),
                host: host.clone(),
            }
        })?;

        if !auth_result.success() {
            warn!(host = %host, user = %user, method, "SSH authentication rejected");
            return Ok(false);
        }
        info!(host = %host, user = %user, method, "Authenticated");

        self.client = Some(self.create_sftp_client().await?);
        Ok(true)
    }

    /// Creates a new SFTP client from the managed SSH session
    ///
    /// # Errors
    ///
    /// Returns an error if a session channel cannot be opened or the SFTP
    /// subsystem cannot be initialized
    async fn create_sftp_client(&self) -> Result<SftpClient> {
        debug!("Creating sftp client from session");
        let handle = self.handle.as_ref().ok_or_else(|| UploadError::Sftp {
            reason: "SSH session not connected".to_string(),
        })?;

        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| UploadError::Sftp {
                reason: format!("Failed to open channel: {e}"),
            })?;
        channel
            .request_subsystem(true, "sftp")
            .await
            .map_err(|e| UploadError::Sftp {
                reason: format!("Failed to request SFTP subsystem: {e}"),
            })?;
        let sftp = SftpSession::new(channel.into_stream())
            .await
            .map_err(|e| UploadError::Sftp {
                reason: format!("Failed to initialize SFTP session: {e}"),
            })?;

        debug!("sftp client created successfully");
        Ok(SftpClient::new(sftp, self.config.clone()))
    }

    fn client(&self) -> Result<&SftpClient> {
        self.client.as_ref().ok_or_else(|| UploadError::Sftp {
            reason: "sftp client not initialized".to_string(),
        })
    }

    /// Closes the SFTP client and disconnects the SSH session
    ///
    /// # Errors
    ///
    /// Returns an error if the SFTP channel or the SSH session cannot be
    /// closed cleanly
    pub async fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.close().await.map_err(|e| UploadError::Sftp {
                reason: format!("{e:#}"),
            })?;
        }
        if let Some(handle) = self.handle.take() {
            handle
                .disconnect(russh::Disconnect::ByApplication, "", "en")
                .await
                .map_err(|e| UploadError::Connection {
                    host: self.host.clone(),
                    reason: e.to_string(),
                })?;
            info!(host = %self.host, "Session closed");
        }
        Ok(())
    }
}

impl Transport for SftpSessionManager {
    async fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        self.host = format!("{host}:{port}");
        info!("Connecting to {:?}", self.host);

        let config = Arc::new(client::Config::default());
        let handler = ClientHandler {
            host: self.host.clone(),
        };
        let handle = timeout(CONNECT_TIMEOUT, client::connect(config, (host, port), handler))
            .await
            .map_err(|_| {
                error!(host = %self.host, timeout_secs = CONNECT_TIMEOUT.as_secs(), "SSH connection timeout");
                UploadError::Connection {
                    host: self.host.clone(),
                    reason: format!("Connection timeout after {}s", CONNECT_TIMEOUT.as_secs()),
                }
            })?
            .map_err(|e| {
                error!(host = %self.host, error = %e, "SSH connection failed");
                UploadError::Connection {
                    host: self.host.clone(),
                    reason: e.to_string(),
                }
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    async fn login(&mut self, user: &str, credential: &Credential) -> Result<bool> {
        self.authenticate(user, credential).await
    }

    async fn is_dir(&mut self, path: &str) -> bool {
        let Ok(client) = self.client() else {
            return false;
        };
        client.is_dir(path).await.unwrap_or_else(|e| {
            debug!(remote_dir = %path, error = %e, "is_dir check failed");
            false
        })
    }

    async fn mkdir_recursive(&mut self, path: &str) -> Result<()> {
        self.client()?
            .mkdir_recursive(path)
            .await
            .map_err(|e| UploadError::Sftp {
                reason: format!("{e:#}"),
            })
    }

    async fn stat(&mut self, path: &str) -> Option<RemoteStat> {
        let client = self.client().ok()?;
        client.stat(path).await.unwrap_or_else(|e| {
            debug!(remote = %path, error = %e, "stat failed");
            None
        })
    }

    async fn upload(&mut self, local: &Path, remote: &str) -> Result<UploadedFile> {
        self.client()?
            .put(local, remote)
            .await
            .map_err(|e| UploadError::Sftp {
                reason: format!("{e:#}"),
            })
    }
}
