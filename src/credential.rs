use std::sync::Arc;

use russh::keys::{PrivateKey, decode_secret_key};
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::{Result, UploadError};
use crate::utils::sanitize_ssh_error;

/// Secret presented to the server during login
#[derive(Clone)]
pub enum Credential {
    Password(String),
    /// Decoded private key; any passphrase has already been applied
    Key(Arc<PrivateKey>),
}

impl Credential {
    /// Derive the login secret from a validated [`AuthConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key file cannot be read or decoded with the
    /// configured passphrase.
    pub fn resolve(auth: &AuthConfig) -> Result<Self> {
        match auth {
            AuthConfig::Password { password } => Ok(Self::Password(password.clone())),
            AuthConfig::Ssl {
                private_key,
                passphrase,
            } => {
                let material = std::fs::read_to_string(private_key)?;
                let key = decode_secret_key(&material, passphrase.as_deref()).map_err(|e| {
                    UploadError::KeyDecode {
                        path: private_key.clone(),
                        reason: sanitize_ssh_error(&e),
                    }
                })?;
                debug!(
                    private_key = %private_key.display(),
                    algorithm = %key.algorithm(),
                    "Private key loaded"
                );
                Ok(Self::Key(Arc::new(key)))
            }
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Credential::Password(***)"),
            Self::Key(key) => write!(f, "Credential::Key({})", key.algorithm()),
        }
    }
}
