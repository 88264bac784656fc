use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that end a run with exit status 1
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Parameter \"config\" required")]
    MissingConfigArgument,

    #[error("File does not exist.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid Yaml file.")]
    ConfigParse { reason: String },

    #[error(transparent)]
    ConfigInvalid(#[from] ConfigIssue),

    #[error("Unable to load private key {}: {reason}", path.display())]
    KeyDecode { path: PathBuf, reason: String },

    #[error("Unable to connect to {host}: {reason}")]
    Connection { host: String, reason: String },

    #[error("Unable to authenticate.")]
    AuthenticationFailed { user: String, host: String },

    #[error("SFTP error: {reason}")]
    Sftp { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A configuration document that parsed but failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("Invalid config \"mode\".")]
    InvalidMode,

    #[error("Config required \"{}\".", .0.join("\", \""))]
    MissingRequired(Vec<&'static str>),

    #[error("Config \"password\" required.")]
    MissingPassword,

    #[error("Config \"private_key\" required.")]
    MissingPrivateKey,

    #[error("Private key file does not exist.")]
    PrivateKeyNotFound(PathBuf),

    #[error("No file to upload..")]
    NoFiles,

    #[error("Config \"files\" must be a list of strings.")]
    InvalidFileEntry,
}

impl UploadError {
    /// Name of the configuration field this error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::ConfigInvalid(issue) => issue.field(),
            _ => None,
        }
    }
}

impl ConfigIssue {
    /// First field the issue names
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidMode => Some("mode"),
            Self::MissingRequired(fields) => fields.first().copied(),
            Self::MissingPassword => Some("password"),
            Self::MissingPrivateKey | Self::PrivateKeyNotFound(_) => Some("private_key"),
            Self::NoFiles | Self::InvalidFileEntry => Some("files"),
        }
    }
}

impl From<serde_saphyr::Error> for UploadError {
    fn from(err: serde_saphyr::Error) -> Self {
        Self::ConfigParse {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for UploadError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse {
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
