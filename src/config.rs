use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ConfigIssue, Result, UploadError};

/// Authentication mode and the secrets it requires
#[derive(Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// Plain password login
    Password { password: String },
    /// Public key login with an OpenSSH/PEM private key on disk
    Ssl {
        private_key: PathBuf,
        passphrase: Option<String>,
    },
}

impl AuthConfig {
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::Ssl { .. } => "ssl",
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password { .. } => f
                .debug_struct("Password")
                .field("password", &"***")
                .finish(),
            Self::Ssl {
                private_key,
                passphrase,
            } => f
                .debug_struct("Ssl")
                .field("private_key", private_key)
                .field("passphrase", &passphrase.as_ref().map(|_| "***"))
                .finish(),
        }
    }
}

/// Validated upload configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub auth: AuthConfig,
    /// Raw `local:remote` mapping strings, in document order
    pub files: Vec<String>,
}

/// The configuration document as written, before validation
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    pub mode: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub private_key: Option<PathBuf>,
    pub passphrase: Option<String>,
    pub files: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Password,
    Ssl,
}

impl RawConfig {
    /// Checks the document rules in order and builds a [`Config`].
    ///
    /// Missing `host`/`port`/`user` are collected into one issue. Every other
    /// rule returns on its first failure.
    pub fn validate(self) -> std::result::Result<Config, ConfigIssue> {
        let mode = match self.mode.as_deref() {
            Some("password") => Mode::Password,
            Some("ssl") => Mode::Ssl,
            _ => return Err(ConfigIssue::InvalidMode),
        };

        let mut missing = Vec::new();
        if self.host.is_none() {
            missing.push("host");
        }
        if self.port.is_none() {
            missing.push("port");
        }
        if self.user.is_none() {
            missing.push("user");
        }
        let (Some(host), Some(port), Some(user)) = (self.host, self.port, self.user) else {
            return Err(ConfigIssue::MissingRequired(missing));
        };

        let auth = match mode {
            Mode::Password => AuthConfig::Password {
                password: self.password.ok_or(ConfigIssue::MissingPassword)?,
            },
            Mode::Ssl => {
                let private_key = self.private_key.ok_or(ConfigIssue::MissingPrivateKey)?;
                if !private_key.is_file() {
                    return Err(ConfigIssue::PrivateKeyNotFound(private_key));
                }
                AuthConfig::Ssl {
                    private_key,
                    passphrase: self.passphrase,
                }
            }
        };

        let files = match self.files {
            Some(serde_json::Value::Array(items)) if !items.is_empty() => items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(row) => Ok(row),
                    _ => Err(ConfigIssue::InvalidFileEntry),
                })
                .collect::<std::result::Result<Vec<_>, _>>()?,
            _ => return Err(ConfigIssue::NoFiles),
        };

        Ok(Config {
            host,
            port,
            user,
            auth,
            files,
        })
    }
}

/// Load and validate the upload configuration.
///
/// `.json` documents are read as JSON, anything else as YAML.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file does not exist
/// - The file cannot be read
/// - The document cannot be parsed
/// - The document fails validation
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(UploadError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    // May contain a password
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let Ok(metadata) = std::fs::metadata(path) {
            let mode = metadata.mode() & 0o777;
            if readable_by_others(mode) {
                warn!(
                    config_path = %path.display(),
                    permissions = format!("{mode:04o}"),
                    "Config file is readable by other users"
                );
            }
        }
    }

    let content = std::fs::read_to_string(path)?;
    let raw = parse_document(path, &content)?;
    let config = raw.validate()?;

    info!(
        host = %config.host,
        port = config.port,
        user = %config.user,
        mode = config.auth.mode(),
        files = config.files.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Any group or world permission bit set
#[cfg(unix)]
fn readable_by_others(mode: u32) -> bool {
    mode & 0o077 != 0
}

fn parse_document(path: &Path, content: &str) -> Result<RawConfig> {
    if content.trim().is_empty() {
        debug!(config_path = %path.display(), "Empty configuration document");
        return Ok(RawConfig::default());
    }

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(serde_saphyr::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn write_yaml(yaml: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    fn invalid(result: Result<Config>) -> ConfigIssue {
        match result {
            Err(UploadError::ConfigInvalid(issue)) => issue,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_load_password_config() {
        let file = write_yaml(
            r#"
mode: password
host: sftp.example.com
port: 2222
user: deploy
password: s3cret
files:
  - "build/app.tar.gz:/srv/releases/app.tar.gz"
  - "README.md:/srv/docs/README.md"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.host, "sftp.example.com");
        assert_eq!(config.port, 2222);
        assert_eq!(config.user, "deploy");
        assert_eq!(
            config.auth,
            AuthConfig::Password {
                password: "s3cret".to_string()
            }
        );
        assert_eq!(config.files.len(), 2);
        assert_eq!(config.files[1], "README.md:/srv/docs/README.md");
    }

    #[test]
    fn test_load_ssl_config() {
        let key = write_yaml("not really a key");
        let file = write_yaml(&format!(
            r#"
mode: ssl
host: sftp.example.com
port: 22
user: deploy
private_key: "{}"
passphrase: open sesame
files: ["a.txt:/r/a.txt"]
"#,
            key.path().display()
        ));

        let config = load_config(file.path()).unwrap();
        assert_eq!(
            config.auth,
            AuthConfig::Ssl {
                private_key: key.path().to_path_buf(),
                passphrase: Some("open sesame".to_string()),
            }
        );
    }

    #[test]
    fn test_load_json_config() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(
            br#"{"mode": "password", "host": "h", "port": 22, "user": "u",
                "password": "p", "files": ["a.txt:/r/a.txt"]}"#,
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.files, vec!["a.txt:/r/a.txt".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("/nonexistent/quick-sftp.yaml"));
        assert!(matches!(result, Err(UploadError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_yaml() {
        let file = write_yaml("mode: [password\nhost: {");
        let result = load_config(file.path());
        assert!(matches!(result, Err(UploadError::ConfigParse { .. })));
    }

    #[test]
    fn test_empty_document_reports_mode() {
        let file = write_yaml("");
        assert_eq!(invalid(load_config(file.path())), ConfigIssue::InvalidMode);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let file = write_yaml("mode: kerberos\nhost: h\nport: 22\nuser: u\n");
        assert_eq!(invalid(load_config(file.path())), ConfigIssue::InvalidMode);
    }

    #[test]
    fn test_missing_required_fields_collected() {
        let file = write_yaml("mode: password\npassword: p\nfiles: ['a.txt:/a.txt']\n");
        let issue = invalid(load_config(file.path()));
        assert_eq!(
            issue,
            ConfigIssue::MissingRequired(vec!["host", "port", "user"])
        );
        assert_eq!(
            issue.to_string(),
            r#"Config required "host", "port", "user"."#
        );
    }

    #[test]
    fn test_missing_port_only() {
        let file = write_yaml("mode: password\nhost: h\nuser: u\npassword: p\n");
        assert_eq!(
            invalid(load_config(file.path())),
            ConfigIssue::MissingRequired(vec!["port"])
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let file = write_yaml("mode: password\nhost: ~\nport: 22\nuser: u\npassword: p\n");
        assert_eq!(
            invalid(load_config(file.path())),
            ConfigIssue::MissingRequired(vec!["host"])
        );
    }

    #[test]
    fn test_password_mode_requires_password() {
        let file = write_yaml("mode: password\nhost: h\nport: 22\nuser: u\nfiles: ['a.txt:/a.txt']\n");
        assert_eq!(
            invalid(load_config(file.path())),
            ConfigIssue::MissingPassword
        );
    }

    #[test]
    fn test_ssl_mode_requires_private_key() {
        let file = write_yaml("mode: ssl\nhost: h\nport: 22\nuser: u\npassword: p\n");
        assert_eq!(
            invalid(load_config(file.path())),
            ConfigIssue::MissingPrivateKey
        );
    }

    #[test]
    fn test_ssl_mode_private_key_must_exist() {
        let file = write_yaml(
            "mode: ssl\nhost: h\nport: 22\nuser: u\nprivate_key: /nonexistent/id_ed25519\n",
        );
        let issue = invalid(load_config(file.path()));
        assert_eq!(
            issue,
            ConfigIssue::PrivateKeyNotFound(PathBuf::from("/nonexistent/id_ed25519"))
        );
        assert_eq!(issue.to_string(), "Private key file does not exist.");
    }

    #[test]
    fn test_ssl_mode_private_key_must_be_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_yaml(&format!(
            "mode: ssl\nhost: h\nport: 22\nuser: u\nprivate_key: \"{}\"\n",
            dir.path().display()
        ));
        assert!(matches!(
            invalid(load_config(file.path())),
            ConfigIssue::PrivateKeyNotFound(_)
        ));
    }

    #[test]
    fn test_files_required() {
        let file = write_yaml("mode: password\nhost: h\nport: 22\nuser: u\npassword: p\n");
        assert_eq!(invalid(load_config(file.path())), ConfigIssue::NoFiles);
    }

    #[test]
    fn test_files_empty_list_rejected() {
        let file =
            write_yaml("mode: password\nhost: h\nport: 22\nuser: u\npassword: p\nfiles: []\n");
        assert_eq!(invalid(load_config(file.path())), ConfigIssue::NoFiles);
    }

    #[test]
    fn test_files_not_a_sequence_rejected() {
        let file = write_yaml(
            "mode: password\nhost: h\nport: 22\nuser: u\npassword: p\nfiles: \"a.txt:/a.txt\"\n",
        );
        assert_eq!(invalid(load_config(file.path())), ConfigIssue::NoFiles);
    }

    #[test]
    fn test_files_entries_must_be_strings() {
        let file = write_yaml(
            "mode: password\nhost: h\nport: 22\nuser: u\npassword: p\nfiles:\n  - a.txt:/a.txt\n  - {nested: true}\n",
        );
        assert_eq!(
            invalid(load_config(file.path())),
            ConfigIssue::InvalidFileEntry
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_group_readable_mode_is_flagged() {
        assert!(readable_by_others(0o640));
        assert!(readable_by_others(0o604));
        assert!(readable_by_others(0o660));
        assert!(!readable_by_others(0o600));
        assert!(!readable_by_others(0o400));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let auth = AuthConfig::Password {
            password: "hunter2".to_string(),
        };
        assert!(!format!("{auth:?}").contains("hunter2"));
    }
}
