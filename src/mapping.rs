use std::path::PathBuf;

/// One parsed `local:remote` entry from the `files` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    pub local: PathBuf,
    pub remote: String,
}

impl FileMapping {
    /// Splits a raw entry on its first `:`.
    ///
    /// Returns `None` when there is no separator, or when the entry starts
    /// with one and so names no local file. The local side is trimmed; the
    /// remote side is trimmed and loses any trailing `/`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (local, remote) = raw.split_once(':')?;
        if local.is_empty() {
            return None;
        }
        Some(Self {
            local: PathBuf::from(local.trim()),
            remote: remote.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn local_display(&self) -> String {
        self.local.display().to_string()
    }
}
