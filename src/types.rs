use std::fmt;
use std::time::Duration;

/// Status tag at the start of every console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Star,
    Warn,
    Erro,
    Exis,
    Fail,
    Succ,
    Done,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Star => "STAR",
            Self::Warn => "WARN",
            Self::Erro => "ERRO",
            Self::Exis => "EXIS",
            Self::Fail => "FAIL",
            Self::Succ => "SUCC",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an entry was not uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The raw entry has no usable `:` separator
    Malformed(String),
    /// The local file does not exist
    LocalMissing(String),
    /// The remote path has no file extension
    InvalidRemote(String),
    /// The remote parent directory could not be created
    MkdirFailed(String),
    /// The remote file exists and `--force` is not set
    AlreadyExists(String),
}

/// Result of handling one `files` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    Failed { local: String, remote: String },
    Succeeded { local: String, remote: String },
}

impl Outcome {
    pub fn tag(&self) -> Tag {
        match self {
            Self::Skipped(SkipReason::Malformed(_) | SkipReason::MkdirFailed(_)) => Tag::Warn,
            Self::Skipped(SkipReason::LocalMissing(_) | SkipReason::InvalidRemote(_)) => Tag::Erro,
            Self::Skipped(SkipReason::AlreadyExists(_)) => Tag::Exis,
            Self::Failed { .. } => Tag::Fail,
            Self::Succeeded { .. } => Tag::Succ,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        match self {
            Self::Skipped(
                SkipReason::Malformed(detail)
                | SkipReason::LocalMissing(detail)
                | SkipReason::InvalidRemote(detail)
                | SkipReason::MkdirFailed(detail)
                | SkipReason::AlreadyExists(detail),
            ) => write!(f, "{tag}: {detail}"),
            Self::Failed { local, remote } | Self::Succeeded { local, remote } => {
                write!(f, "{tag}: {local} -> {remote}")
            }
        }
    }
}

/// Options fixed for the whole run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Overwrite remote files that already exist
    pub force: bool,
}

/// Per-run outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub already_exists: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Succeeded { .. } => self.succeeded += 1,
            Outcome::Failed { .. } => self.failed += 1,
            Outcome::Skipped(SkipReason::AlreadyExists(_)) => self.already_exists += 1,
            Outcome::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.already_exists + self.skipped
    }
}

/// Configuration for SFTP client operations
#[derive(Debug, Clone)]
pub struct SftpClientConfig {
    /// Buffer size for read/write operations in bytes
    pub io_size: usize,
}

impl Default for SftpClientConfig {
    /// io_size: 65536 (64KB)
    fn default() -> Self {
        Self { io_size: 65536 }
    }
}

impl SftpClientConfig {
    pub fn new(io_size: usize) -> Self {
        Self { io_size }
    }
}

/// Remote entry attributes returned by a stat call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteStat {
    pub size: Option<u64>,
    pub is_dir: bool,
}

/// A completed whole-file upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Source file path
    pub src_file: String,
    /// Destination file path
    pub dest_file: String,
    /// Bytes written to the remote file
    pub file_size: u64,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_lines() {
        let cases = [
            (
                Outcome::Skipped(SkipReason::Malformed("no-colon-here".into())),
                "WARN: no-colon-here",
            ),
            (
                Outcome::Skipped(SkipReason::LocalMissing("missing.txt".into())),
                "ERRO: missing.txt",
            ),
            (
                Outcome::Skipped(SkipReason::InvalidRemote("/remote/dir".into())),
                "ERRO: /remote/dir",
            ),
            (
                Outcome::Skipped(SkipReason::MkdirFailed("/locked".into())),
                "WARN: /locked",
            ),
            (
                Outcome::Skipped(SkipReason::AlreadyExists("/r/a.txt".into())),
                "EXIS: /r/a.txt",
            ),
            (
                Outcome::Failed {
                    local: "a.txt".into(),
                    remote: "/r/a.txt".into(),
                },
                "FAIL: a.txt -> /r/a.txt",
            ),
            (
                Outcome::Succeeded {
                    local: "a.txt".into(),
                    remote: "/r/a.txt".into(),
                },
                "SUCC: a.txt -> /r/a.txt",
            ),
        ];
        for (outcome, line) in cases {
            assert_eq!(outcome.to_string(), line);
        }
    }

    #[test]
    fn summary_counts() {
        let mut summary = RunSummary::default();
        summary.record(&Outcome::Succeeded {
            local: "a".into(),
            remote: "b.txt".into(),
        });
        summary.record(&Outcome::Skipped(SkipReason::AlreadyExists("b.txt".into())));
        summary.record(&Outcome::Skipped(SkipReason::Malformed("x".into())));
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.already_exists, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 3);
    }
}
