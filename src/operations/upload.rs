use std::path::Path;
use std::time::Instant;

use anyhow::anyhow;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, error, info};

use crate::client::SftpClient;
use crate::types::UploadedFile;

/// Opens the upload source and returns it with its size.
///
/// Fails for anything but a regular file, before the remote side is touched.
pub(crate) async fn open_local_source(local_path: &Path) -> Result<(fs::File, u64), anyhow::Error> {
    let local_file = fs::File::open(local_path).await?;
    let metadata = local_file.metadata().await?;
    if !metadata.is_file() {
        return Err(anyhow!("Local path is not a regular file: {}", local_path.display()));
    }
    Ok((local_file, metadata.len()))
}

/// Uploads a local file to the remote server
///
/// The remote file is created, or truncated if it already exists, and the
/// local file is streamed into it in `io_size` chunks. The remote handle is
/// closed before returning so the server has committed the data.
///
/// # Errors
///
/// Returns an error if:
/// - The local path is not a regular file, or cannot be opened or read
/// - The remote file cannot be created or written to
/// - The remote handle cannot be closed
pub async fn put(
    client: &SftpClient,
    local_path: &Path,
    remote_path: &str,
) -> Result<UploadedFile, anyhow::Error> {
    let upload_time = Instant::now();
    let (mut local_file, local_file_size) = open_local_source(local_path).await?;
    debug!("Local file opened: {:?} ({} bytes)", local_path, local_file_size);

    let mut remote_file = client.sftp.create(remote_path).await.map_err(|err| {
        error!("Failed to open file: {:?} ERROR: {:?}", remote_path, err);
        anyhow!("SFTP error: {err}")
    })?;
    debug!("Remote file created path: {:?}", remote_path);

    let mut buffer = vec![0; client.config.io_size];
    let mut bytes_written: u64 = 0;
    loop {
        let bytes_read = match local_file.read(&mut buffer[..]).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("Error reading local file: {:?}", e);
                return Err(anyhow!("Failed to read from local file: {e}"));
            }
        };
        remote_file
            .write_all(&buffer[..bytes_read])
            .await
            .map_err(|e| anyhow!("SFTP write error: {e}"))?;
        bytes_written += bytes_read as u64;
    }

    remote_file
        .shutdown()
        .await
        .map_err(|e| anyhow!("Failed to close remote file: {e}"))?;

    let elapsed = upload_time.elapsed();
    info!(
        "File {:?} uploaded. Time taken {:?}",
        local_path, elapsed,
    );

    Ok(UploadedFile {
        src_file: local_path.display().to_string(),
        dest_file: remote_path.to_string(),
        file_size: bytes_written,
        elapsed,
    })
}
