use crate::error::{DirectoryUploadNotRecursiveSnafu, PathNotFoundSnafu, Result};
use crate::progress::SharedMonitor;
use crate::storage::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_CONCURRENCY};
use crate::storage::utils::path::build_remote_path;
use crate::storage::utils::size::format_size;
use async_recursion::async_recursion;
use futures::stream::{self, StreamExt, TryStreamExt};
use opendal::Operator;
use snafu::ensure;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, BufReader};

/// Trait for uploading files and directories to storage.
pub trait Uploader {
    /// Upload a single file or directory from local to remote storage.
    ///
    /// The combined size of every file becomes the monitor's maximum and the
    /// monitor is completed once all files are written.
    ///
    /// # Arguments
    /// * `local_path` - Source path on local filesystem (file or directory)
    /// * `remote_path` - Destination path in storage
    /// * `recursive` - Whether to upload directories recursively
    /// * `monitor` - Receives the number of bytes written so far
    ///
    /// # Returns
    /// * `Result<u64>` - Total bytes uploaded
    async fn upload(
        &self,
        local_path: &str,
        remote_path: &str,
        recursive: bool,
        monitor: &SharedMonitor,
    ) -> Result<u64>;
}

/// A local file scheduled for upload.
#[derive(Debug)]
struct LocalFile {
    path: PathBuf,
    remote_path: String,
    size: u64,
}

/// Implementation of Uploader for OpenDAL Operator.
pub struct OpenDalUploader {
    operator: Operator,
}

impl OpenDalUploader {
    /// Create a new uploader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Upload a single file, reporting every buffer written.
    async fn upload_file_streaming(&self, file: &LocalFile, monitor: &SharedMonitor) -> Result<()> {
        let mut reader = BufReader::new(fs::File::open(&file.path).await?);
        let mut buffer = vec![0u8; DEFAULT_BUFFER_SIZE];
        let mut total_bytes = 0u64;
        let mut writer = self.operator.writer(&file.remote_path).await?;

        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            writer.write(buffer[..bytes_read].to_vec()).await?;
            // The maximum was planned from `file.size`; bytes appended since are not counted.
            let counted = (bytes_read as u64).min(file.size.saturating_sub(total_bytes));
            total_bytes += bytes_read as u64;
            monitor.advance(counted)?;
        }
        writer.close().await?;
        println!(
            "\nUploaded: {} → {} ({})",
            file.path.display(),
            file.remote_path,
            format_size(total_bytes)
        );
        Ok(())
    }
}

/// Collect every file below `dir`, mapping each to a path under `remote_base`.
#[async_recursion]
async fn collect_files(dir: &Path, remote_base: &str, files: &mut Vec<LocalFile>) -> Result<()> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let local_file_path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();
        let remote_path = build_remote_path(remote_base, &file_name);
        let meta = entry.metadata().await?;

        if meta.is_dir() {
            collect_files(&local_file_path, &remote_path, files).await?;
        } else {
            files.push(LocalFile {
                path: local_file_path,
                remote_path,
                size: meta.len(),
            });
        }
    }
    Ok(())
}

impl Uploader for OpenDalUploader {
    async fn upload(
        &self,
        local_path: &str,
        remote_path: &str,
        recursive: bool,
        monitor: &SharedMonitor,
    ) -> Result<u64> {
        let path = Path::new(local_path);
        ensure!(
            path.exists(),
            PathNotFoundSnafu {
                path: path.to_path_buf()
            }
        );

        let mut files = Vec::new();
        if path.is_dir() {
            ensure!(recursive, DirectoryUploadNotRecursiveSnafu);
            collect_files(path, remote_path, &mut files).await?;
        } else {
            let file_name = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| local_path.to_string());
            files.push(LocalFile {
                path: path.to_path_buf(),
                remote_path: build_remote_path(remote_path, &file_name),
                size: fs::metadata(path).await?.len(),
            });
        }

        let total: u64 = files.iter().map(|f| f.size).sum();
        log::debug!(
            "upload plan local_path={local_path} files={} bytes={total}",
            files.len()
        );
        if total > 0 {
            monitor.set_maximum(total)?;
        }

        stream::iter(files)
            .map(|file| async move { self.upload_file_streaming(&file, monitor).await })
            .buffer_unordered(DEFAULT_CONCURRENCY)
            .try_collect::<Vec<()>>()
            .await?;

        monitor.complete();
        Ok(total)
    }
}
