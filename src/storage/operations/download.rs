use crate::error::{PathNotFoundSnafu, Result};
use crate::progress::SharedMonitor;
use crate::storage::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_CONCURRENCY};
use crate::storage::utils::path::{ensure_trailing_slash, get_root_relative_path};
use crate::storage::utils::size::format_size;
use futures::stream::{self, StreamExt, TryStreamExt};
use opendal::{ErrorKind, Operator};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Trait for downloading files and directories from storage.
pub trait Downloader {
    /// Download a single file or entire directory from remote to local.
    ///
    /// The combined size of every file becomes the monitor's maximum and the
    /// monitor is completed once all files are written.
    ///
    /// # Arguments
    /// * `remote_path` - Source path in storage (file or directory)
    /// * `local_path` - Destination directory on local filesystem
    /// * `monitor` - Receives the number of bytes written so far
    ///
    /// # Returns
    /// * `Result<u64>` - Total bytes downloaded
    async fn download(
        &self,
        remote_path: &str,
        local_path: &str,
        monitor: &SharedMonitor,
    ) -> Result<u64>;
}

/// A remote file scheduled for download.
#[derive(Debug)]
struct RemoteFile {
    path: String,
    size: u64,
}

/// Everything a download has to create locally.
#[derive(Debug, Default)]
struct DownloadPlan {
    dirs: Vec<String>,
    files: Vec<RemoteFile>,
}

impl DownloadPlan {
    fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Implementation of Downloader for OpenDAL Operator.
pub struct OpenDalDownloader {
    operator: Operator,
}

impl OpenDalDownloader {
    /// Create a new downloader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    async fn plan(&self, remote_path: &str) -> Result<DownloadPlan> {
        let meta = match self.operator.stat(remote_path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return PathNotFoundSnafu {
                    path: PathBuf::from(remote_path),
                }
                .fail();
            }
            Err(e) => return Err(e.into()),
        };

        let mut plan = DownloadPlan::default();
        if meta.is_file() {
            plan.files.push(RemoteFile {
                path: remote_path.to_string(),
                size: meta.content_length(),
            });
            return Ok(plan);
        }

        let root = ensure_trailing_slash(remote_path);
        let mut lister = self.operator.lister_with(&root).recursive(true).await?;
        while let Some(entry) = lister.try_next().await? {
            if entry.path().trim_start_matches('/') == root.trim_start_matches('/') {
                continue;
            }
            if entry.metadata().is_dir() {
                plan.dirs.push(entry.path().to_string());
            } else {
                // Listings do not always carry the content length.
                let size = self.operator.stat(entry.path()).await?.content_length();
                plan.files.push(RemoteFile {
                    path: entry.path().to_string(),
                    size,
                });
            }
        }
        log::debug!(
            "download plan remote_path={remote_path} dirs={} files={}",
            plan.dirs.len(),
            plan.files.len()
        );
        Ok(plan)
    }

    async fn download_file(
        &self,
        file: &RemoteFile,
        local_file_path: PathBuf,
        monitor: &SharedMonitor,
    ) -> Result<()> {
        if let Some(parent) = local_file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut out = fs::File::create(&local_file_path).await?;
        let mut offset = 0u64;
        while offset < file.size {
            let end = (offset + DEFAULT_CHUNK_SIZE).min(file.size);
            let chunk = self
                .operator
                .read_with(&file.path)
                .range(offset..end)
                .await?;
            if chunk.is_empty() {
                break;
            }
            out.write_all(&chunk.to_vec()).await?;
            offset += chunk.len() as u64;
            monitor.advance(chunk.len() as u64)?;
        }
        out.flush().await?;

        println!(
            "\nDownloaded: {} → {} ({})",
            file.path,
            local_file_path.display(),
            format_size(offset)
        );
        Ok(())
    }
}

impl Downloader for OpenDalDownloader {
    async fn download(
        &self,
        remote_path: &str,
        local_path: &str,
        monitor: &SharedMonitor,
    ) -> Result<u64> {
        let plan = self.plan(remote_path).await?;
        let total = plan.total_bytes();
        if total > 0 {
            monitor.set_maximum(total)?;
        }

        let local_root = Path::new(local_path);
        fs::create_dir_all(local_root).await?;
        for dir in &plan.dirs {
            let relative = get_root_relative_path(dir, remote_path);
            fs::create_dir_all(local_root.join(relative)).await?;
        }

        stream::iter(plan.files)
            .map(|file| {
                let dest = local_root.join(get_root_relative_path(&file.path, remote_path));
                async move { self.download_file(&file, dest, monitor).await }
            })
            .buffer_unordered(DEFAULT_CONCURRENCY)
            .try_collect::<Vec<()>>()
            .await?;

        monitor.complete();
        Ok(total)
    }
}
