use crate::error::{Error, Result};
use crate::progress::SharedMonitor;
use opendal::Operator;
use std::str::FromStr;

pub mod constants;
mod operations;
mod utils;

pub use self::utils::progress::console_reporter;

use self::operations::download::OpenDalDownloader;
use self::operations::upload::OpenDalUploader;
use self::operations::{Downloader, Uploader};
use crate::wrap_err;

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    S3,
    Fs,
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "s3" | "minio" => Ok(Self::S3),
            "fs" => Ok(Self::Fs),
            _ => Err(Error::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Unified storage configuration for different providers
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub root_path: Option<String>,
}

impl StorageConfig {
    pub fn s3(
        bucket: String,
        access_key_id: String,
        secret_access_key: String,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::S3,
            bucket,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(secret_access_key),
            endpoint: None,
            region,
            root_path: None,
        }
    }

    pub fn fs(root_path: String) -> Self {
        Self {
            provider: StorageProvider::Fs,
            bucket: "local".to_string(),
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: Some(root_path),
        }
    }
}

/// Storage client that transfers objects and reports progress to a monitor.
#[derive(Clone)]
pub struct StorageClient {
    operator: Operator,
    provider: StorageProvider,
}

impl StorageClient {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let operator = Self::build_operator(&config)?;
        Ok(Self {
            operator,
            provider: config.provider,
        })
    }

    pub fn provider(&self) -> StorageProvider {
        self.provider
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    fn build_operator(config: &StorageConfig) -> Result<Operator> {
        match &config.provider {
            StorageProvider::S3 => {
                #[cfg(feature = "s3")]
                {
                    let mut builder = opendal::services::S3::default().bucket(&config.bucket);
                    if let Some(access_key_id) = &config.access_key_id {
                        builder = builder.access_key_id(access_key_id);
                    }
                    if let Some(secret_access_key) = &config.access_key_secret {
                        builder = builder.secret_access_key(secret_access_key);
                    }
                    if let Some(region) = &config.region {
                        builder = builder.region(region);
                    }
                    if let Some(endpoint) = &config.endpoint {
                        builder = builder.endpoint(endpoint);
                    }
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "s3"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "s3 (feature disabled)".to_string(),
                    })
                }
            }
            StorageProvider::Fs => {
                #[cfg(feature = "fs")]
                {
                    let root = config
                        .root_path
                        .as_deref()
                        .unwrap_or(constants::DEFAULT_FS_ROOT);
                    let builder = opendal::services::Fs::default().root(root);
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "fs"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "fs (feature disabled)".to_string(),
                    })
                }
            }
        }
    }

    /// Download `remote_path` into the local directory `local_path`.
    ///
    /// Returns the number of bytes transferred.
    pub async fn download_files(
        &self,
        remote_path: &str,
        local_path: &str,
        monitor: &SharedMonitor,
    ) -> Result<u64> {
        log::debug!(
            "download_files provider={:?} remote_path={} local_path={}",
            self.provider,
            remote_path,
            local_path
        );
        let downloader = OpenDalDownloader::new(self.operator.clone());
        wrap_err!(
            downloader.download(remote_path, local_path, monitor).await,
            DownloadFailed {
                remote_path: remote_path.to_string(),
                local_path: local_path.to_string()
            }
        )
    }

    /// Upload `local_path` below the remote prefix `remote_path`.
    ///
    /// Returns the number of bytes transferred.
    pub async fn upload_files(
        &self,
        local_path: &str,
        remote_path: &str,
        is_recursive: bool,
        monitor: &SharedMonitor,
    ) -> Result<u64> {
        log::debug!(
            "upload_files provider={:?} local_path={} remote_path={} recursive={}",
            self.provider,
            local_path,
            remote_path,
            is_recursive
        );
        let uploader = OpenDalUploader::new(self.operator.clone());
        wrap_err!(
            uploader
                .upload(local_path, remote_path, is_recursive, monitor)
                .await,
            UploadFailed {
                local_path: local_path.to_string(),
                remote_path: remote_path.to_string()
            }
        )
    }
}
