use std::env;
use std::str::FromStr;

use crate::error::{Error, MissingEnvVarSnafu, Result};
use crate::progress::{ProgressMonitor, StepBasis};
use crate::storage::constants::DEFAULT_FS_ROOT;
use crate::storage::{StorageConfig, StorageProvider};

// Read the first of `keys` that is set.
fn get_env_var(keys: &[&str]) -> Result<String> {
    keys.iter()
        .find_map(|key| env::var(key).ok())
        .ok_or_else(|| {
            MissingEnvVarSnafu {
                key: keys.join(" or "),
            }
            .build()
        })
}

fn get_optional_env_var(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok())
}

/// Load storage configuration from environment variables
pub fn load_storage_config() -> Result<StorageConfig> {
    let provider_str = env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "fs".to_string());
    let provider = StorageProvider::from_str(&provider_str)?;
    log::debug!("load_storage_config provider={provider:?}");

    match provider {
        StorageProvider::S3 => load_s3_config(&provider_str),
        StorageProvider::Fs => Ok(load_fs_config()),
    }
}

/// Load S3 (AWS or MinIO) configuration
fn load_s3_config(provider_str: &str) -> Result<StorageConfig> {
    let is_minio = provider_str.eq_ignore_ascii_case("minio");

    let (bucket, access_key_id, secret_access_key) = if is_minio {
        (
            get_env_var(&["STORAGE_BUCKET", "MINIO_BUCKET"])?,
            get_env_var(&["STORAGE_ACCESS_KEY_ID", "MINIO_ACCESS_KEY"])?,
            get_env_var(&["STORAGE_ACCESS_KEY_SECRET", "MINIO_SECRET_KEY"])?,
        )
    } else {
        (
            get_env_var(&["STORAGE_BUCKET", "AWS_S3_BUCKET"])?,
            get_env_var(&["STORAGE_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"])?,
            get_env_var(&["STORAGE_ACCESS_KEY_SECRET", "AWS_SECRET_ACCESS_KEY"])?,
        )
    };

    let region = get_optional_env_var(&[
        "STORAGE_REGION",
        "AWS_DEFAULT_REGION",
        "MINIO_DEFAULT_REGION",
    ]);

    let endpoint = if is_minio {
        Some(
            get_optional_env_var(&["STORAGE_ENDPOINT", "MINIO_ENDPOINT"])
                .unwrap_or_else(|| "http://localhost:9000".to_string()),
        )
    } else {
        env::var("STORAGE_ENDPOINT").ok()
    };

    let mut config = StorageConfig::s3(bucket, access_key_id, secret_access_key, region);
    config.endpoint = endpoint;
    Ok(config)
}

/// Load filesystem configuration
fn load_fs_config() -> StorageConfig {
    let root_path = env::var("STORAGE_ROOT_PATH").unwrap_or_else(|_| DEFAULT_FS_ROOT.to_string());
    StorageConfig::fs(root_path)
}

impl FromStr for StepBasis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "maximum" | "max" => Ok(Self::Maximum),
            "progress" | "count" => Ok(Self::Progress),
            _ => Err(Error::UnsupportedStepBasis {
                basis: s.to_string(),
            }),
        }
    }
}

/// Step settings shared by every command that drives a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub min_step_size: u64,
    pub max_step_size: u64,
    pub basis: StepBasis,
}

impl MonitorConfig {
    /// Build a monitor without listeners.
    pub fn build(&self) -> Result<ProgressMonitor> {
        let mut monitor =
            ProgressMonitor::with_min_max_step_size(self.min_step_size, self.max_step_size)?;
        monitor.set_step_basis(self.basis);
        Ok(monitor)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            min_step_size: crate::progress::DEFAULT_MIN_STEP_SIZE,
            max_step_size: crate::progress::DEFAULT_MAX_STEP_SIZE,
            basis: StepBasis::default(),
        }
    }
}
