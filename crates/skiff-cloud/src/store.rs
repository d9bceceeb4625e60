use std::path::Path;

use crate::aws::AwsError;
use crate::executor::{AwsExecutor, RealExecutor};

/// Handle to an uploaded artifact, consumed by create/update requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub bucket: String,
    pub key: String,
}

/// Durable storage for deploy artifacts.
#[allow(async_fn_in_trait)]
pub trait ArtifactStore: Send + Sync {
    /// Upload the file at `body` under `key` and return a reference to it.
    async fn upload(&self, key: &str, body: &Path) -> Result<ArtifactRef, TransferError>;
}

/// S3-backed artifact store, parameterized over the executor for testability.
pub struct S3ArtifactStore<E: AwsExecutor = RealExecutor> {
    executor: E,
    bucket: String,
    region: String,
}

impl S3ArtifactStore<RealExecutor> {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            executor: RealExecutor,
            bucket: bucket.into(),
            region: region.into(),
        }
    }
}

impl<E: AwsExecutor> S3ArtifactStore<E> {
    pub fn with_executor(executor: E, bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            executor,
            bucket: bucket.into(),
            region: region.into(),
        }
    }
}

impl<E: AwsExecutor> ArtifactStore for S3ArtifactStore<E> {
    async fn upload(&self, key: &str, body: &Path) -> Result<ArtifactRef, TransferError> {
        let body_str = body
            .to_str()
            .ok_or_else(|| TransferError::InvalidPath(body.to_path_buf()))?;

        self.executor
            .exec(&[
                "s3api".to_owned(),
                "put-object".to_owned(),
                "--bucket".to_owned(),
                self.bucket.clone(),
                "--key".to_owned(),
                key.to_owned(),
                "--body".to_owned(),
                body_str.to_owned(),
                "--region".to_owned(),
                self.region.clone(),
            ])
            .await
            .map_err(|e| TransferError::Upload {
                key: key.to_owned(),
                source: e,
            })?;

        Ok(ArtifactRef {
            bucket: self.bucket.clone(),
            key: key.to_owned(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("artifact path is not valid UTF-8: {0}")]
    InvalidPath(std::path::PathBuf),

    #[error("failed to upload artifact '{key}'")]
    Upload { key: String, source: AwsError },
}
