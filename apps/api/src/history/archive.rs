//! Markdown report archive. S3 (or MinIO) in production.

use std::future::Future;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{info, warn};

use super::HistoryRecord;
use crate::errors::AppError;

#[async_trait]
pub trait ReportArchive: Send + Sync {
    async fn put(&self, key: &str, markdown: String) -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<String, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

pub struct S3ReportArchive {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ReportArchive {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ReportArchive for S3ReportArchive {
    async fn put(&self, key: &str, markdown: String) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(markdown.into_bytes()))
            .content_type("text/markdown")
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;
        info!("Archived report to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, AppError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 download failed: {e}")))?;
        let bytes = object
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 read failed: {e}")))?
            .into_bytes();
        String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::Storage(format!("Report {key} is not UTF-8: {e}")))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;
        Ok(())
    }
}

/// Archives the report, then runs `insert` with the archived key (`None` if
/// archiving failed). If the insert fails the archived object is removed
/// again, so no report exists without its row.
pub async fn archive_then_insert<F, Fut>(
    archive: &dyn ReportArchive,
    key: String,
    report: String,
    insert: F,
) -> Result<HistoryRecord, AppError>
where
    F: FnOnce(Option<String>) -> Fut,
    Fut: Future<Output = Result<HistoryRecord, AppError>>,
{
    let archived_key = match archive.put(&key, report).await {
        Ok(()) => Some(key),
        Err(e) => {
            warn!("Report archive failed, recording without it: {e}");
            None
        }
    };

    match insert(archived_key.clone()).await {
        Ok(record) => Ok(record),
        Err(e) => {
            if let Some(key) = archived_key {
                match archive.delete(&key).await {
                    Ok(()) => info!("Removed report {key} after failed insert"),
                    Err(del) => warn!("Report {key} left without a history row: {del}"),
                }
            }
            Err(e)
        }
    }
}

#[cfg(test)]
pub use memory::MemoryReportArchive;
