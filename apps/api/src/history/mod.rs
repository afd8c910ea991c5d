//! Append-only analysis history.
//!
//! One row per successful analysis in `analysis_history`. Rows are never
//! updated or deleted. The rendered markdown report of each analysis is
//! archived to S3 next to the row; a report whose row fails to insert is
//! removed again.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{AnalysisKind, AnalysisResult};
use crate::errors::AppError;
use archive::{archive_then_insert, ReportArchive, S3ReportArchive};

pub mod archive;
pub mod handlers;
#[cfg(test)]
pub mod memory;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub analysis_kind: String,
    /// Redacted description of the input. Never document text.
    pub input_summary: Value,
    pub result: Value,
    /// S3 key of the archived markdown report, when archiving succeeded.
    pub report_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to append one record.
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub owner_id: String,
    pub kind: AnalysisKind,
    pub input_summary: Value,
    pub result: AnalysisResult,
    /// Rendered markdown report to archive.
    pub report: String,
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends one record. There is no update or delete counterpart.
    async fn record(&self, entry: NewHistoryRecord) -> Result<HistoryRecord, AppError>;

    /// An owner's records, newest first.
    async fn list(
        &self,
        owner_id: &str,
        kind: Option<AnalysisKind>,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, AppError>;

    /// The archived markdown report of one of the owner's records.
    async fn report(&self, owner_id: &str, record_id: Uuid) -> Result<Option<String>, AppError>;
}

pub fn report_key(owner_id: &str, record_id: Uuid) -> String {
    format!("reports/{owner_id}/{record_id}.md")
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres + S3
// ────────────────────────────────────────────────────────────────────────────

pub struct PgHistoryStore {
    pool: PgPool,
    archive: S3ReportArchive,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool, archive: S3ReportArchive) -> Self {
        Self { pool, archive }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn record(&self, entry: NewHistoryRecord) -> Result<HistoryRecord, AppError> {
        let NewHistoryRecord {
            owner_id,
            kind,
            input_summary,
            result,
            report,
        } = entry;
        let id = Uuid::new_v4();
        let result = serde_json::to_value(&result).map_err(anyhow::Error::from)?;
        let pool = &self.pool;
        let (owner, summary, result) = (&owner_id, &input_summary, &result);

        let record = archive_then_insert(
            &self.archive,
            report_key(&owner_id, id),
            report,
            |archived_key| async move {
                // Append-only INSERT
                sqlx::query_as::<_, HistoryRecord>(
                    r#"
                    INSERT INTO analysis_history
                        (id, owner_id, analysis_kind, input_summary, result, report_key)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING id, owner_id, analysis_kind, input_summary, result, report_key, created_at
                    "#,
                )
                .bind(id)
                .bind(owner)
                .bind(kind.as_str())
                .bind(summary)
                .bind(result)
                .bind(&archived_key)
                .fetch_one(pool)
                .await
                .map_err(AppError::from)
            },
        )
        .await?;

        info!("Recorded {kind} analysis {id} for owner {owner_id}");
        Ok(record)
    }

    async fn list(
        &self,
        owner_id: &str,
        kind: Option<AnalysisKind>,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, AppError> {
        Ok(sqlx::query_as::<_, HistoryRecord>(
            r#"
            SELECT id, owner_id, analysis_kind, input_summary, result, report_key, created_at
            FROM analysis_history
            WHERE owner_id = $1 AND ($2::TEXT IS NULL OR analysis_kind = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(owner_id)
        .bind(kind.map(|k| k.as_str()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn report(&self, owner_id: &str, record_id: Uuid) -> Result<Option<String>, AppError> {
        let key: Option<Option<String>> = sqlx::query_scalar(
            "SELECT report_key FROM analysis_history WHERE id = $1 AND owner_id = $2",
        )
        .bind(record_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(Some(key)) = key else {
            return Ok(None);
        };

        let markdown = self.archive.get(&key).await?;
        Ok(Some(markdown))
    }
}
