use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{report_key, HistoryRecord, HistoryStore, NewHistoryRecord};
use crate::analysis::models::AnalysisKind;
use crate::errors::AppError;

/// In-process history log for tests. `failing()` rejects every append.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
    reports: Mutex<HashMap<Uuid, String>>,
    fail: bool,
}

impl MemoryHistoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn record(&self, entry: NewHistoryRecord) -> Result<HistoryRecord, AppError> {
        if self.fail {
            return Err(AppError::Storage("history store unavailable".to_string()));
        }
        let id = Uuid::new_v4();
        let record = HistoryRecord {
            id,
            owner_id: entry.owner_id.clone(),
            analysis_kind: entry.kind.as_str().to_string(),
            input_summary: entry.input_summary,
            result: serde_json::to_value(&entry.result).unwrap(),
            report_key: Some(report_key(&entry.owner_id, id)),
            created_at: Utc::now(),
        };
        self.reports.lock().unwrap().insert(id, entry.report);
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list(
        &self,
        owner_id: &str,
        kind: Option<AnalysisKind>,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.owner_id == owner_id)
            .filter(|r| kind.map_or(true, |k| r.analysis_kind == k.as_str()))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn report(&self, owner_id: &str, record_id: Uuid) -> Result<Option<String>, AppError> {
        let owned = self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.id == record_id && r.owner_id == owner_id);
        if !owned {
            return Ok(None);
        }
        Ok(self.reports.lock().unwrap().get(&record_id).cloned())
    }
}
