//! At most one in-flight submission per (owner, analysis kind).
//!
//! A second submission while one is running is rejected, never queued. The
//! Redis key carries a TTL so a crashed worker cannot hold a slot forever, and
//! holds a per-submission token so a release only ever frees its own slot.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::Script;
use tracing::debug;
use uuid::Uuid;

use crate::analysis::models::AnalysisKind;
use crate::errors::AppError;

/// Deletes the slot only while it still holds the caller's token.
const RELEASE_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
else
    return 0
end
"#;

/// Proof of holding a slot, handed back on release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotToken(String);

impl SlotToken {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
pub trait SubmissionGuard: Send + Sync {
    /// Claims the slot. `None` when a submission is already in flight.
    async fn try_acquire(
        &self,
        owner_id: &str,
        kind: AnalysisKind,
    ) -> Result<Option<SlotToken>, AppError>;

    /// Frees the slot if `token` still owns it. A slot that expired and was
    /// claimed by another submission is left alone.
    async fn release(
        &self,
        owner_id: &str,
        kind: AnalysisKind,
        token: &SlotToken,
    ) -> Result<(), AppError>;
}

fn slot_key(owner_id: &str, kind: AnalysisKind) -> String {
    format!("careerkit:submission:{owner_id}:{kind}")
}

pub struct RedisSubmissionGuard {
    conn: MultiplexedConnection,
    release_script: Script,
    ttl_secs: u64,
}

impl RedisSubmissionGuard {
    /// `conn` is opened once at startup and cloned per command.
    pub fn new(conn: MultiplexedConnection, ttl_secs: u64) -> Self {
        Self {
            conn,
            release_script: Script::new(RELEASE_SCRIPT),
            ttl_secs,
        }
    }
}

#[async_trait]
impl SubmissionGuard for RedisSubmissionGuard {
    async fn try_acquire(
        &self,
        owner_id: &str,
        kind: AnalysisKind,
    ) -> Result<Option<SlotToken>, AppError> {
        let key = slot_key(owner_id, kind);
        let token = SlotToken::generate();
        let mut conn = self.conn.clone();
        // SET NX replies OK when the key was set and nil when it already exists
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(token.as_str())
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(anyhow::Error::from)?;
        debug!("Submission slot {key}: acquired={}", reply.is_some());
        Ok(reply.map(|_| token))
    }

    async fn release(
        &self,
        owner_id: &str,
        kind: AnalysisKind,
        token: &SlotToken,
    ) -> Result<(), AppError> {
        let key = slot_key(owner_id, kind);
        let mut conn = self.conn.clone();
        let deleted: i64 = self
            .release_script
            .key(&key)
            .arg(token.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(anyhow::Error::from)?;
        if deleted == 0 {
            debug!("Submission slot {key} was no longer ours; left in place");
        }
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemorySubmissionGuard;
