use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::config::Config;
use crate::github::ProfileLookup;
use crate::guard::SubmissionGuard;
use crate::history::HistoryStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// External services sit behind traits so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Analysis backend. Default: LlmAnalyzer (Claude + GitHub data).
    pub analyzer: Arc<dyn Analyzer>,
    /// Append-only log of successful analyses (Postgres + S3 reports).
    pub history: Arc<dyn HistoryStore>,
    /// One in-flight submission per owner and kind (Redis).
    pub guard: Arc<dyn SubmissionGuard>,
    /// GitHub profile card lookup.
    pub profiles: Arc<dyn ProfileLookup>,
}
