//! The one submission pipeline every analysis kind goes through:
//! guard → validate → extract → invoke → normalize → present → record.

use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::invoke;
use crate::analysis::models::{AnalysisKind, AnalysisRequest, AnalysisResult, Submission};
use crate::analysis::scoring::normalize_result;
use crate::analysis::validation::validate_submission;
use crate::auth::OwnerId;
use crate::errors::AppError;
use crate::extraction::extract_pdf_text;
use crate::guard::SlotToken;
use crate::history::NewHistoryRecord;
use crate::presenter::{present, render_markdown, Section};
use crate::state::AppState;

/// Whether the analysis made it into the history log.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryStatus {
    pub recorded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub kind: AnalysisKind,
    pub result: AnalysisResult,
    pub sections: Vec<Section>,
    pub history: HistoryStatus,
}

pub fn report_title(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::Resume => "Resume Analysis",
        AnalysisKind::Linkedin => "LinkedIn Profile Analysis",
        AnalysisKind::GithubProfile => "GitHub Profile Analysis",
        AnalysisKind::GithubRepo => "GitHub Repository Analysis",
    }
}

/// Runs one submission end to end. The submission slot is released on every
/// outcome, including a caller that stops waiting.
pub async fn run_analysis(
    state: &AppState,
    owner: &OwnerId,
    submission: Submission,
) -> Result<AnalysisOutcome, AppError> {
    let kind = submission.kind();
    let Some(token) = state.guard.try_acquire(owner.as_str(), kind).await? else {
        warn!(owner = %owner, kind = %kind, "Rejected submission: one is already in flight");
        return Err(AppError::SubmissionInFlight);
    };

    // Dropping the JoinHandle detaches the task; it still runs to its release
    let task = tokio::spawn(run_guarded(
        state.clone(),
        owner.clone(),
        submission,
        token,
    ));
    task.await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Analysis task aborted: {e}")))?
}

async fn run_guarded(
    state: AppState,
    owner: OwnerId,
    submission: Submission,
    token: SlotToken,
) -> Result<AnalysisOutcome, AppError> {
    let kind = submission.kind();
    let outcome = execute(&state, &owner, submission).await;

    if let Err(e) = state.guard.release(owner.as_str(), kind, &token).await {
        warn!(owner = %owner, kind = %kind, "Failed to release submission slot: {e}");
    }
    match &outcome {
        Ok(_) => info!(owner = %owner, kind = %kind, "Analysis succeeded"),
        Err(e) => warn!(owner = %owner, kind = %kind, "Analysis failed: {e}"),
    }
    outcome
}

async fn execute(
    state: &AppState,
    owner: &OwnerId,
    submission: Submission,
) -> Result<AnalysisOutcome, AppError> {
    // 1. Validate before any extraction or network call
    let submission = validate_submission(submission, state.config.max_upload_bytes)?;

    // 2. Extract document text and build the request
    let request = build_request(submission).await?;
    let kind = request.kind();

    // 3. Invoke and normalize
    debug!(
        kind = %kind,
        subject_chars = request.subject_text().chars().count(),
        "Invoking analyzer"
    );
    let result = invoke(state.analyzer.as_ref(), &request).await?;
    let result = normalize_result(result, request.comparison_text().is_some());

    // 4. Present
    let sections = present(&result);

    // 5. Record; a failure is reported, not fatal
    let entry = NewHistoryRecord {
        owner_id: owner.as_str().to_string(),
        kind,
        input_summary: request.input_summary(),
        result: result.clone(),
        report: render_markdown(report_title(kind), &sections),
    };
    let history = match state.history.record(entry).await {
        Ok(record) => HistoryStatus {
            recorded: true,
            record_id: Some(record.id),
            error: None,
        },
        Err(e) => {
            error!(owner = %owner, kind = %kind, "Failed to record analysis history: {e}");
            HistoryStatus {
                recorded: false,
                record_id: None,
                error: Some(format!("Analysis history could not be saved: {e}")),
            }
        }
    };

    Ok(AnalysisOutcome {
        kind,
        result,
        sections,
        history,
    })
}

async fn build_request(submission: Submission) -> Result<AnalysisRequest, AppError> {
    let request = match submission {
        Submission::Resume {
            document,
            job_description,
        } => {
            let extracted = extract_pdf_text(document).await?;
            info!("Extracted resume text from {} pages", extracted.page_count());
            AnalysisRequest::Resume {
                resume_text: extracted.text(),
                job_description,
            }
        }
        Submission::Linkedin { document } => {
            let extracted = extract_pdf_text(document).await?;
            info!("Extracted LinkedIn profile text from {} pages", extracted.page_count());
            AnalysisRequest::Linkedin {
                profile_text: extracted.text(),
            }
        }
        Submission::GithubProfile { username } => AnalysisRequest::GithubProfile { username },
        Submission::GithubRepository { repository_url } => {
            AnalysisRequest::GithubRepository { repository_url }
        }
    };
    Ok(request)
}
