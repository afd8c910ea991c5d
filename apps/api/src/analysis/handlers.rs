use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::models::Submission;
use crate::analysis::pipeline::{run_analysis, AnalysisOutcome};
use crate::auth::OwnerId;
use crate::errors::AppError;
use crate::github::{is_valid_username, GithubProfile};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GithubProfileRequest {
    pub github_username: String,
}

#[derive(Deserialize)]
pub struct GithubRepositoryRequest {
    pub repository_url: String,
}

/// Profile analysis plus the stats card. The card is best-effort: when the
/// lookup fails the analysis is still returned with `profile_error` set.
#[derive(Serialize)]
pub struct GithubProfileAnalysisResponse {
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<GithubProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_error: Option<String>,
}

/// Fields collected from a multipart analysis form.
#[derive(Default)]
struct UploadForm {
    document: Option<Bytes>,
    job_description: Option<String>,
}

async fn read_upload_form(
    mut multipart: Multipart,
    document_field: &str,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == document_field {
            if let Some(content_type) = field.content_type() {
                if content_type != "application/pdf" && content_type != "application/octet-stream"
                {
                    return Err(AppError::Validation(format!(
                        "Please upload a PDF file (got {content_type})."
                    )));
                }
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            form.document = Some(bytes);
        } else if name == "job_description" {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read job description: {e}")))?;
            form.job_description = Some(text);
        }
    }
    Ok(form)
}

fn require_document(document: Option<Bytes>) -> Result<Bytes, AppError> {
    document.ok_or_else(|| AppError::Validation("Please upload a PDF file.".to_string()))
}

/// POST /api/v1/analyses/resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    owner: OwnerId,
    multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let form = read_upload_form(multipart, "resume").await?;
    let submission = Submission::Resume {
        document: require_document(form.document)?,
        job_description: form.job_description,
    };
    Ok(Json(run_analysis(&state, &owner, submission).await?))
}

/// POST /api/v1/analyses/linkedin
pub async fn handle_analyze_linkedin(
    State(state): State<AppState>,
    owner: OwnerId,
    multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let form = read_upload_form(multipart, "profile").await?;
    let submission = Submission::Linkedin {
        document: require_document(form.document)?,
    };
    Ok(Json(run_analysis(&state, &owner, submission).await?))
}

/// POST /api/v1/analyses/github/profile
pub async fn handle_analyze_github_profile(
    State(state): State<AppState>,
    owner: OwnerId,
    Json(req): Json<GithubProfileRequest>,
) -> Result<Json<GithubProfileAnalysisResponse>, AppError> {
    let username = req.github_username.trim().trim_start_matches('@').to_string();
    let outcome = run_analysis(
        &state,
        &owner,
        Submission::GithubProfile {
            username: username.clone(),
        },
    )
    .await?;

    let (profile, profile_error) = match state.profiles.profile(&username).await {
        Ok(profile) => (Some(profile), None),
        Err(e) => {
            warn!(owner = %owner, "Profile card for {username} unavailable: {e}");
            (None, Some(e.to_string()))
        }
    };

    Ok(Json(GithubProfileAnalysisResponse {
        outcome,
        profile,
        profile_error,
    }))
}

/// POST /api/v1/analyses/github/repository
pub async fn handle_analyze_github_repository(
    State(state): State<AppState>,
    owner: OwnerId,
    Json(req): Json<GithubRepositoryRequest>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let submission = Submission::GithubRepository {
        repository_url: req.repository_url,
    };
    Ok(Json(run_analysis(&state, &owner, submission).await?))
}

/// GET /api/v1/github/users/:username
pub async fn handle_github_user(
    State(state): State<AppState>,
    _owner: OwnerId,
    Path(username): Path<String>,
) -> Result<Json<GithubProfile>, AppError> {
    let username = username.trim().trim_start_matches('@');
    if !is_valid_username(username) {
        return Err(AppError::Validation(format!(
            "'{username}' is not a valid GitHub username."
        )));
    }
    let profile = state.profiles.profile(username).await?;
    info!("Fetched GitHub profile card for {username}");
    Ok(Json(profile))
}
