//! Analysis Invoker: one capability interface, one operation per analysis kind.
//!
//! Default: `LlmAnalyzer` (Claude via `LlmClient`, GitHub data via `GithubClient`).
//! `AppState` holds an `Arc<dyn Analyzer>`; tests swap in a canned backend.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::analysis::charts::profile_charts;
use crate::analysis::decode::{
    ComprehensiveResumeWire, LinkedinWire, ProfileNarrative, RepositoryWire, ResumeWire,
};
use crate::analysis::models::{
    AnalysisRequest, AnalysisResult, GithubProfileAnalysis, GithubRepositoryAnalysis,
    LinkedinAnalysis, ResumeAnalysis,
};
use crate::analysis::prompts::{
    GITHUB_PROFILE_PROMPT, GITHUB_PROFILE_ROLE, GITHUB_REPOSITORY_PROMPT, GITHUB_REPOSITORY_ROLE,
    LINKEDIN_PROMPT, LINKEDIN_ROLE, RESUME_COMPREHENSIVE_PROMPT, RESUME_JOB_PROMPT, RESUME_ROLE,
};
use crate::analysis::scoring::{
    blend_with_keywords, calibrate_score, clamp_score, keyword_match_score,
};
use crate::errors::AppError;
use crate::github::{
    parse_repository_url, GithubClient, GithubRepo, RepoCoordinates, MISSING_README,
};
use crate::llm_client::prompts::{
    fill_template, system_prompt, SCORE_FORMAT_INSTRUCTION, SCORING_RUBRIC,
};
use crate::llm_client::LlmClient;

/// Repositories beyond this many are left out of the profile prompt.
const MAX_PROMPT_REPOS: usize = 50;
/// README text beyond this many characters is cut before prompting.
const MAX_README_CHARS: usize = 20_000;

/// The analysis operations. Each has its own inputs and output schema.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Comprehensive resume review with no job description.
    async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeAnalysis, AppError>;

    async fn analyze_resume_against_job(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ResumeAnalysis, AppError>;

    async fn analyze_linkedin(&self, profile_text: &str) -> Result<LinkedinAnalysis, AppError>;

    async fn analyze_github_profile(
        &self,
        username: &str,
    ) -> Result<GithubProfileAnalysis, AppError>;

    async fn analyze_github_repository(
        &self,
        repository_url: &str,
    ) -> Result<GithubRepositoryAnalysis, AppError>;
}

/// Dispatches a request to the operation for its kind.
pub async fn invoke(
    analyzer: &dyn Analyzer,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, AppError> {
    let result = match request {
        AnalysisRequest::Resume {
            resume_text,
            job_description: None,
        } => AnalysisResult::Resume(analyzer.analyze_resume(resume_text).await?),
        AnalysisRequest::Resume {
            resume_text,
            job_description: Some(jd),
        } => AnalysisResult::Resume(analyzer.analyze_resume_against_job(resume_text, jd).await?),
        AnalysisRequest::Linkedin { profile_text } => {
            AnalysisResult::Linkedin(analyzer.analyze_linkedin(profile_text).await?)
        }
        AnalysisRequest::GithubProfile { username } => {
            AnalysisResult::GithubProfile(analyzer.analyze_github_profile(username).await?)
        }
        AnalysisRequest::GithubRepository { repository_url } => AnalysisResult::GithubRepo(
            analyzer.analyze_github_repository(repository_url).await?,
        ),
    };
    Ok(result)
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAnalyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmAnalyzer {
    llm: LlmClient,
    github: GithubClient,
}

impl LlmAnalyzer {
    pub fn new(llm: LlmClient, github: GithubClient) -> Self {
        Self { llm, github }
    }

    /// Sends the prompt and deserializes the answer into the operation's wire
    /// shape. Transport failures and schema mismatches are both upstream errors.
    async fn ask<T>(&self, prompt: &str, role: &str, operation: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.llm
            .call_json::<T>(prompt, &system_prompt(role))
            .await
            .map_err(|e| AppError::Upstream(format!("{operation} failed: {e}")))
    }

    /// The user's public repositories, or none when the listing fails.
    async fn repositories_or_empty(&self, username: &str) -> Vec<GithubRepo> {
        match self.github.list_repos(username).await {
            Ok(repos) => repos,
            Err(e) => {
                warn!("Repository listing for {username} unavailable, analysing without it: {e}");
                Vec::new()
            }
        }
    }

    /// README text capped for the prompt, or the missing-README placeholder.
    async fn readme_or_placeholder(&self, coords: &RepoCoordinates) -> String {
        self.github
            .fetch_readme(coords)
            .await
            .map(|text| truncate_chars(&text, MAX_README_CHARS))
            .unwrap_or_else(|| MISSING_README.to_string())
    }
}

/// Fills a scored template. The rubric goes in alongside the caller's values.
fn scored_prompt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut all = vec![
        ("scoring_rubric", SCORING_RUBRIC),
        ("score_format", SCORE_FORMAT_INSTRUCTION),
    ];
    all.extend_from_slice(vars);
    fill_template(template, &all)
}

#[async_trait]
impl Analyzer for LlmAnalyzer {
    async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeAnalysis, AppError> {
        const OP: &str = "Resume analysis";
        let prompt = scored_prompt(RESUME_COMPREHENSIVE_PROMPT, &[("resume_text", resume_text)]);
        let wire: ComprehensiveResumeWire = self.ask(&prompt, RESUME_ROLE, OP).await?;
        let mut analysis = ResumeAnalysis::from(wire);
        analysis.score = clamp_score(calibrate_score(analysis.score));
        info!("Comprehensive resume analysis completed");
        Ok(analysis)
    }

    async fn analyze_resume_against_job(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ResumeAnalysis, AppError> {
        const OP: &str = "Resume analysis";
        let prompt = resume_job_prompt(resume_text, job_description);
        let wire: ResumeWire = self.ask(&prompt, RESUME_ROLE, OP).await?;
        let mut analysis = ResumeAnalysis::from(wire);

        let calibrated = calibrate_score(analysis.score);
        let keyword = keyword_match_score(resume_text, job_description);
        analysis.score = clamp_score(blend_with_keywords(calibrated, keyword));
        info!(
            "Resume vs job description analysis completed: model={calibrated}, keyword={keyword}, final={}",
            analysis.score
        );
        Ok(analysis)
    }

    async fn analyze_linkedin(&self, profile_text: &str) -> Result<LinkedinAnalysis, AppError> {
        const OP: &str = "LinkedIn profile analysis";
        let prompt = scored_prompt(LINKEDIN_PROMPT, &[("profile_text", profile_text)]);
        let wire: LinkedinWire = self.ask(&prompt, LINKEDIN_ROLE, OP).await?;
        let mut analysis = LinkedinAnalysis::from(wire);
        analysis.profile_strength_score =
            clamp_score(calibrate_score(analysis.profile_strength_score));
        info!("LinkedIn profile analysis completed");
        Ok(analysis)
    }

    async fn analyze_github_profile(
        &self,
        username: &str,
    ) -> Result<GithubProfileAnalysis, AppError> {
        const OP: &str = "GitHub profile analysis";
        let repos = self.repositories_or_empty(username).await;
        let charts = profile_charts(&repos);

        let prompt = fill_template(
            GITHUB_PROFILE_PROMPT,
            &[
                ("username", username),
                ("repo_count", &repos.len().to_string()),
                ("repo_details", &repo_details(&repos)),
                ("language_summary", &charts.language_distribution_chart),
            ],
        );
        let narrative: ProfileNarrative = self.ask(&prompt, GITHUB_PROFILE_ROLE, OP).await?;

        info!("GitHub profile analysis completed for {username}");
        Ok(GithubProfileAnalysis {
            tech_stack: narrative.tech_stack,
            code_quality_insights: narrative.code_quality_insights,
            language_distribution: charts.language_distribution,
            language_distribution_chart: charts.language_distribution_chart,
            repository_creation_activity: charts.repository_creation_activity,
            repository_creation_activity_chart: charts.repository_creation_activity_chart,
            overall_suggestions: narrative.overall_suggestions,
        })
    }

    async fn analyze_github_repository(
        &self,
        repository_url: &str,
    ) -> Result<GithubRepositoryAnalysis, AppError> {
        const OP: &str = "GitHub repository analysis";
        let coords = parse_repository_url(repository_url).ok_or_else(|| {
            AppError::Validation("Please enter a valid GitHub repository URL.".to_string())
        })?;
        let readme = self.readme_or_placeholder(&coords).await;

        let prompt = fill_template(
            GITHUB_REPOSITORY_PROMPT,
            &[("repository_url", repository_url), ("readme", &readme)],
        );
        let wire: RepositoryWire = self.ask(&prompt, GITHUB_REPOSITORY_ROLE, OP).await?;
        let analysis = GithubRepositoryAnalysis::from(wire);
        info!("GitHub repository analysis completed for {repository_url}");
        Ok(analysis)
    }
}

fn resume_job_prompt(resume_text: &str, job_description: &str) -> String {
    scored_prompt(
        RESUME_JOB_PROMPT,
        &[
            ("resume_text", resume_text),
            ("job_description", job_description),
        ],
    )
}

/// Pretty JSON of the repositories the prompt describes.
fn repo_details(repos: &[GithubRepo]) -> String {
    if repos.is_empty() {
        return "No public repository data is available for this user.".to_string();
    }
    let shown = &repos[..repos.len().min(MAX_PROMPT_REPOS)];
    serde_json::to_string_pretty(shown).unwrap_or_default()
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
