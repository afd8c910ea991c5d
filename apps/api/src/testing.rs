//! Test doubles for the external services behind `AppState`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::models::{
    ChartDatum, GithubProfileAnalysis, GithubRepositoryAnalysis, LinkedinAnalysis, ResumeAnalysis,
};
use crate::config::Config;
use crate::errors::AppError;
use crate::github::{GithubProfile, LookupError, ProfileLookup};
use crate::guard::MemorySubmissionGuard;
use crate::history::memory::MemoryHistoryStore;
use crate::state::AppState;

/// Canned analysis backend. Returns fixed feedback with the configured score,
/// after `delay` when one is set.
pub struct StubAnalyzer {
    score: f64,
    fail: bool,
    delay: Duration,
    pub calls: AtomicUsize,
    pub last_resume_text: Mutex<Option<String>>,
}

impl StubAnalyzer {
    pub fn scoring(score: f64) -> Self {
        Self {
            score,
            fail: false,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            last_resume_text: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::scoring(0.0)
        }
    }

    pub fn slow(score: f64, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::scoring(score)
        }
    }

    async fn begin(&self, operation: &str) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(AppError::Upstream(format!(
                "{operation} failed: model overloaded"
            )));
        }
        Ok(())
    }

    fn resume(&self, resume_text: &str, comprehensive: Option<&str>) -> ResumeAnalysis {
        *self.last_resume_text.lock().unwrap() = Some(resume_text.to_string());
        ResumeAnalysis {
            score: self.score,
            comprehensive_analysis: comprehensive.map(String::from),
            summary_feedback: "Lead with your backend focus.".to_string(),
            skills_feedback: "Group skills by domain.".to_string(),
            experience_feedback: "Quantify the impact of each role.".to_string(),
            education_feedback: "Education is presented clearly.".to_string(),
            project_feedback: "Link to live demos.".to_string(),
            job_role_suggestions: "Backend Engineer, Platform Engineer".to_string(),
            overall_suggestions: "1. Add metrics 2. Keep it to one page".to_string(),
        }
    }
}

#[async_trait]
impl Analyzer for StubAnalyzer {
    async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeAnalysis, AppError> {
        self.begin("Resume analysis").await?;
        Ok(self.resume(resume_text, Some("A well-structured resume.")))
    }

    async fn analyze_resume_against_job(
        &self,
        resume_text: &str,
        _job_description: &str,
    ) -> Result<ResumeAnalysis, AppError> {
        self.begin("Resume analysis").await?;
        Ok(self.resume(resume_text, None))
    }

    async fn analyze_linkedin(&self, _profile_text: &str) -> Result<LinkedinAnalysis, AppError> {
        self.begin("LinkedIn profile analysis").await?;
        Ok(LinkedinAnalysis {
            profile_strength_score: self.score,
            headline_feedback: "Name your specialty.".to_string(),
            summary_feedback: "Open with a hook.".to_string(),
            experience_feedback: "Use the STAR method.".to_string(),
            skills_feedback: "Pin your top three skills.".to_string(),
            activity_feedback: "Post monthly.".to_string(),
            keyword_suggestions: "Rust, distributed systems".to_string(),
            overall_suggestions: "1. Add a banner 2. Ask for recommendations".to_string(),
        })
    }

    async fn analyze_github_profile(
        &self,
        _username: &str,
    ) -> Result<GithubProfileAnalysis, AppError> {
        self.begin("GitHub profile analysis").await?;
        Ok(GithubProfileAnalysis {
            tech_stack: "Mostly Rust and TypeScript.".to_string(),
            code_quality_insights: "Consistent naming and READMEs.".to_string(),
            language_distribution: vec![ChartDatum {
                name: "Rust".to_string(),
                value: 4,
            }],
            language_distribution_chart: "pie\n    \"Rust\" : 4".to_string(),
            repository_creation_activity: vec![],
            repository_creation_activity_chart: "pie\n    \"No activity data\" : 1".to_string(),
            overall_suggestions: "1. Pin repositories 2. Add topics".to_string(),
        })
    }

    async fn analyze_github_repository(
        &self,
        _repository_url: &str,
    ) -> Result<GithubRepositoryAnalysis, AppError> {
        self.begin("GitHub repository analysis").await?;
        Ok(GithubRepositoryAnalysis {
            purpose_feedback: "The purpose is clear.".to_string(),
            documentation_quality_feedback: "Add setup steps.".to_string(),
            overall_suggestions: "1. Add a quickstart 2. Add CONTRIBUTING.md".to_string(),
        })
    }
}

/// Profile card lookup with a fixed answer.
pub struct StubProfileLookup(Option<GithubProfile>);

impl StubProfileLookup {
    pub fn missing() -> Self {
        Self(None)
    }

    pub fn found(profile: GithubProfile) -> Self {
        Self(Some(profile))
    }
}

#[async_trait]
impl ProfileLookup for StubProfileLookup {
    async fn profile(&self, username: &str) -> Result<GithubProfile, LookupError> {
        self.0
            .clone()
            .ok_or_else(|| LookupError::NotFound(username.to_string()))
    }
}

pub fn test_state(
    analyzer: Arc<StubAnalyzer>,
    history: Arc<MemoryHistoryStore>,
    profiles: StubProfileLookup,
) -> AppState {
    AppState {
        config: Config::for_tests(),
        analyzer,
        history,
        guard: Arc::new(MemorySubmissionGuard::default()),
        profiles: Arc::new(profiles),
    }
}
