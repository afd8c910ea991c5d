use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// The four analysis operations the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Resume,
    Linkedin,
    GithubProfile,
    GithubRepo,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Resume => "resume",
            AnalysisKind::Linkedin => "linkedin",
            AnalysisKind::GithubProfile => "github_profile",
            AnalysisKind::GithubRepo => "github_repo",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "resume" => Some(AnalysisKind::Resume),
            "linkedin" => Some(AnalysisKind::Linkedin),
            "github_profile" => Some(AnalysisKind::GithubProfile),
            "github_repo" => Some(AnalysisKind::GithubRepo),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller hands the pipeline: raw form input, before extraction.
#[derive(Debug, Clone)]
pub enum Submission {
    Resume {
        document: Bytes,
        job_description: Option<String>,
    },
    Linkedin {
        document: Bytes,
    },
    GithubProfile {
        username: String,
    },
    GithubRepository {
        repository_url: String,
    },
}

impl Submission {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Submission::Resume { .. } => AnalysisKind::Resume,
            Submission::Linkedin { .. } => AnalysisKind::Linkedin,
            Submission::GithubProfile { .. } => AnalysisKind::GithubProfile,
            Submission::GithubRepository { .. } => AnalysisKind::GithubRepo,
        }
    }
}

/// A validated, fully-extracted request for one analysis operation.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    Resume {
        resume_text: String,
        job_description: Option<String>,
    },
    Linkedin {
        profile_text: String,
    },
    GithubProfile {
        username: String,
    },
    GithubRepository {
        repository_url: String,
    },
}

impl AnalysisRequest {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisRequest::Resume { .. } => AnalysisKind::Resume,
            AnalysisRequest::Linkedin { .. } => AnalysisKind::Linkedin,
            AnalysisRequest::GithubProfile { .. } => AnalysisKind::GithubProfile,
            AnalysisRequest::GithubRepository { .. } => AnalysisKind::GithubRepo,
        }
    }

    /// The primary input being analysed: document text, username or URL.
    pub fn subject_text(&self) -> &str {
        match self {
            AnalysisRequest::Resume { resume_text, .. } => resume_text,
            AnalysisRequest::Linkedin { profile_text } => profile_text,
            AnalysisRequest::GithubProfile { username } => username,
            AnalysisRequest::GithubRepository { repository_url } => repository_url,
        }
    }

    /// Text the subject is compared against (a job description), if any.
    pub fn comparison_text(&self) -> Option<&str> {
        match self {
            AnalysisRequest::Resume {
                job_description, ..
            } => job_description.as_deref(),
            _ => None,
        }
    }

    /// Redacted summary stored with the history record. Never carries
    /// document or job-description text.
    pub fn input_summary(&self) -> serde_json::Value {
        match self {
            AnalysisRequest::Resume {
                job_description, ..
            } => serde_json::json!({ "job_description": job_description.is_some() }),
            AnalysisRequest::Linkedin { profile_text } => {
                serde_json::json!({ "characters": profile_text.chars().count() })
            }
            AnalysisRequest::GithubProfile { username } => {
                serde_json::json!({ "username": username })
            }
            AnalysisRequest::GithubRepository { repository_url } => {
                serde_json::json!({ "url": repository_url })
            }
        }
    }
}

/// One labelled slice of a chart (a language, a year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDatum {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    /// 0-100. Always 0 in comprehensive mode (no job description).
    pub score: f64,
    pub comprehensive_analysis: Option<String>,
    pub summary_feedback: String,
    pub skills_feedback: String,
    pub experience_feedback: String,
    pub education_feedback: String,
    pub project_feedback: String,
    pub job_role_suggestions: String,
    pub overall_suggestions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedinAnalysis {
    pub profile_strength_score: f64,
    pub headline_feedback: String,
    pub summary_feedback: String,
    pub experience_feedback: String,
    pub skills_feedback: String,
    pub activity_feedback: String,
    pub keyword_suggestions: String,
    pub overall_suggestions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubProfileAnalysis {
    pub tech_stack: String,
    pub code_quality_insights: String,
    pub language_distribution: Vec<ChartDatum>,
    /// Mermaid pie source for `language_distribution`.
    pub language_distribution_chart: String,
    pub repository_creation_activity: Vec<ChartDatum>,
    pub repository_creation_activity_chart: String,
    pub overall_suggestions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubRepositoryAnalysis {
    pub purpose_feedback: String,
    pub documentation_quality_feedback: String,
    pub overall_suggestions: String,
}

/// Structured feedback, one shape per analysis kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    Resume(ResumeAnalysis),
    Linkedin(LinkedinAnalysis),
    GithubProfile(GithubProfileAnalysis),
    GithubRepo(GithubRepositoryAnalysis),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResult::Resume(_) => AnalysisKind::Resume,
            AnalysisResult::Linkedin(_) => AnalysisKind::Linkedin,
            AnalysisResult::GithubProfile(_) => AnalysisKind::GithubProfile,
            AnalysisResult::GithubRepo(_) => AnalysisKind::GithubRepo,
        }
    }
}
