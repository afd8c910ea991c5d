//! Wire shapes of the model's JSON answers.
//!
//! The model is asked for exact camelCase keys but is loose about value types:
//! lists where a string was requested, scores as `"82%"`. The field
//! deserializers coerce those. A missing or null required key, or an
//! unreadable score, fails deserialization.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::analysis::models::{GithubRepositoryAnalysis, LinkedinAnalysis, ResumeAnalysis};

/// Feedback text. Lists are joined with `", "`, other scalars are printed.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Err(de::Error::custom("expected feedback text, found null")),
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")),
        other => Ok(other.to_string()),
    }
}

/// A 0-100 score sent as a number or a numeric string, `%` allowed.
fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| de::Error::custom(format!("unreadable score: {value}")))
}

/// Resume feedback scored against a job description.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeWire {
    #[serde(deserialize_with = "lenient_score")]
    score: f64,
    #[serde(deserialize_with = "lenient_text")]
    summary_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    skills_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    experience_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    education_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    project_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    job_role_suggestions: String,
    #[serde(deserialize_with = "lenient_text")]
    overall_suggestions: String,
}

/// Resume review with no job description; carries the overall write-up.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveResumeWire {
    #[serde(deserialize_with = "lenient_text")]
    comprehensive_analysis: String,
    #[serde(flatten)]
    feedback: ResumeWire,
}

impl From<ResumeWire> for ResumeAnalysis {
    fn from(w: ResumeWire) -> Self {
        ResumeAnalysis {
            score: w.score,
            comprehensive_analysis: None,
            summary_feedback: w.summary_feedback,
            skills_feedback: w.skills_feedback,
            experience_feedback: w.experience_feedback,
            education_feedback: w.education_feedback,
            project_feedback: w.project_feedback,
            job_role_suggestions: w.job_role_suggestions,
            overall_suggestions: w.overall_suggestions,
        }
    }
}

impl From<ComprehensiveResumeWire> for ResumeAnalysis {
    fn from(w: ComprehensiveResumeWire) -> Self {
        ResumeAnalysis {
            comprehensive_analysis: Some(w.comprehensive_analysis),
            ..w.feedback.into()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedinWire {
    #[serde(deserialize_with = "lenient_score")]
    profile_strength_score: f64,
    #[serde(deserialize_with = "lenient_text")]
    headline_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    summary_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    experience_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    skills_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    activity_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    keyword_suggestions: String,
    #[serde(deserialize_with = "lenient_text")]
    overall_suggestions: String,
}

impl From<LinkedinWire> for LinkedinAnalysis {
    fn from(w: LinkedinWire) -> Self {
        LinkedinAnalysis {
            profile_strength_score: w.profile_strength_score,
            headline_feedback: w.headline_feedback,
            summary_feedback: w.summary_feedback,
            experience_feedback: w.experience_feedback,
            skills_feedback: w.skills_feedback,
            activity_feedback: w.activity_feedback,
            keyword_suggestions: w.keyword_suggestions,
            overall_suggestions: w.overall_suggestions,
        }
    }
}

/// Narrative fields of a GitHub profile analysis; chart data is added by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNarrative {
    #[serde(deserialize_with = "lenient_text")]
    pub tech_stack: String,
    #[serde(deserialize_with = "lenient_text")]
    pub code_quality_insights: String,
    #[serde(deserialize_with = "lenient_text")]
    pub overall_suggestions: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryWire {
    #[serde(deserialize_with = "lenient_text")]
    purpose_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    documentation_quality_feedback: String,
    #[serde(deserialize_with = "lenient_text")]
    overall_suggestions: String,
}

impl From<RepositoryWire> for GithubRepositoryAnalysis {
    fn from(w: RepositoryWire) -> Self {
        GithubRepositoryAnalysis {
            purpose_feedback: w.purpose_feedback,
            documentation_quality_feedback: w.documentation_quality_feedback,
            overall_suggestions: w.overall_suggestions,
        }
    }
}
