//! Result Presenter: maps a typed result onto the fixed, ordered display
//! sections the dashboard renders. Pure; selects which optional sections are
//! present and nothing more.

use serde::{Deserialize, Serialize};

use crate::analysis::models::{
    AnalysisResult, ChartDatum, GithubProfileAnalysis, GithubRepositoryAnalysis,
    LinkedinAnalysis, ResumeAnalysis,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    ScoreGauge,
    Callout,
    Feedback,
    Chart,
}

/// Chart payload: the raw data plus mermaid source for the same data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub data: Vec<ChartDatum>,
    pub mermaid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: SectionKind,
    /// Markdown body. Empty for score gauges.
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartPayload>,
}

impl Section {
    fn feedback(key: &'static str, label: &'static str, body: &str) -> Self {
        Self::text(key, label, SectionKind::Feedback, body.to_string())
    }

    fn callout(key: &'static str, label: &'static str, body: String) -> Self {
        Self::text(key, label, SectionKind::Callout, body)
    }

    fn text(key: &'static str, label: &'static str, kind: SectionKind, body: String) -> Self {
        Self {
            key,
            label,
            kind,
            body,
            score: None,
            chart: None,
        }
    }

    fn gauge(key: &'static str, label: &'static str, score: f64) -> Self {
        Self {
            key,
            label,
            kind: SectionKind::ScoreGauge,
            body: String::new(),
            score: Some(score),
            chart: None,
        }
    }

    fn chart(key: &'static str, label: &'static str, data: &[ChartDatum], mermaid: &str) -> Self {
        Self {
            key,
            label,
            kind: SectionKind::Chart,
            body: String::new(),
            score: None,
            chart: Some(ChartPayload {
                data: data.to_vec(),
                mermaid: mermaid.to_string(),
            }),
        }
    }
}

pub fn present(result: &AnalysisResult) -> Vec<Section> {
    match result {
        AnalysisResult::Resume(r) => present_resume(r),
        AnalysisResult::Linkedin(r) => present_linkedin(r),
        AnalysisResult::GithubProfile(r) => present_github_profile(r),
        AnalysisResult::GithubRepo(r) => present_github_repository(r),
    }
}

fn present_resume(r: &ResumeAnalysis) -> Vec<Section> {
    let mut sections = Vec::with_capacity(9);
    if r.score > 0.0 {
        sections.push(Section::gauge("score", "ATS Score", r.score));
    }
    if let Some(text) = r.comprehensive_analysis.as_deref().filter(|t| !t.trim().is_empty()) {
        sections.push(Section::callout(
            "comprehensive_analysis",
            "Comprehensive Analysis",
            text.to_string(),
        ));
    }
    sections.extend([
        Section::feedback("summary", "Summary Feedback", &r.summary_feedback),
        Section::feedback("skills", "Skills Feedback", &r.skills_feedback),
        Section::feedback("experience", "Experience Feedback", &r.experience_feedback),
        Section::feedback("projects", "Project Feedback", &r.project_feedback),
        Section::feedback("education", "Education Feedback", &r.education_feedback),
        Section::callout(
            "job_roles",
            "Suggested Job Roles",
            r.job_role_suggestions.clone(),
        ),
        Section::callout(
            "overall_suggestions",
            "Overall Suggestions",
            format_markdown_list(&r.overall_suggestions),
        ),
    ]);
    sections
}

fn present_linkedin(r: &LinkedinAnalysis) -> Vec<Section> {
    let mut sections = Vec::with_capacity(8);
    if r.profile_strength_score > 0.0 {
        sections.push(Section::gauge(
            "score",
            "Profile Strength",
            r.profile_strength_score,
        ));
    }
    sections.extend([
        Section::feedback("headline", "Headline Feedback", &r.headline_feedback),
        Section::feedback("summary", "Summary Feedback", &r.summary_feedback),
        Section::feedback("experience", "Experience Feedback", &r.experience_feedback),
        Section::feedback("skills", "Skills Feedback", &r.skills_feedback),
        Section::feedback("activity", "Activity Feedback", &r.activity_feedback),
        Section::callout(
            "keywords",
            "Keyword Suggestions",
            r.keyword_suggestions.clone(),
        ),
        Section::callout(
            "overall_suggestions",
            "Overall Suggestions",
            format_markdown_list(&r.overall_suggestions),
        ),
    ]);
    sections
}

fn present_github_profile(r: &GithubProfileAnalysis) -> Vec<Section> {
    let mut sections = vec![
        Section::feedback("tech_stack", "Tech Stack", &r.tech_stack),
        Section::feedback("code_quality", "Code Quality", &r.code_quality_insights),
    ];
    if !r.language_distribution.is_empty() {
        sections.push(Section::chart(
            "language_distribution",
            "Language Distribution",
            &r.language_distribution,
            &r.language_distribution_chart,
        ));
    }
    if !r.repository_creation_activity.is_empty() {
        sections.push(Section::chart(
            "repository_activity",
            "Repository Activity",
            &r.repository_creation_activity,
            &r.repository_creation_activity_chart,
        ));
    }
    sections.push(Section::callout(
        "overall_suggestions",
        "Overall Suggestions",
        format_markdown_list(&r.overall_suggestions),
    ));
    sections
}

fn present_github_repository(r: &GithubRepositoryAnalysis) -> Vec<Section> {
    vec![
        Section::feedback("purpose", "Purpose", &r.purpose_feedback),
        Section::feedback(
            "documentation",
            "Documentation Quality",
            &r.documentation_quality_feedback,
        ),
        Section::callout(
            "overall_suggestions",
            "Overall Suggestions",
            format_markdown_list(&r.overall_suggestions),
        ),
    ]
}

/// Breaks inline numbered items (`1. a 2. b`) onto their own lines so they
/// render as a markdown list.
pub fn format_markdown_list(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() && (i == 0 || !chars[i - 1].is_ascii_digit()) {
            let mut j = i;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let is_item = j + 1 < chars.len() && chars[j] == '.' && chars[j + 1].is_whitespace();
            if is_item {
                out.push('\n');
            }
            out.extend(&chars[i..j]);
            i = j;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Renders sections as a standalone markdown report.
pub fn render_markdown(title: &str, sections: &[Section]) -> String {
    let mut md = format!("# {title}\n\n");
    for section in sections {
        md.push_str(&format!("## {}\n\n", section.label));
        match section.kind {
            SectionKind::ScoreGauge => {
                if let Some(score) = section.score {
                    md.push_str(&format!("**{score:.0} / 100**\n"));
                }
            }
            SectionKind::Chart => {
                if let Some(chart) = &section.chart {
                    md.push_str("```mermaid\n");
                    md.push_str(&chart.mermaid);
                    md.push_str("\n```\n");
                }
            }
            SectionKind::Callout | SectionKind::Feedback => {
                md.push_str(section.body.trim());
                md.push('\n');
            }
        }
        md.push('\n');
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume(score: f64, comprehensive: Option<&str>) -> AnalysisResult {
        AnalysisResult::Resume(ResumeAnalysis {
            score,
            comprehensive_analysis: comprehensive.map(String::from),
            summary_feedback: "Tighten the summary.".to_string(),
            skills_feedback: "Group skills.".to_string(),
            experience_feedback: "Quantify results.".to_string(),
            education_feedback: "Fine.".to_string(),
            project_feedback: "Link demos.".to_string(),
            job_role_suggestions: "Backend Engineer".to_string(),
            overall_suggestions: "1. Add metrics 2. Cut to one page".to_string(),
        })
    }

    fn count(sections: &[Section], kind: SectionKind) -> usize {
        sections.iter().filter(|s| s.kind == kind).count()
    }

    #[test]
    fn test_scored_resume_has_gauge_and_five_feedback_sections() {
        let sections = present(&resume(72.0, None));
        assert_eq!(sections[0].kind, SectionKind::ScoreGauge);
        assert_eq!(sections[0].score, Some(72.0));
        assert_eq!(count(&sections, SectionKind::Feedback), 5);
        let labels: Vec<_> = sections.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                "ATS Score",
                "Summary Feedback",
                "Skills Feedback",
                "Experience Feedback",
                "Project Feedback",
                "Education Feedback",
                "Suggested Job Roles",
                "Overall Suggestions",
            ]
        );
    }

    #[test]
    fn test_comprehensive_resume_has_no_gauge() {
        let sections = present(&resume(0.0, Some("Solid overall.")));
        assert_eq!(count(&sections, SectionKind::ScoreGauge), 0);
        assert_eq!(sections[0].key, "comprehensive_analysis");
    }

    #[test]
    fn test_github_profile_omits_empty_charts() {
        let result = AnalysisResult::GithubProfile(GithubProfileAnalysis {
            tech_stack: "Rust".to_string(),
            code_quality_insights: "Good".to_string(),
            language_distribution: vec![ChartDatum {
                name: "Rust".to_string(),
                value: 3,
            }],
            language_distribution_chart: "pie\n    \"Rust\" : 3".to_string(),
            repository_creation_activity: vec![],
            repository_creation_activity_chart: "pie\n    \"No activity data\" : 1".to_string(),
            overall_suggestions: "Pin repos".to_string(),
        });
        let sections = present(&result);
        assert_eq!(count(&sections, SectionKind::Chart), 1);
        assert_eq!(sections.last().unwrap().key, "overall_suggestions");
    }

    #[test]
    fn test_format_markdown_list() {
        assert_eq!(
            format_markdown_list("1. Add metrics 2. Cut to one page"),
            "\n1. Add metrics \n2. Cut to one page"
        );
        assert_eq!(format_markdown_list("Raised 2.5x revenue"), "Raised 2.5x revenue");
        assert_eq!(format_markdown_list("Top 10. Done"), "Top \n10. Done");
    }

    #[test]
    fn test_render_markdown_report() {
        let sections = present(&resume(72.0, None));
        let md = render_markdown("Resume Analysis", &sections);
        assert!(md.starts_with("# Resume Analysis\n\n## ATS Score\n\n**72 / 100**"));
        assert!(md.contains("## Skills Feedback\n\nGroup skills.\n"));
    }
}
