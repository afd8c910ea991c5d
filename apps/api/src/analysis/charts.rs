//! Chart data for the GitHub profile analysis, computed from the repository
//! listing rather than asked of the model.

use std::collections::{BTreeMap, HashMap};

use crate::analysis::models::ChartDatum;
use crate::github::GithubRepo;

const TOP_LANGUAGES: usize = 5;
const ACTIVITY_YEARS: usize = 5;
const NO_LANGUAGES: &str = "No languages detected";
const NO_ACTIVITY: &str = "No activity data";

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCharts {
    pub language_distribution: Vec<ChartDatum>,
    pub language_distribution_chart: String,
    pub repository_creation_activity: Vec<ChartDatum>,
    pub repository_creation_activity_chart: String,
}

/// Top languages by repository count, most used first; ties broken by name.
pub fn language_distribution(repos: &[GithubRepo]) -> Vec<ChartDatum> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for language in repos.iter().filter_map(|r| r.language.as_deref()) {
        let clean = language.replace(['"', '\''], "");
        *counts.entry(clean).or_default() += 1;
    }
    let mut data: Vec<ChartDatum> = counts
        .into_iter()
        .map(|(name, value)| ChartDatum { name, value })
        .collect();
    data.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    data.truncate(TOP_LANGUAGES);
    data
}

/// Repositories created per year for the most recent active years, oldest first.
pub fn creation_activity(repos: &[GithubRepo]) -> Vec<ChartDatum> {
    let mut per_year: BTreeMap<String, u32> = BTreeMap::new();
    for repo in repos {
        let year: String = repo.created_at.chars().take(4).collect();
        if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
            *per_year.entry(year).or_default() += 1;
        }
    }
    let skip = per_year.len().saturating_sub(ACTIVITY_YEARS);
    per_year
        .into_iter()
        .skip(skip)
        .map(|(name, value)| ChartDatum { name, value })
        .collect()
}

/// Renders chart data as mermaid pie source. Empty data renders a single
/// placeholder slice so the chart still draws.
pub fn mermaid_pie(data: &[ChartDatum], placeholder: &str) -> String {
    let mut chart = String::from("pie");
    if data.is_empty() {
        chart.push_str(&format!("\n    \"{placeholder}\" : 1"));
    }
    for datum in data {
        chart.push_str(&format!("\n    \"{}\" : {}", datum.name, datum.value));
    }
    chart
}

pub fn profile_charts(repos: &[GithubRepo]) -> ProfileCharts {
    let language_distribution = language_distribution(repos);
    let repository_creation_activity = creation_activity(repos);
    ProfileCharts {
        language_distribution_chart: mermaid_pie(&language_distribution, NO_LANGUAGES),
        repository_creation_activity_chart: mermaid_pie(&repository_creation_activity, NO_ACTIVITY),
        language_distribution,
        repository_creation_activity,
    }
}

#[cfg(test)]
pub(crate) fn repo(name: &str, language: Option<&str>, created_at: &str) -> GithubRepo {
    GithubRepo {
        name: name.to_string(),
        description: None,
        language: language.map(String::from),
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        stars: 0,
        forks: 0,
    }
}
