//! Read-only client for the public GitHub API.
//!
//! Used for the profile card shown next to a GitHub analysis, the repository
//! listing that feeds the profile prompt and charts, and README lookups for
//! repository analysis. Every call here may fail independently of the LLM.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

#[cfg(test)]
pub(crate) mod fake;

const USER_AGENT: &str = concat!("careerkit-api/", env!("CARGO_PKG_VERSION"));
const README_NAMES: [&str; 4] = ["README.md", "readme.md", "README", "readme"];
const README_BRANCHES: [&str; 2] = ["main", "master"];
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Placeholder handed to the model when a repository carries no README.
pub const MISSING_README: &str = "No README file found in the repository.";

/// Longest the GitHub side of one analysis can take: a README lookup that
/// times out on every name and branch.
pub fn max_lookup_duration() -> Duration {
    REQUEST_TIMEOUT * (README_NAMES.len() * README_BRANCHES.len()) as u32
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("GitHub user '{0}' not found")]
    NotFound(String),

    #[error("GitHub API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("GitHub API returned status {0}")]
    Status(u16),

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Public profile summary rendered as the stats card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubProfile {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
}

/// The subset of a repository listing entry the profile analysis uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubRepo {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(rename(deserialize = "stargazers_count"))]
    pub stars: u32,
    #[serde(rename(deserialize = "forks_count"))]
    pub forks: u32,
}

/// Owner and name parsed out of a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub owner: String,
    pub repo: String,
}

/// Profile card lookup. Carried in `AppState` as `Arc<dyn ProfileLookup>`.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn profile(&self, username: &str) -> Result<GithubProfile, LookupError>;
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    raw_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &Config) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            raw_url: config.github_raw_url.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
        })
    }

    fn api_get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .header("Accept", "application/vnd.github.v3+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Lists a user's public repositories (first 100).
    pub async fn list_repos(&self, username: &str) -> Result<Vec<GithubRepo>, LookupError> {
        info!("Fetching GitHub repos for user: {username}");
        let response = self
            .api_get(&format!("/users/{username}/repos?per_page=100&sort=updated"))
            .send()
            .await?;
        let response = check_status(response, username).await?;
        let repos: Vec<GithubRepo> = response.json().await?;
        info!("Fetched {} repositories for {username}", repos.len());
        Ok(repos)
    }

    /// Fetches the README of a repository, trying the usual file names on
    /// `main` then `master`. Returns `None` when no variant exists.
    pub async fn fetch_readme(&self, coords: &RepoCoordinates) -> Option<String> {
        for name in README_NAMES {
            for branch in README_BRANCHES {
                let url = format!(
                    "{}/{}/{}/{}/{}",
                    self.raw_url, coords.owner, coords.repo, branch, name
                );
                match self.client.get(&url).send().await {
                    Ok(r) if r.status().is_success() => match r.text().await {
                        Ok(body) => {
                            info!("Found README: {name} on {branch}");
                            return Some(body);
                        }
                        Err(e) => warn!("Failed to read README body from {url}: {e}"),
                    },
                    Ok(r) => debug!("README probe {url} returned {}", r.status()),
                    Err(e) => warn!("README probe {url} failed: {e}"),
                }
            }
        }
        info!(
            "No README file found for {}/{}",
            coords.owner, coords.repo
        );
        None
    }
}

#[async_trait]
impl ProfileLookup for GithubClient {
    async fn profile(&self, username: &str) -> Result<GithubProfile, LookupError> {
        let response = self.api_get(&format!("/users/{username}")).send().await?;
        let response = check_status(response, username).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(
    response: reqwest::Response,
    username: &str,
) -> Result<reqwest::Response, LookupError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(LookupError::NotFound(username.to_string()));
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LookupError::RateLimited);
    }
    if status == StatusCode::FORBIDDEN {
        let body = response.text().await.unwrap_or_default();
        if body.to_lowercase().contains("rate limit") {
            warn!("GitHub API rate limit reached");
            return Err(LookupError::RateLimited);
        }
    }
    Err(LookupError::Status(status.as_u16()))
}

/// Parses `https://github.com/{owner}/{repo}[.git][/...]`.
/// Returns `None` for anything that is not a github.com repository URL.
pub fn parse_repository_url(raw: &str) -> Option<RepoCoordinates> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    if host != "github.com" && host != "www.github.com" {
        return None;
    }
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?.to_string();
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo).to_string();
    if repo.is_empty() {
        return None;
    }
    Some(RepoCoordinates { owner, repo })
}

/// GitHub usernames: 1-39 alphanumerics or single hyphens, no leading or
/// trailing hyphen.
pub fn is_valid_username(username: &str) -> bool {
    let len = username.len();
    (1..=39).contains(&len)
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !username.starts_with('-')
        && !username.ends_with('-')
        && !username.contains("--")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_lookup_maps_statuses() {
        let github = fake::spawn().await;

        let profile = github.profile("octocat").await.unwrap();
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.public_repos, 2);

        assert!(matches!(
            github.profile("ghost").await,
            Err(LookupError::NotFound(name)) if name == "ghost"
        ));
        assert!(matches!(
            github.profile("limited").await,
            Err(LookupError::RateLimited)
        ));
        assert!(matches!(
            github.profile("throttled").await,
            Err(LookupError::RateLimited)
        ));
        assert!(matches!(
            github.profile("forbidden").await,
            Err(LookupError::Status(403))
        ));
        assert!(matches!(
            github.profile("broken").await,
            Err(LookupError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_list_repos() {
        let github = fake::spawn().await;

        let repos = github.list_repos("octocat").await.unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name, "hello-world");
        assert_eq!(repos[0].stars, 12);
        assert!(repos[1].language.is_none());

        assert!(matches!(
            github.list_repos("ghost").await,
            Err(LookupError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_readme_falls_back_to_master() {
        let github = fake::spawn().await;
        let book = RepoCoordinates {
            owner: "rust-lang".to_string(),
            repo: "book".to_string(),
        };
        assert_eq!(
            github.fetch_readme(&book).await.as_deref(),
            Some(fake::BOOK_README)
        );

        let empty = RepoCoordinates {
            owner: "octocat".to_string(),
            repo: "empty".to_string(),
        };
        assert!(github.fetch_readme(&empty).await.is_none());
    }

    #[test]
    fn test_max_lookup_duration_covers_every_readme_probe() {
        assert_eq!(max_lookup_duration(), Duration::from_secs(80));
    }

    #[test]
    fn test_parse_repository_url_plain() {
        let coords = parse_repository_url("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(coords.owner, "rust-lang");
        assert_eq!(coords.repo, "rust");
    }

    #[test]
    fn test_parse_repository_url_git_suffix_and_trailing_path() {
        let coords = parse_repository_url("https://github.com/tokio-rs/axum.git").unwrap();
        assert_eq!(coords.repo, "axum");
        let coords = parse_repository_url("https://github.com/tokio-rs/axum/tree/main/").unwrap();
        assert_eq!(coords.owner, "tokio-rs");
        assert_eq!(coords.repo, "axum");
    }

    #[test]
    fn test_parse_repository_url_rejects_other_hosts() {
        assert!(parse_repository_url("https://gitlab.com/foo/bar").is_none());
        assert!(parse_repository_url("https://github.com/only-owner").is_none());
        assert!(parse_repository_url("ftp://github.com/foo/bar").is_none());
        assert!(parse_repository_url("not a url").is_none());
    }

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("octocat"));
        assert!(is_valid_username("nonexistent-user-xyz"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("-leading"));
        assert!(!is_valid_username("trailing-"));
        assert!(!is_valid_username("double--hyphen"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"a".repeat(40)));
    }

    #[test]
    fn test_repo_listing_deserializes_counts() {
        let json = r#"{
            "name": "dotfiles",
            "description": null,
            "language": "Shell",
            "created_at": "2021-03-04T10:00:00Z",
            "updated_at": "2024-01-01T10:00:00Z",
            "stargazers_count": 3,
            "forks_count": 1,
            "private": false
        }"#;
        let repo: GithubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.stars, 3);
        assert_eq!(repo.forks, 1);
        assert_eq!(repo.language.as_deref(), Some("Shell"));
    }
}
