use anyhow::{bail, Context, Result};

use crate::{github, llm_client};

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SUBMISSION_TTL_SECS: u64 = 900;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    /// Optional token; unauthenticated GitHub calls are limited to 60/hour.
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub github_raw_url: String,
    pub max_upload_bytes: usize,
    /// Upper bound on how long a submission may hold its in-flight slot.
    pub submission_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            github_token: optional_env("GITHUB_TOKEN"),
            github_api_url: optional_env("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_raw_url: optional_env("GITHUB_RAW_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_RAW_URL.to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            submission_ttl_secs: check_submission_ttl(parse_env(
                "SUBMISSION_TTL_SECS",
                DEFAULT_SUBMISSION_TTL_SECS,
            )?)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// The slowest analysis: the GitHub lookups plus an LLM call that exhausts
/// its retries. A slot that expires before this can be claimed twice.
fn min_submission_ttl_secs() -> u64 {
    (llm_client::max_call_duration() + github::max_lookup_duration()).as_secs()
}

fn check_submission_ttl(ttl_secs: u64) -> Result<u64> {
    let min = min_submission_ttl_secs();
    if ttl_secs <= min {
        bail!("SUBMISSION_TTL_SECS must exceed the longest possible analysis ({min}s), got {ttl_secs}");
    }
    Ok(ttl_secs)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config for router and pipeline tests; nothing here is dialed.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/careerkit_test".to_string(),
            redis_url: "redis://localhost".to_string(),
            s3_bucket: "careerkit-test".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test".to_string(),
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_raw_url: DEFAULT_GITHUB_RAW_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            submission_ttl_secs: DEFAULT_SUBMISSION_TTL_SECS,
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}
