//! Submission checks that run before any extraction or network call.

use crate::analysis::models::Submission;
use crate::errors::AppError;
use crate::github::{is_valid_username, parse_repository_url};

/// Minimum length of a job description, in characters after trimming.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;

/// Treats a blank job description as absent.
pub fn normalize_job_description(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Validates the user-entered fields of a submission. Returns the submission
/// with blank optional fields dropped and text fields trimmed.
pub fn validate_submission(
    submission: Submission,
    max_upload_bytes: usize,
) -> Result<Submission, AppError> {
    match submission {
        Submission::Resume {
            document,
            job_description,
        } => {
            check_document_size(document.len(), max_upload_bytes)?;
            let job_description = normalize_job_description(job_description);
            if let Some(jd) = &job_description {
                let chars = jd.chars().count();
                if chars < MIN_JOB_DESCRIPTION_CHARS {
                    return Err(AppError::Validation(format!(
                        "Job description must be at least {MIN_JOB_DESCRIPTION_CHARS} characters (got {chars})."
                    )));
                }
            }
            Ok(Submission::Resume {
                document,
                job_description,
            })
        }
        Submission::Linkedin { document } => {
            check_document_size(document.len(), max_upload_bytes)?;
            Ok(Submission::Linkedin { document })
        }
        Submission::GithubProfile { username } => {
            let username = username.trim().trim_start_matches('@').to_string();
            if username.is_empty() {
                return Err(AppError::Validation(
                    "GitHub username is required.".to_string(),
                ));
            }
            if !is_valid_username(&username) {
                return Err(AppError::Validation(format!(
                    "'{username}' is not a valid GitHub username."
                )));
            }
            Ok(Submission::GithubProfile { username })
        }
        Submission::GithubRepository { repository_url } => {
            let repository_url = repository_url.trim().to_string();
            if parse_repository_url(&repository_url).is_none() {
                return Err(AppError::Validation(
                    "Please enter a valid GitHub repository URL.".to_string(),
                ));
            }
            Ok(Submission::GithubRepository { repository_url })
        }
    }
}

fn check_document_size(len: usize, max: usize) -> Result<(), AppError> {
    if len > max {
        return Err(AppError::Validation(format!(
            "Uploaded file is {len} bytes; the limit is {max} bytes."
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    const LIMIT: usize = 1024;

    fn resume(jd: Option<&str>) -> Submission {
        Submission::Resume {
            document: Bytes::from_static(b"%PDF-1.5"),
            job_description: jd.map(String::from),
        }
    }

    #[test]
    fn test_short_job_description_rejected() {
        let err = validate_submission(resume(Some("Rust engineer wanted")), LIMIT).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_job_description_at_minimum_accepted() {
        let jd = "x".repeat(MIN_JOB_DESCRIPTION_CHARS);
        let ok = validate_submission(resume(Some(&jd)), LIMIT).unwrap();
        match ok {
            Submission::Resume {
                job_description, ..
            } => assert_eq!(job_description.as_deref(), Some(jd.as_str())),
            other => panic!("unexpected submission {other:?}"),
        }
    }

    #[test]
    fn test_blank_job_description_means_comprehensive() {
        let ok = validate_submission(resume(Some("   \n ")), LIMIT).unwrap();
        match ok {
            Submission::Resume {
                job_description, ..
            } => assert!(job_description.is_none()),
            other => panic!("unexpected submission {other:?}"),
        }
    }

    #[test]
    fn test_oversized_document_rejected() {
        let submission = Submission::Linkedin {
            document: Bytes::from(vec![0u8; LIMIT + 1]),
        };
        assert!(matches!(
            validate_submission(submission, LIMIT),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_username_trimmed_and_at_sign_dropped() {
        let ok = validate_submission(
            Submission::GithubProfile {
                username: "  @octocat ".to_string(),
            },
            LIMIT,
        )
        .unwrap();
        match ok {
            Submission::GithubProfile { username } => assert_eq!(username, "octocat"),
            other => panic!("unexpected submission {other:?}"),
        }
    }

    #[test]
    fn test_invalid_repository_url_rejected() {
        let err = validate_submission(
            Submission::GithubRepository {
                repository_url: "https://example.com/foo/bar".to_string(),
            },
            LIMIT,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
