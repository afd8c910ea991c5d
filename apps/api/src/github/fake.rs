//! A local stand-in for the GitHub API and raw content host, served on an
//! ephemeral port.
//!
//! Users: `octocat` exists with two repositories; `limited` answers 429;
//! `throttled` answers 403 with a rate-limit body; `forbidden` answers a
//! plain 403; `broken` answers 500; everyone else is 404. The only README
//! is `rust-lang/book` on `master`.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::GithubClient;
use crate::config::Config;

pub const BOOK_README: &str = "# The Rust Programming Language\n\nThe book.";

fn canned_status(username: &str) -> Option<Response> {
    let response = match username {
        "limited" => StatusCode::TOO_MANY_REQUESTS.into_response(),
        "throttled" => (
            StatusCode::FORBIDDEN,
            r#"{"message":"API rate limit exceeded for 203.0.113.7."}"#,
        )
            .into_response(),
        "forbidden" => (StatusCode::FORBIDDEN, "Resource not accessible").into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "octocat" => return None,
        _ => StatusCode::NOT_FOUND.into_response(),
    };
    Some(response)
}

async fn user(Path(username): Path<String>) -> Response {
    if let Some(response) = canned_status(&username) {
        return response;
    }
    Json(json!({
        "login": "octocat",
        "name": "The Octocat",
        "avatar_url": "https://avatars.githubusercontent.com/u/583231",
        "public_repos": 2,
        "followers": 100,
        "following": 9
    }))
    .into_response()
}

async fn user_repos(Path(username): Path<String>) -> Response {
    if let Some(response) = canned_status(&username) {
        return response;
    }
    Json(json!([
        {
            "name": "hello-world",
            "description": "My first repository",
            "language": "Rust",
            "created_at": "2021-03-04T10:00:00Z",
            "updated_at": "2024-01-01T10:00:00Z",
            "stargazers_count": 12,
            "forks_count": 3
        },
        {
            "name": "dotfiles",
            "description": null,
            "language": null,
            "created_at": "2023-06-01T10:00:00Z",
            "updated_at": "2024-02-01T10:00:00Z",
            "stargazers_count": 0,
            "forks_count": 0
        }
    ]))
    .into_response()
}

fn router() -> Router {
    Router::new()
        .route("/users/:username", get(user))
        .route("/users/:username/repos", get(user_repos))
        .route(
            "/rust-lang/book/master/README.md",
            get(|| async { BOOK_README }),
        )
}

/// Starts the server and returns a client pointed at it for both the API and
/// raw content.
pub async fn spawn() -> GithubClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });

    let config = Config {
        github_api_url: base.clone(),
        github_raw_url: base,
        ..Config::for_tests()
    };
    GithubClient::new(&config).unwrap()
}
