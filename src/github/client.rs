//! Blocking GitHub REST client implementing [`IssueSource`].

use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::Deserialize;
use std::time::Duration;

use super::link::next_page_from_link;
use super::models::{Issue, PullRequest};
use super::{IssueListOptions, IssuePage, IssueSource};
use crate::utils::config::GitHubConsts;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct GitHubClient {
    http: Client,
    api_url: String,
}

impl GitHubClient {
    /// Build a client against `api_url` (e.g. `https://api.github.com` or a GitHub Enterprise `/api/v3` root).
    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GitHubConsts::ACCEPT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GitHubConsts::API_VERSION),
        );
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .context("token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let http = Client::builder()
            .user_agent(GitHubConsts::USER_AGENT)
            .timeout(Duration::from_secs(GitHubConsts::REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn get(&self, route: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{}", self.api_url, route);
        debug!("GET {} {:?}", url, query);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .with_context(|| format!("GET {url}"))?;
        check_status(response, &url)
    }
}

/// Turn a non-success response into an error carrying the status, GitHub's message and the rate limit reset.
fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let rate_limited = matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");
    let reset = response
        .headers()
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let message = response
        .json::<ErrorBody>()
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_default();
    if rate_limited {
        return Err(anyhow!(
            "GET {url}: rate limit exceeded (resets at {}): {message}",
            reset.as_deref().unwrap_or("unknown")
        ));
    }
    Err(anyhow!("GET {url}: {status}: {message}"))
}

impl IssueSource for GitHubClient {
    fn list_issues(&self, user: &str, repo: &str, opts: &IssueListOptions) -> Result<IssuePage> {
        let route = format!("/repos/{user}/{repo}/issues");
        let query = [
            ("direction", opts.direction.to_string()),
            ("sort", opts.sort.to_string()),
            ("state", opts.state.to_string()),
            ("page", opts.page.to_string()),
            ("per_page", opts.per_page.to_string()),
        ];
        let response = self.get(&route, &query)?;
        let next_page = next_page_from_link(
            response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok()),
        );
        let issues: Vec<Issue> = response
            .json()
            .with_context(|| format!("decode issues page {} of {user}/{repo}", opts.page))?;
        Ok(IssuePage { issues, next_page })
    }

    fn get_pull_request(&self, user: &str, repo: &str, number: u64) -> Result<PullRequest> {
        let route = format!("/repos/{user}/{repo}/pulls/{number}");
        self.get(&route, &[])?
            .json()
            .with_context(|| format!("decode pull request {user}/{repo}#{number}"))
    }
}
