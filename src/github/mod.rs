//! GitHub access: the listing and pull request capabilities the sync pipeline consumes.

pub mod client;
pub mod link;
pub mod models;

pub use client::GitHubClient;
pub use link::{LinkPagination, next_page_from_link, parse_link_header};
pub use models::{Issue, Label, PullRequest, PullRequestLinks, User};

use anyhow::Result;

use crate::StateFilter;
use crate::utils::config::GitHubConsts;

/// Query for `GET /repos/{owner}/{repo}/issues`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssueListOptions {
    pub direction: &'static str,
    pub sort: &'static str,
    pub state: StateFilter,
    pub page: u64,
    pub per_page: u64,
}

impl IssueListOptions {
    /// Ascending by creation date so repeated runs move forward. Always asks for the API maximum per page.
    pub fn created_asc(state: StateFilter, page: u64) -> Self {
        Self {
            direction: "asc",
            sort: "created",
            state,
            page,
            per_page: GitHubConsts::MAX_PER_PAGE,
        }
    }
}

/// One page of issue-shaped records. `next_page` is 0 once the listing is exhausted.
#[derive(Clone, Debug, Default)]
pub struct IssuePage {
    pub issues: Vec<Issue>,
    pub next_page: u64,
}

/// Read access to a repository's issues and pull requests. Shared by the coordinator and all fetch workers.
pub trait IssueSource: Send + Sync {
    fn list_issues(&self, user: &str, repo: &str, opts: &IssueListOptions) -> Result<IssuePage>;

    fn get_pull_request(&self, user: &str, repo: &str, number: u64) -> Result<PullRequest>;
}
