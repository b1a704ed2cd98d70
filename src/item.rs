//! Indexable items: classification of issue-shaped records and the two stored shapes.

use serde::Serialize;

use crate::ItemKind;
use crate::github::{Issue, PullRequest};

/// A record is a pull request iff it carries a non-empty back-reference to pull request links.
pub fn classify(issue: &Issue) -> ItemKind {
    match &issue.pull_request {
        Some(links) if !links.is_empty() => ItemKind::PullRequest,
        _ => ItemKind::Issue,
    }
}

/// Pull request populated with the fields only the issue view carries (labels).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MergedPullRequest(PullRequest);

impl MergedPullRequest {
    /// Merge `pr` with its originating issue. Without an issue, keeps the pull-request-only shape.
    pub fn new(mut pr: PullRequest, issue: Option<&Issue>) -> Self {
        if let Some(issue) = issue {
            pr.labels = issue.labels.clone();
        }
        Self(pr)
    }

    pub fn pull_request(&self) -> &PullRequest {
        &self.0
    }

    pub fn into_inner(self) -> PullRequest {
        self.0
    }
}

/// Item queued for persistence.
#[derive(Clone, Debug, PartialEq)]
pub enum IndexedItem {
    /// Issue-shaped record stored unchanged.
    ///
    /// Also carries a pull request whose fetch failed. That record is stored under the
    /// `pull_request` kind with the issue shape, so consumers may find `pull_request`
    /// documents without pull-request-only fields until a later run enriches them.
    Issue(Issue),
    /// Pull request enriched from its issue view.
    PullRequest(MergedPullRequest),
}

/// Serializable view of an item's payload.
#[derive(Serialize)]
#[serde(untagged)]
pub enum Payload<'a> {
    Issue(&'a Issue),
    PullRequest(&'a MergedPullRequest),
}

impl IndexedItem {
    /// Issue or pull request number, as a string.
    pub fn id(&self) -> String {
        match self {
            IndexedItem::Issue(issue) => issue.number.to_string(),
            IndexedItem::PullRequest(pr) => pr.pull_request().number.to_string(),
        }
    }

    /// An unenriched pull request keeps the `pull_request` kind so a later enriched write
    /// lands on the same document.
    pub fn kind(&self) -> ItemKind {
        match self {
            IndexedItem::Issue(issue) => classify(issue),
            IndexedItem::PullRequest(_) => ItemKind::PullRequest,
        }
    }

    pub fn payload(&self) -> Payload<'_> {
        match self {
            IndexedItem::Issue(issue) => Payload::Issue(issue),
            IndexedItem::PullRequest(pr) => Payload::PullRequest(pr),
        }
    }

    /// Serialize the payload to JSON bytes.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.payload())
    }
}

impl From<Issue> for IndexedItem {
    fn from(issue: Issue) -> Self {
        IndexedItem::Issue(issue)
    }
}

impl From<MergedPullRequest> for IndexedItem {
    fn from(pr: MergedPullRequest) -> Self {
        IndexedItem::PullRequest(pr)
    }
}
