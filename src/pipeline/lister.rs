//! Page lister: walks a repository's issue listing page by page, oldest first.

use anyhow::{Context, Result};
use log::{info, warn};
use std::thread;
use std::time::Duration;

use crate::github::{Issue, IssueListOptions, IssuePage, IssueSource};
use crate::{Repository, StateFilter};

/// First page to request when resuming from `from`. Resumption is page-granular: items
/// before `from` on that page are delivered again.
pub fn first_page(from: u64, per_page: u64) -> u64 {
    from / per_page + 1
}

/// One listed page.
#[derive(Debug)]
pub struct ListedPage {
    pub page: u64,
    pub issues: Vec<Issue>,
}

/// Lazy sequence of pages. Yields at most one error, after which it is exhausted.
pub struct PageLister<'a> {
    source: &'a dyn IssueSource,
    repo: &'a Repository,
    state: StateFilter,
    sleep_per_page: Duration,
    /// Next page to request; 0 once done.
    page: u64,
    /// A page was delivered, sleep before requesting the next one.
    pause_pending: bool,
    count: usize,
}

impl<'a> PageLister<'a> {
    pub fn new(
        source: &'a dyn IssueSource,
        repo: &'a Repository,
        from: u64,
        per_page: u64,
        state: StateFilter,
        sleep_per_page: Duration,
    ) -> Self {
        Self {
            source,
            repo,
            state,
            sleep_per_page,
            page: first_page(from, per_page),
            pause_pending: false,
            count: 0,
        }
    }

    /// Records yielded so far.
    pub fn listed(&self) -> usize {
        self.count
    }
}

impl Iterator for PageLister<'_> {
    type Item = Result<ListedPage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.page == 0 {
            return None;
        }
        if self.pause_pending && !self.sleep_per_page.is_zero() {
            thread::sleep(self.sleep_per_page);
        }
        self.pause_pending = false;

        let page = self.page;
        let opts = IssueListOptions::created_asc(self.state, page);
        let result = self
            .source
            .list_issues(&self.repo.user, &self.repo.repo, &opts)
            .with_context(|| format!("list page {} of {}", page, self.repo.pretty_name()));

        let IssuePage { issues, next_page } = match result {
            Ok(p) => p,
            Err(e) => {
                self.page = 0;
                return Some(Err(e));
            }
        };

        self.count += issues.len();
        info!(
            "retrieved {} items for {} (page {})",
            self.count,
            self.repo.pretty_name(),
            page
        );

        self.page = if next_page != 0 && next_page <= page {
            warn!(
                "{}: next page {} does not advance past {}; stopping",
                self.repo.pretty_name(),
                next_page,
                page
            );
            0
        } else {
            next_page
        };
        self.pause_pending = true;
        Some(Ok(ListedPage { page, issues }))
    }
}
