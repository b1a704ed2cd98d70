use issuesync::engine::{Cli, resolve_settings};
use issuesync::github::{
    Issue, Label, PullRequest, PullRequestLinks, next_page_from_link, parse_link_header,
};
use issuesync::pipeline::first_page;
use issuesync::utils::logger::format_line;
use issuesync::utils::{SyncToml, apply_file_to_settings, setup_logging};
use issuesync::{
    Blob, IndexedItem, ItemKind, MergedPullRequest, Repository, RunSettings, StateFilter,
    StorageMode, SyncOptions, classify,
};
use clap::Parser;
use log::Level;
use serde_json::json;
use std::time::Duration;

fn issue(number: u64) -> Issue {
    Issue {
        number,
        title: format!("issue {number}"),
        state: "open".to_string(),
        ..Default::default()
    }
}

fn pr_links(number: u64) -> PullRequestLinks {
    PullRequestLinks {
        url: Some(format!(
            "https://api.github.com/repos/acme/widgets/pulls/{number}"
        )),
        ..Default::default()
    }
}

// --- classify ---

#[test]
fn test_classify_plain_issue() {
    assert_eq!(classify(&issue(1)), ItemKind::Issue);
}

#[test]
fn test_classify_pull_request() {
    let mut i = issue(2);
    i.pull_request = Some(pr_links(2));
    assert_eq!(classify(&i), ItemKind::PullRequest);
}

#[test]
fn test_classify_empty_back_reference_is_issue() {
    let mut i = issue(3);
    i.pull_request = Some(PullRequestLinks::default());
    assert_eq!(classify(&i), ItemKind::Issue);

    i.pull_request = Some(PullRequestLinks {
        url: Some(String::new()),
        ..Default::default()
    });
    assert_eq!(classify(&i), ItemKind::Issue);
}

#[test]
fn test_classify_from_api_json() {
    let plain: Issue = serde_json::from_value(json!({"number": 7, "title": "t"})).unwrap();
    assert_eq!(classify(&plain), ItemKind::Issue);

    let pr: Issue = serde_json::from_value(json!({
        "number": 8,
        "title": "t",
        "pull_request": {"url": "https://api.github.com/repos/a/b/pulls/8"}
    }))
    .unwrap();
    assert_eq!(classify(&pr), ItemKind::PullRequest);
}

// --- merge ---

#[test]
fn test_merge_copies_issue_labels() {
    let mut i = issue(5);
    i.pull_request = Some(pr_links(5));
    i.labels = vec![Label::named("bug"), Label::named("area/api")];
    let pr = PullRequest {
        number: 5,
        additions: Some(10),
        ..Default::default()
    };

    let merged = MergedPullRequest::new(pr, Some(&i));
    assert_eq!(merged.pull_request().labels, i.labels);
    assert_eq!(merged.pull_request().additions, Some(10));
}

#[test]
fn test_merge_without_issue_keeps_pull_request_shape() {
    let pr = PullRequest {
        number: 5,
        deletions: Some(3),
        ..Default::default()
    };
    let merged = MergedPullRequest::new(pr.clone(), None);
    assert_eq!(merged.into_inner(), pr);
}

// --- IndexedItem ---

#[test]
fn test_indexed_item_identity_and_kind() {
    let plain = IndexedItem::from(issue(12));
    assert_eq!(plain.id(), "12");
    assert_eq!(plain.kind(), ItemKind::Issue);

    let merged = IndexedItem::from(MergedPullRequest::new(
        PullRequest {
            number: 13,
            ..Default::default()
        },
        None,
    ));
    assert_eq!(merged.id(), "13");
    assert_eq!(merged.kind(), ItemKind::PullRequest);
}

#[test]
fn test_unenriched_pull_request_keeps_pull_request_kind() {
    let mut i = issue(14);
    i.pull_request = Some(pr_links(14));
    assert_eq!(IndexedItem::Issue(i).kind(), ItemKind::PullRequest);
}

#[test]
fn test_payload_keeps_unknown_fields() {
    let i: Issue = serde_json::from_value(json!({
        "number": 9,
        "title": "t",
        "comments": 4,
        "milestone": {"title": "v1"}
    }))
    .unwrap();
    let bytes = IndexedItem::Issue(i).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["comments"], 4);
    assert_eq!(value["milestone"]["title"], "v1");
    assert_eq!(value["number"], 9);
}

// --- first_page (resumption math) ---

#[test]
fn test_first_page() {
    assert_eq!(first_page(250, 100), 3);
    assert_eq!(first_page(0, 100), 1);
    assert_eq!(first_page(1, 100), 1);
    assert_eq!(first_page(99, 100), 1);
    assert_eq!(first_page(100, 100), 2);
    assert_eq!(first_page(250, 50), 6);
}

// --- Link header ---

#[test]
fn test_parse_link_header_next_and_last() {
    let header = r#"<https://api.github.com/repositories/1/issues?direction=asc&per_page=100&page=3>; rel="next", <https://api.github.com/repositories/1/issues?direction=asc&per_page=100&page=9>; rel="last""#;
    let info = parse_link_header(header);
    assert_eq!(info.next_page, Some(3));
    assert_eq!(info.last_page, Some(9));
}

#[test]
fn test_parse_link_header_last_page_has_no_next() {
    let header = r#"<https://api.github.com/repositories/1/issues?page=1>; rel="first", <https://api.github.com/repositories/1/issues?page=8>; rel="prev""#;
    assert_eq!(parse_link_header(header).next_page, None);
    assert_eq!(next_page_from_link(Some(header)), 0);
}

#[test]
fn test_next_page_from_missing_header() {
    assert_eq!(next_page_from_link(None), 0);
    assert_eq!(next_page_from_link(Some("")), 0);
}

// --- Blob ---

#[test]
fn test_blob_from_object_payload() {
    let payload = br#"{"number": 4, "title": "t", "updated_at": "2024-03-01T12:00:00Z"}"#;
    let blob = Blob::from_payload(ItemKind::Issue, "4", payload).unwrap();
    assert_eq!(blob.kind, ItemKind::Issue);
    assert_eq!(blob.id, "4");
    assert_eq!(blob.data["title"], "t");
    assert_eq!(blob.timestamp.to_rfc3339(), "2024-03-01T12:00:00+00:00");
}

#[test]
fn test_blob_rejects_non_object_payload() {
    assert!(Blob::from_payload(ItemKind::Issue, "1", b"[1, 2]").is_err());
    assert!(Blob::from_payload(ItemKind::Issue, "1", b"not json").is_err());
}

// --- Repository / filters ---

#[test]
fn test_repository_from_str() {
    let r: Repository = "acme/widgets".parse().unwrap();
    assert_eq!(r.user, "acme");
    assert_eq!(r.repo, "widgets");
    assert_eq!(r.pretty_name(), "acme/widgets");
    assert!("acme".parse::<Repository>().is_err());
    assert!("acme/".parse::<Repository>().is_err());
    assert!("a/b/c".parse::<Repository>().is_err());
}

#[test]
fn test_state_filter_and_storage_mode_parse() {
    assert_eq!("all".parse::<StateFilter>().unwrap(), StateFilter::All);
    assert_eq!("Closed".parse::<StateFilter>().unwrap(), StateFilter::Closed);
    assert!("merged".parse::<StateFilter>().is_err());
    assert_eq!("live".parse::<StorageMode>().unwrap(), StorageMode::Live);
    assert_eq!(StateFilter::Open.to_string(), "open");
}

// --- SyncOptions ---

#[test]
fn test_default_options() {
    let opts = SyncOptions::default();
    assert_eq!(opts, SyncOptions::DEFAULT);
    assert_eq!(opts.num_fetch_procs, 20);
    assert_eq!(opts.num_index_procs, 5);
    assert_eq!(opts.per_page, 100);
    assert_eq!(opts.state, StateFilter::Open);
    assert_eq!(opts.storage, StorageMode::Snapshot);
    assert!(opts.validate().is_ok());
}

#[test]
fn test_options_validate_rejects_zero() {
    let zero_fetch = SyncOptions {
        num_fetch_procs: 0,
        ..SyncOptions::DEFAULT
    };
    let zero_index = SyncOptions {
        num_index_procs: 0,
        ..SyncOptions::DEFAULT
    };
    let zero_page = SyncOptions {
        per_page: 0,
        ..SyncOptions::DEFAULT
    };
    assert!(zero_fetch.validate().is_err());
    assert!(zero_index.validate().is_err());
    assert!(zero_page.validate().is_err());
}

#[test]
fn test_effective_from() {
    let repo = Repository::new("acme", "widgets").with_start_index(500);
    assert_eq!(SyncOptions::DEFAULT.effective_from(&repo), 500);
    let opts = SyncOptions {
        from: 42,
        ..SyncOptions::DEFAULT
    };
    assert_eq!(opts.effective_from(&repo), 42);
}

// --- config layering ---

const CONFIG: &str = r#"
[settings]
fetch_procs = 4
index_procs = 2
sleep_per_page = 3
state = "all"
storage = "live"

[[repositories]]
user = "acme"
repo = "widgets"
start_index = 1200

[[repositories]]
user = "acme"
repo = "gadgets"
pretty_name = "Gadgets"
"#;

#[test]
fn test_apply_file_to_settings() {
    let file = SyncToml::parse(CONFIG).unwrap();
    let mut settings = RunSettings::default();
    apply_file_to_settings(&file, &mut settings);

    assert_eq!(settings.options.num_fetch_procs, 4);
    assert_eq!(settings.options.num_index_procs, 2);
    assert_eq!(settings.options.sleep_per_page, Duration::from_secs(3));
    assert_eq!(settings.options.state, StateFilter::All);
    assert_eq!(settings.options.storage, StorageMode::Live);
    assert_eq!(settings.options.per_page, 100);
    assert_eq!(settings.repositories.len(), 2);
    assert_eq!(settings.repositories[0].start_index, 1200);
    assert_eq!(settings.repositories[1].pretty_name(), "Gadgets");
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".issuesync.toml"), CONFIG).unwrap();

    let cli = Cli::try_parse_from([
        "issuesync",
        "--fetch-procs",
        "8",
        "--state",
        "closed",
        "acme/tools",
    ])
    .unwrap();
    let settings = resolve_settings(&cli, dir.path()).unwrap();

    assert_eq!(settings.options.num_fetch_procs, 8);
    assert_eq!(settings.options.num_index_procs, 2);
    assert_eq!(settings.options.state, StateFilter::Closed);
    assert_eq!(settings.repositories, vec![Repository::new("acme", "tools")]);
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cli = Cli::try_parse_from(["issuesync", "--config", "nope.toml"]).unwrap();
    assert!(resolve_settings(&cli, dir.path()).is_err());
}

// --- logging ---

#[test]
fn test_log_line_format() {
    colored::control::set_override(false);
    assert_eq!(
        format_line(Level::Warn, "issuesync::pipeline::fetch", &format_args!("slow page")),
        "[issuesync WARN issuesync::pipeline::fetch] slow page"
    );
    assert_eq!(
        format_line(Level::Info, "issuesync::pipeline::lister", &format_args!("page {}", 2)),
        "[issuesync] page 2"
    );
    assert_eq!(
        format_line(Level::Debug, "issuesync", &format_args!("phase")),
        "[issuesync DEBUG] phase"
    );
}

#[test]
fn test_setup_logging_twice() {
    setup_logging(false);
    setup_logging(true);
}
