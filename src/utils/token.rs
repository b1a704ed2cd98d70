//! API token loading: env var → .env in dir. No prompt; a missing token means unauthenticated requests.

use log::{info, warn};
use std::path::Path;

use crate::utils::config::GitHubConsts;

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read the token from `GITHUB_TOKEN`, then from `.env` in `dir`.
pub fn get_token(dir: &Path) -> Option<String> {
    if let Some(token) = non_empty_env(GitHubConsts::TOKEN_ENV) {
        info!("GitHub token found in environment");
        return Some(token);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        if let Some(token) = non_empty_env(GitHubConsts::TOKEN_ENV) {
            info!("GitHub token loaded from {}", env_path.display());
            return Some(token);
        }
    }
    warn!(
        "No {} set; running unauthenticated (60 requests/hour)",
        GitHubConsts::TOKEN_ENV
    );
    None
}
