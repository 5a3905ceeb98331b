//! Version information and update check.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;

use crate::APP;
use crate::config::DEFAULT_CONFIG_PATH;

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_REPOSITORY: &str = "essentialkaos/jira-reindex-runner";

#[derive(Deserialize, Debug)]
pub struct Release {
    pub tag_name: String,
}

/// Multi-line description of the build and the environment it runs in.
pub fn verbose_version_info() -> String {
    let mut lines = vec![
        format!("{} {}", APP, env!("CARGO_PKG_VERSION")),
        format!("  {}", env!("CARGO_PKG_DESCRIPTION")),
        String::new(),
    ];

    if let Some(rev) = option_env!("GIT_REV") {
        lines.push(format!("Git revision:   {}", rev));
    }

    lines.push(format!(
        "Platform:       {}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    ));
    lines.push(format!("Default config: {}", DEFAULT_CONFIG_PATH));
    lines.push(format!("License:        {}", env!("CARGO_PKG_LICENSE")));

    lines.join("\n")
}

/// Print version details. Builds made from a git checkout (with `GIT_REV`
/// set) also look for a newer release on GitHub.
pub async fn print_verbose_version() {
    println!("{}", verbose_version_info());

    if option_env!("GIT_REV").is_none() {
        return;
    }

    // A failed check is not worth reporting
    if let Ok(Some(latest)) = check_update(GITHUB_API_URL, env!("CARGO_PKG_VERSION")).await {
        println!();
        println!(
            "\x1b[1;33mUpdate available:\x1b[0m {} → \x1b[1;32m{}\x1b[0m",
            env!("CARGO_PKG_VERSION"),
            latest
        );
    }
}

/// Return the latest released version when it differs from `current_version`.
pub async fn check_update(
    api_url: &str,
    current_version: &str,
) -> Result<Option<String>, Box<dyn Error>> {
    let latest = get_latest_version(api_url).await?;

    if normalize_version(&latest) == normalize_version(current_version) {
        return Ok(None);
    }

    Ok(Some(latest))
}

/// Fetch the tag of the latest GitHub release.
pub async fn get_latest_version(api_url: &str) -> Result<String, Box<dyn Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("update-checker"));

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(5))
        .build()?;

    let url = format!(
        "{}/repos/{}/releases/latest",
        api_url.trim_end_matches('/'),
        GITHUB_REPOSITORY
    );

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err("Failed to fetch release info".into());
    }

    let release: Release = response.json().await?;
    Ok(release.tag_name)
}

fn normalize_version(version: &str) -> &str {
    version.trim().trim_start_matches('v')
}
