#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;

pub const ENDPOINT_CHECK: &str = "/rest/scriptrunner/latest/custom/reindexRequired";
pub const ENDPOINT_REINDEX: &str = "/rest/api/2/reindex";
pub const ENDPOINT_PROGRESS: &str = "/rest/api/2/reindex/progress";

/// Write a runner configuration pointing at `jira_url` into `dir`.
pub fn write_config(dir: &TempDir, jira_url: &str, enabled: bool) -> PathBuf {
    write_config_with_log(dir, jira_url, enabled, None)
}

pub fn write_config_with_log(
    dir: &TempDir,
    jira_url: &str,
    enabled: bool,
    log_file: Option<&Path>,
) -> PathBuf {
    let log_section = match log_file {
        Some(path) => format!("file = \"{}\"\nlevel = \"debug\"\n", path.display()),
        None => "level = \"info\"\n".to_string(),
    };

    let content = format!(
        r#"
[main]
enabled = {enabled}

[jira]
url = "{jira_url}"
username = "reindexer"
password = "secret"
reindex_type = "BACKGROUND"

[log]
{log_section}"#
    );

    let path = dir.path().join("jira-reindex-runner.toml");
    std::fs::write(&path, content).unwrap();
    path
}

/// URI of a local port nobody listens on.
pub fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Run the compiled binary with the given arguments.
pub async fn run_runner(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jira-reindex-runner"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .await
        .unwrap()
}

pub async fn run_with_config(config: &Path) -> Output {
    run_runner(&["--no-color", "-c", config.to_str().unwrap()]).await
}
