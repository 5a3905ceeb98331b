//! Typed records for the Jira re-index endpoints.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format of the `date` field returned by the re-index request check.
pub const JIRA_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Answer of the "is re-index required" endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReindexRequest {
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub user: String,
    /// Raw request time; see [`ReindexRequest::requested_at`].
    #[serde(default)]
    pub date: String,
}

impl ReindexRequest {
    /// Parsed request time. Falls back to the Unix epoch when the field is
    /// missing or malformed, since the value is only ever shown in logs.
    pub fn requested_at(&self) -> DateTime<FixedOffset> {
        let raw = match self.date.strip_suffix('Z') {
            Some(stripped) => format!("{}+0000", stripped),
            None => self.date.clone(),
        };

        DateTime::parse_from_str(&raw, JIRA_DATE_TIME_FORMAT)
            .unwrap_or_else(|_| DateTime::<Utc>::UNIX_EPOCH.fixed_offset())
    }
}

/// State of the current (or most recent) re-index task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReindexProgress {
    #[serde(rename = "currentProgress", default)]
    pub current_progress: i32,
    #[serde(rename = "currentSubTask", default)]
    pub current_sub_task: String,
    /// Jira reports this as `success`; it is `false` while a task is running.
    #[serde(rename = "success", default)]
    pub is_finished: bool,
}

/// Re-index strategy passed to Jira when starting the task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReindexType {
    Foreground,
    Background,
    #[default]
    BackgroundPreferred,
}

impl ReindexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReindexType::Foreground => "FOREGROUND",
            ReindexType::Background => "BACKGROUND",
            ReindexType::BackgroundPreferred => "BACKGROUND_PREFERRED",
        }
    }
}

impl fmt::Display for ReindexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReindexType {
    type Err = String;

    /// An empty string selects the default type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(ReindexType::default()),
            "FOREGROUND" => Ok(ReindexType::Foreground),
            "BACKGROUND" => Ok(ReindexType::Background),
            "BACKGROUND_PREFERRED" => Ok(ReindexType::BackgroundPreferred),
            other => Err(format!(
                "Unsupported re-index type '{}' (expected FOREGROUND, BACKGROUND or BACKGROUND_PREFERRED)",
                other
            )),
        }
    }
}
