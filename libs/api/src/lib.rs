use async_trait::async_trait;

pub mod client;
pub mod error;
pub mod models;
mod tls_client;

pub use client::{ClientConfig, JiraClient};
pub use error::ApiError;
pub use models::{ReindexProgress, ReindexRequest, ReindexType};

/// The three Jira calls the re-index workflow is built from.
#[async_trait]
pub trait ReindexApi: Send + Sync {
    /// Ask ScriptRunner whether a re-index has been requested.
    async fn reindex_request(&self) -> Result<ReindexRequest, ApiError>;

    /// Fetch the state of the current (or last) re-index task.
    async fn reindex_progress(&self) -> Result<ReindexProgress, ApiError>;

    /// Start a new re-index task of the given type.
    async fn start_reindex(&self, reindex_type: ReindexType) -> Result<(), ApiError>;
}
