//! Re-index workflow.
//!
//! A single run goes through these steps:
//! 1. Ask Jira whether a re-index was requested
//! 2. Make sure no re-index task is already running
//! 3. Start a new re-index task
//! 4. Poll its progress until it finishes, giving up when Jira stays silent
//!    for too long

mod clock;


pub use clock::{Clock, SystemClock};

use jira_reindex_api::{ApiError, ReindexApi, ReindexType};
use std::time::Duration;
use tracing::{error, info};

/// Delay between starting the task and the first progress check.
pub const START_GRACE_PERIOD: Duration = Duration::from_secs(5);
/// Interval between progress checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);
/// Maximum time without a successful progress check.
pub const STALENESS_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Process-level result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NotRequired,
    AlreadyInProgress,
    Finished,
}

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum ReindexError {
    #[error("Can't get information from Jira: {0}")]
    CheckRequired(#[source] ApiError),

    #[error("Can't check re-index progress: {0}")]
    CheckProgress(#[source] ApiError),

    #[error("Can't run re-index process: {0}")]
    Start(#[source] ApiError),

    #[error("Can't get info about re-index progress for more than {} minutes", .0.as_secs() / 60)]
    Stale(Duration),
}

/// Drives one re-index run against Jira.
pub struct Reindexer<A, C> {
    api: A,
    reindex_type: ReindexType,
    clock: C,
}

impl<A: ReindexApi, C: Clock> Reindexer<A, C> {
    pub fn new(api: A, reindex_type: ReindexType, clock: C) -> Self {
        Self {
            api,
            reindex_type,
            clock,
        }
    }

    /// Run the whole workflow, logging any fatal error as critical.
    pub async fn run(&self) -> ExitStatus {
        match self.execute().await {
            Ok(_) => ExitStatus::Success,
            Err(e) => {
                error!(critical = true, "{}", e);
                ExitStatus::Failure
            }
        }
    }

    pub async fn execute(&self) -> Result<Outcome, ReindexError> {
        if !self.check_if_reindex_required().await? {
            info!("Re-index is not required. Exiting…");
            return Ok(Outcome::NotRequired);
        }

        if self.check_reindex_in_progress().await? {
            info!("Re-index already in progress. Exiting…");
            return Ok(Outcome::AlreadyInProgress);
        }

        self.start_reindex().await?;
        self.monitor_progress().await?;

        info!("Re-index successfully finished!");

        Ok(Outcome::Finished)
    }

    async fn check_if_reindex_required(&self) -> Result<bool, ReindexError> {
        info!("Checking if re-index is required…");

        let request = self
            .api
            .reindex_request()
            .await
            .map_err(ReindexError::CheckRequired)?;

        if request.is_required {
            info!(
                "Found reindex request (author: {} | created: {})",
                request.user,
                request.requested_at().format("%Y/%m/%d %H:%M:%S")
            );
        }

        Ok(request.is_required)
    }

    /// Before we start anything, `is_finished == false` means some other
    /// re-index task is still running.
    async fn check_reindex_in_progress(&self) -> Result<bool, ReindexError> {
        let progress = self
            .api
            .reindex_progress()
            .await
            .map_err(ReindexError::CheckProgress)?;

        Ok(!progress.is_finished)
    }

    async fn start_reindex(&self) -> Result<(), ReindexError> {
        info!("Starting re-index (type: {})…", self.reindex_type);

        self.api
            .start_reindex(self.reindex_type)
            .await
            .map_err(ReindexError::Start)?;

        info!("Re-index successfully started");

        Ok(())
    }

    /// Poll progress once per [`POLL_INTERVAL`] until Jira reports the task as
    /// finished. Failed polls are only logged; the run fails once no poll has
    /// succeeded for longer than [`STALENESS_TIMEOUT`].
    async fn monitor_progress(&self) -> Result<(), ReindexError> {
        let mut last_success = self.clock.now();

        self.clock.sleep(START_GRACE_PERIOD).await;

        let mut next_tick = self.clock.now() + POLL_INTERVAL;

        loop {
            let now = self.clock.now();
            self.clock
                .sleep(next_tick.saturating_duration_since(now))
                .await;

            // Ticks missed while a slow request was in flight are dropped
            let now = self.clock.now();
            while next_tick <= now {
                next_tick += POLL_INTERVAL;
            }

            if now.duration_since(last_success) > STALENESS_TIMEOUT {
                return Err(ReindexError::Stale(STALENESS_TIMEOUT));
            }

            let progress = match self.api.reindex_progress().await {
                Ok(progress) => progress,
                Err(e) => {
                    error!(error = %e, "Can't check re-index progress");
                    continue;
                }
            };

            last_success = self.clock.now();

            if progress.is_finished {
                return Ok(());
            }

            info!(
                "{} ({}% done)",
                progress.current_sub_task, progress.current_progress
            );
        }
    }
}
