//! Poll-until-terminal state machine.
//!
//! Each poll fetches the job, stops on `completed`/`failed`, and otherwise
//! waits one interval. The wait races the caller's [`CancellationToken`], and
//! the loop is bounded by a poll count and an optional overall deadline.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::types::{BatchJobStatus, JobStatus, TryOnJob};
use crate::{Error, Result};

/// Where the poller reads job state from. Implemented by [`Client`](crate::Client).
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_job(&self, job_id: &str) -> Result<TryOnJob>;
}

#[async_trait]
pub trait BatchSource: Send + Sync {
    async fn fetch_batch(&self, job_ids: &[String]) -> Result<Vec<BatchJobStatus>>;
}

#[async_trait]
impl<T: JobSource + ?Sized> JobSource for &T {
    async fn fetch_job(&self, job_id: &str) -> Result<TryOnJob> {
        (**self).fetch_job(job_id).await
    }
}

#[async_trait]
impl<T: BatchSource + ?Sized> BatchSource for &T {
    async fn fetch_batch(&self, job_ids: &[String]) -> Result<Vec<BatchJobStatus>> {
        (**self).fetch_batch(job_ids).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_polls: u32,
    pub timeout: Option<Duration>,
}

impl PollConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
    pub const BATCH_INTERVAL: Duration = Duration::from_secs(3);
    pub const DEFAULT_MAX_POLLS: u32 = 150;

    /// Defaults for batch status polling.
    pub fn batch() -> Self {
        Self {
            interval: Self::BATCH_INTERVAL,
            ..Default::default()
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_polls: Self::DEFAULT_MAX_POLLS,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobPoller<S> {
    source: S,
    config: PollConfig,
}

impl<S> JobPoller<S> {
    pub fn new(source: S, config: PollConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    async fn bounded<T>(
        &self,
        operation: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, operation)
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => operation.await,
        }
    }

    /// Waits one interval; `false` if cancelled first.
    async fn pause(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.config.interval) => true,
        }
    }
}

impl<S: JobSource> JobPoller<S> {
    /// Polls until the job is terminal. A failed job is returned, not raised.
    pub async fn poll(&self, job_id: &str, cancel: &CancellationToken) -> Result<TryOnJob> {
        self.bounded(self.poll_job(job_id, cancel)).await
    }

    /// Like [`poll`](Self::poll), but a failed job becomes [`Error::JobFailed`].
    pub async fn wait_for_result(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<TryOnJob> {
        let job = self.poll(job_id, cancel).await?;
        match job.status {
            JobStatus::Failed => Err(Error::JobFailed {
                job_id: job.id,
                message: job
                    .error_message
                    .unwrap_or_else(|| "Generation failed".to_string()),
            }),
            _ => Ok(job),
        }
    }

    async fn poll_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<TryOnJob> {
        let mut previous: Option<JobStatus> = None;

        for poll in 1..=self.config.max_polls {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let job = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                fetched = self.source.fetch_job(job_id) => fetched?,
            };

            if let Some(prev) = previous
                && !prev.can_transition_to(job.status)
            {
                tracing::warn!(
                    job_id,
                    from = %prev,
                    to = %job.status,
                    "unexpected job status transition"
                );
            }
            previous = Some(job.status);

            if job.is_terminal() {
                tracing::info!(job_id, status = %job.status, polls = poll, "job finished");
                return Ok(job);
            }

            tracing::debug!(job_id, status = %job.status, poll, "job still running");
            if poll < self.config.max_polls && !self.pause(cancel).await {
                return Err(Error::Cancelled);
            }
        }

        Err(Error::PollLimitExceeded {
            job_id: job_id.to_string(),
            polls: self.config.max_polls,
        })
    }
}

impl<S: BatchSource> JobPoller<S> {
    /// Polls until every reported job is terminal; returns the last report.
    pub async fn poll_batch(
        &self,
        job_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<BatchJobStatus>> {
        if job_ids.is_empty() {
            return Err(Error::invalid_request("no job ids to poll"));
        }
        self.bounded(self.poll_jobs(job_ids, cancel)).await
    }

    async fn poll_jobs(
        &self,
        job_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<BatchJobStatus>> {
        let mut previous: HashMap<String, JobStatus> = HashMap::new();

        for poll in 1..=self.config.max_polls {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let jobs = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                fetched = self.source.fetch_batch(job_ids) => fetched?,
            };

            for job in &jobs {
                if let Some(prev) = previous.insert(job.id.clone(), job.status)
                    && !prev.can_transition_to(job.status)
                {
                    tracing::warn!(
                        job_id = %job.id,
                        from = %prev,
                        to = %job.status,
                        "unexpected job status transition"
                    );
                }
            }

            let pending = jobs.iter().filter(|job| !job.is_terminal()).count();
            if pending == 0 {
                tracing::info!(jobs = jobs.len(), polls = poll, "batch finished");
                return Ok(jobs);
            }

            tracing::debug!(pending, total = jobs.len(), poll, "batch still running");
            if poll < self.config.max_polls && !self.pause(cancel).await {
                return Err(Error::Cancelled);
            }
        }

        Err(Error::PollLimitExceeded {
            job_id: job_ids.join(","),
            polls: self.config.max_polls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TryOnMode;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    /// Replays a fixed status sequence, repeating the last one.
    struct Scripted {
        statuses: Mutex<VecDeque<JobStatus>>,
        fetches: AtomicU32,
    }

    impl Scripted {
        fn new(statuses: &[JobStatus]) -> Self {
            Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                fetches: AtomicU32::new(0),
            }
        }

        fn next(&self) -> JobStatus {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front().unwrap()
            } else {
                statuses[0]
            }
        }
    }

    fn job(id: &str, status: JobStatus) -> TryOnJob {
        TryOnJob {
            id: id.to_string(),
            mode: TryOnMode::Top,
            status,
            result_image_base64: (status == JobStatus::Completed).then(|| "iVBORw0KGgo=".into()),
            error_message: (status == JobStatus::Failed).then(|| "pose not detected".into()),
            credits_used: 1,
            created_at: chrono::Utc::now(),
            completed_at: None,
        }
    }

    #[async_trait]
    impl JobSource for Scripted {
        async fn fetch_job(&self, job_id: &str) -> Result<TryOnJob> {
            Ok(job(job_id, self.next()))
        }
    }

    #[async_trait]
    impl BatchSource for Scripted {
        async fn fetch_batch(&self, job_ids: &[String]) -> Result<Vec<BatchJobStatus>> {
            let status = self.next();
            Ok(job_ids
                .iter()
                .enumerate()
                .map(|(i, id)| BatchJobStatus {
                    id: id.clone(),
                    // first job always finishes immediately
                    status: if i == 0 { JobStatus::Completed } else { status },
                    result_image_base64: None,
                })
                .collect())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl JobSource for Unreachable {
        async fn fetch_job(&self, _job_id: &str) -> Result<TryOnJob> {
            Err(Error::Api {
                status: 404,
                message: "Job not found".into(),
            })
        }
    }

    use JobStatus::*;

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_completed() {
        let source = Scripted::new(&[Queued, Processing, Processing, Completed]);
        let poller = JobPoller::new(&source, PollConfig::default());
        let started = Instant::now();

        let job = poller.poll("j1", &CancellationToken::new()).await.unwrap();

        assert_eq!(job.status, Completed);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_is_returned() {
        let source = Scripted::new(&[Processing, Failed]);
        let poller = JobPoller::new(&source, PollConfig::default());

        let job = poller.poll("j1", &CancellationToken::new()).await.unwrap();
        assert_eq!(job.status, Failed);

        let source = Scripted::new(&[Processing, Failed]);
        let err = JobPoller::new(&source, PollConfig::default())
            .wait_for_result("j1", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::JobFailed { ref message, .. } if message == "pose not detected")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_enforces_max_polls() {
        let source = Scripted::new(&[Processing]);
        let poller = JobPoller::new(&source, PollConfig::default().max_polls(5));
        let started = Instant::now();

        let err = poller.poll("j1", &CancellationToken::new()).await.unwrap_err();

        assert!(matches!(err, Error::PollLimitExceeded { polls: 5, .. }));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 5);
        // no wait after the last poll
        assert_eq!(started.elapsed(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start() {
        let source = Scripted::new(&[Queued]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = JobPoller::new(&source, PollConfig::default())
            .poll("j1", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait() {
        let source = Scripted::new(&[Processing]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(4500)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = JobPoller::new(&source, PollConfig::default())
            .poll("j1", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(started.elapsed(), Duration::from_millis(4500));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overall_timeout() {
        let source = Scripted::new(&[Processing]);
        let config = PollConfig::default().timeout(Duration::from_secs(7));

        let err = JobPoller::new(&source, config)
            .poll("j1", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_secs(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_propagates() {
        let err = JobPoller::new(Unreachable, PollConfig::default())
            .poll("missing", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test(start_paused = true)]
    async fn test_regression_is_tolerated() {
        // processing -> queued is logged, not fatal
        let source = Scripted::new(&[Processing, Queued, Completed]);
        let job = JobPoller::new(&source, PollConfig::default())
            .poll("j1", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(job.status, Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_waits_for_all() {
        let source = Scripted::new(&[Queued, Processing, Failed]);
        let poller = JobPoller::new(&source, PollConfig::batch());
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let started = Instant::now();

        let jobs = poller
            .poll_batch(&ids, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(BatchJobStatus::is_terminal));
        assert_eq!(jobs[1].status, Failed);
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_rejects_empty() {
        let source = Scripted::new(&[Completed]);
        let err = JobPoller::new(&source, PollConfig::batch())
            .poll_batch(&[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_config_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_secs(2));
        assert_eq!(config.max_polls, 150);
        assert!(config.timeout.is_none());
        assert_eq!(PollConfig::batch().interval, Duration::from_secs(3));
    }
}
