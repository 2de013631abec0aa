//! `/tryon` and `/batch/tryon` endpoints.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{ApiRequest, Client, require_id};
use crate::jobs::{JobPoller, PollConfig};
use crate::types::{
    BatchItem, BatchJob, BatchJobStatus, JobHistory, MAX_BATCH_SIZE, MessageResponse, TryOnJob,
    TryOnRequest,
};
use crate::{Error, Result};

#[derive(Serialize)]
struct BatchRequest<'a> {
    items: &'a [BatchItem],
}

#[derive(Deserialize)]
struct BatchCreated {
    jobs: Vec<BatchJob>,
}

#[derive(Deserialize)]
struct BatchStatus {
    jobs: Vec<BatchJobStatus>,
}

pub struct TryOnClient<'a> {
    client: &'a Client,
}

impl<'a> TryOnClient<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Submits one job. Credits are charged when the job is queued.
    pub async fn create(&self, request: TryOnRequest) -> Result<TryOnJob> {
        request.validate()?;
        let job: TryOnJob = self
            .client
            .execute(ApiRequest::post(["tryon"]).json(&request)?)
            .await?;
        tracing::debug!(job_id = %job.id, mode = %job.mode, "try-on job created");
        Ok(job)
    }

    pub async fn get(&self, job_id: &str) -> Result<TryOnJob> {
        let job_id = require_id("job", job_id)?;
        self.client.execute(ApiRequest::get(["tryon", job_id])).await
    }

    pub async fn history(&self, skip: u32, limit: u32) -> Result<JobHistory> {
        let request = ApiRequest::get(["tryon", "history", "list"])
            .query("skip", skip)
            .query("limit", limit);
        self.client.execute(request).await
    }

    pub async fn delete(&self, job_id: &str) -> Result<MessageResponse> {
        let job_id = require_id("job", job_id)?;
        self.client
            .execute(ApiRequest::delete(["tryon", job_id]))
            .await
    }

    /// Submits up to [`MAX_BATCH_SIZE`] jobs at once. Free plans are limited
    /// further server-side.
    pub async fn create_batch(&self, items: &[BatchItem]) -> Result<Vec<BatchJob>> {
        if items.is_empty() {
            return Err(Error::invalid_request("batch is empty"));
        }
        if items.len() > MAX_BATCH_SIZE {
            return Err(Error::invalid_request(format!(
                "batch of {} exceeds the limit of {MAX_BATCH_SIZE}",
                items.len()
            )));
        }
        for (index, item) in items.iter().enumerate() {
            item.validate().map_err(|e| match e {
                Error::InvalidRequest(message) => {
                    Error::InvalidRequest(format!("item {index}: {message}"))
                }
                other => other,
            })?;
        }

        let request = ApiRequest::post(["batch", "tryon"]).json(&BatchRequest { items })?;
        let created: BatchCreated = self.client.execute(request).await?;
        tracing::debug!(jobs = created.jobs.len(), "batch created");
        Ok(created.jobs)
    }

    /// Status of each id. Ids the server cannot find are left out.
    pub async fn batch_status(&self, job_ids: &[String]) -> Result<Vec<BatchJobStatus>> {
        let ids = job_ids
            .iter()
            .map(|id| require_id("job", id))
            .collect::<Result<Vec<_>>>()?;
        if ids.is_empty() {
            return Err(Error::invalid_request("no job ids given"));
        }

        let request = ApiRequest::get(["batch", "tryon", "status"]).query("job_ids", ids.join(","));
        let status: BatchStatus = self.client.execute(request).await?;
        Ok(status.jobs)
    }

    /// Polls until the job finishes. A failed job becomes [`Error::JobFailed`].
    pub async fn wait_for_completion(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<TryOnJob> {
        JobPoller::new(self.client, *self.client.poll_config())
            .wait_for_result(job_id, cancel)
            .await
    }

    /// Polls a batch at the batch interval until every reported job is terminal.
    pub async fn wait_for_batch(
        &self,
        job_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<BatchJobStatus>> {
        let config = self.client.poll_config().interval(PollConfig::BATCH_INTERVAL);
        JobPoller::new(self.client, config)
            .poll_batch(job_ids, cancel)
            .await
    }
}
