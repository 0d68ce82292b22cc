//! Queue consumer: fetch and process notification jobs from Redis.

use crate::config::WorkerConfig;
use crate::workers::notification::NotificationWorker;
use anyhow::{Context, Result};
use pyrostage_infrastructure::messaging::{dead_letter_queue, notifications_queue, NotificationJob};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Consumer pool for the notification queue.
#[derive(Clone)]
pub struct QueueConsumer {
    redis: ConnectionManager,
    config: WorkerConfig,
}

impl QueueConsumer {
    /// Connect to Redis and return a consumer.
    pub async fn connect(config: WorkerConfig) -> Result<Self> {
        let client =
            redis::Client::open(config.redis_url.as_str()).context("invalid Redis URL")?;
        let redis = ConnectionManager::new(client)
            .await
            .context("failed to connect to Redis")?;

        Ok(Self { redis, config })
    }

    /// Spawn the consumer task pool.
    pub fn start(&self, worker: Arc<NotificationWorker>) -> Vec<JoinHandle<()>> {
        info!(pool_size = self.config.pool_size, "Starting notification worker pool");

        (0..self.config.pool_size)
            .map(|worker_id| {
                let consumer = self.clone();
                let worker = worker.clone();
                tokio::spawn(async move {
                    consumer.worker_loop(worker_id, worker).await;
                })
            })
            .collect()
    }

    /// Continuously fetch and process jobs.
    async fn worker_loop(&self, worker_id: usize, worker: Arc<NotificationWorker>) {
        let mut redis = self.redis.clone();
        let queue = notifications_queue(&self.config.queue_prefix);

        loop {
            match self.fetch_job(&mut redis, &queue).await {
                Ok(Some(mut job)) => {
                    debug!(
                        worker_id,
                        job_id = %job.id,
                        event_type = job.event.event_type(),
                        "Processing notification job"
                    );

                    match worker.process(&job.event).await {
                        Ok(()) => {
                            info!(worker_id, job_id = %job.id, "Notification job completed");
                        }
                        Err(err) => {
                            if job.should_retry() {
                                job.increment_retry();
                                warn!(
                                    worker_id,
                                    job_id = %job.id,
                                    retry_count = job.retry_count,
                                    error = %err,
                                    "Notification job failed, re-queueing"
                                );
                                if let Err(requeue_err) = self.requeue(&mut redis, &job).await {
                                    error!(
                                        worker_id,
                                        job_id = %job.id,
                                        error = %requeue_err,
                                        "Failed to re-queue job"
                                    );
                                }
                            } else {
                                job.mark_failed(err.to_string());
                                error!(
                                    worker_id,
                                    job_id = %job.id,
                                    error = %err,
                                    "Notification job exhausted retries, moving to DLQ"
                                );
                                if let Err(dlq_err) = self.move_to_dlq(&mut redis, &job).await {
                                    error!(
                                        worker_id,
                                        job_id = %job.id,
                                        error = %dlq_err,
                                        "Failed to move job to DLQ"
                                    );
                                }
                            }
                        }
                    }
                }
                Ok(None) => {
                    // BRPOP timed out with an empty queue; loop around
                }
                Err(err) => {
                    error!(worker_id, error = %err, "Failed to fetch job");
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }

    /// Block on the queue until a job arrives or the timeout elapses.
    async fn fetch_job(
        &self,
        redis: &mut ConnectionManager,
        queue: &str,
    ) -> Result<Option<NotificationJob>> {
        let result: Option<(String, String)> = redis
            .brpop(queue, self.config.blocking_timeout_seconds as f64)
            .await
            .context("BRPOP failed")?;

        match result {
            Some((_, payload)) => {
                let job = serde_json::from_str(&payload)
                    .context("failed to deserialize notification job")?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    async fn requeue(&self, redis: &mut ConnectionManager, job: &NotificationJob) -> Result<()> {
        let payload = serde_json::to_string(job)?;
        redis
            .lpush::<_, _, ()>(notifications_queue(&self.config.queue_prefix), payload)
            .await
            .context("failed to re-queue job")?;
        Ok(())
    }

    async fn move_to_dlq(
        &self,
        redis: &mut ConnectionManager,
        job: &NotificationJob,
    ) -> Result<()> {
        let payload = serde_json::to_string(job)?;
        redis
            .lpush::<_, _, ()>(dead_letter_queue(&self.config.queue_prefix), payload)
            .await
            .context("failed to move job to DLQ")?;
        Ok(())
    }

    /// Inspect the dead-letter list (operational tooling).
    pub async fn dlq_jobs(&self, limit: usize) -> Result<Vec<NotificationJob>> {
        let mut redis = self.redis.clone();
        let payloads: Vec<String> = redis
            .lrange(
                dead_letter_queue(&self.config.queue_prefix),
                0,
                limit as isize - 1,
            )
            .await
            .context("failed to fetch DLQ jobs")?;

        Ok(payloads
            .iter()
            .filter_map(|payload| serde_json::from_str(payload).ok())
            .collect())
    }
}
