//! Redis-backed notification queue.
//!
//! The API process enqueues [`NotificationJob`]s onto a Redis list; the
//! worker binary pops and processes them. Jobs carry their own retry
//! bookkeeping; exhausted jobs are parked on a dead-letter list.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use pyrostage_application::services::Notifier;
use pyrostage_domain::events::NotificationEvent;

/// Name of the main notification queue for a key prefix.
pub fn notifications_queue(prefix: &str) -> String {
    format!("{}:notifications", prefix)
}

/// Name of the dead-letter list for a key prefix.
pub fn dead_letter_queue(prefix: &str) -> String {
    format!("{}:notifications:dlq", prefix)
}

/// A queued notification with retry bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationJob {
    pub id: Uuid,
    pub event: NotificationEvent,
    pub retry_count: u32,
    pub max_retries: u32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotificationJob {
    pub fn new(event: NotificationEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            retry_count: 0,
            max_retries: 3,
            created_at: Utc::now(),
            error: None,
        }
    }

    pub fn should_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    pub fn increment_retry(&mut self) {
        self.retry_count += 1;
    }

    pub fn mark_failed(&mut self, error: String) {
        self.error = Some(error);
    }
}

/// Producer side of the notification queue.
#[derive(Clone)]
pub struct QueueProducer {
    redis: ConnectionManager,
    prefix: String,
}

impl QueueProducer {
    /// Connect to Redis and return a producer.
    pub async fn connect(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        let prefix = prefix.into();
        info!(prefix = %prefix, "Notification queue producer connected");
        Ok(Self { redis, prefix })
    }

    /// Enqueue a notification event as a new job.
    pub async fn enqueue(&self, event: NotificationEvent) -> anyhow::Result<NotificationJob> {
        let job = NotificationJob::new(event);
        let payload = serde_json::to_string(&job)?;

        let mut conn = self.redis.clone();
        conn.lpush::<_, _, ()>(notifications_queue(&self.prefix), payload)
            .await?;

        debug!(job_id = %job.id, event_type = job.event.event_type(), "Notification job enqueued");
        Ok(job)
    }

    /// Number of jobs waiting on the main queue.
    pub async fn queue_size(&self) -> anyhow::Result<usize> {
        let mut conn = self.redis.clone();
        let size: usize = conn.llen(notifications_queue(&self.prefix)).await?;
        Ok(size)
    }
}

/// [`Notifier`] implementation that enqueues onto the Redis queue.
///
/// Enqueue failures bubble up as errors; the service layer logs and
/// swallows them, so a Redis outage never fails a booking operation.
pub struct RedisNotifier {
    producer: QueueProducer,
}

impl RedisNotifier {
    pub async fn connect(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            producer: QueueProducer::connect(redis_url, prefix).await?,
        })
    }

    pub fn from_producer(producer: QueueProducer) -> Self {
        Self { producer }
    }
}

#[async_trait]
impl Notifier for RedisNotifier {
    async fn notify(&self, event: NotificationEvent) -> anyhow::Result<()> {
        self.producer.enqueue(event).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_retry_bookkeeping() {
        let mut job = NotificationJob::new(NotificationEvent::NewsletterSubscribed {
            email: "fan@example.com".into(),
        });

        assert!(job.should_retry());
        job.increment_retry();
        job.increment_retry();
        job.increment_retry();
        assert_eq!(job.retry_count, 3);
        assert!(!job.should_retry());

        job.mark_failed("connection refused".into());
        assert!(job.error.is_some());
    }

    #[test]
    fn job_round_trips_through_json() {
        let job = NotificationJob::new(NotificationEvent::NewsletterSubscribed {
            email: "fan@example.com".into(),
        });

        let json = serde_json::to_string(&job).unwrap();
        let back: NotificationJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, job.id);
        assert_eq!(back.event.event_type(), "newsletter_subscribed");
    }

    #[test]
    fn queue_names_are_prefixed() {
        assert_eq!(notifications_queue("pyrostage"), "pyrostage:notifications");
        assert_eq!(
            dead_letter_queue("pyrostage"),
            "pyrostage:notifications:dlq"
        );
    }
}
