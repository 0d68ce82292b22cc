//! Notification worker for PyroStage.
//!
//! Consumes notification jobs from the Redis queue, renders client and
//! staff e-mails, and hands them to the mail transport. Delivery runs
//! entirely outside the API request cycle: failed jobs are retried a
//! bounded number of times and then parked on the dead-letter list.

pub mod config;
pub mod queue;
pub mod workers;

pub use config::WorkerConfig;
pub use queue::QueueConsumer;
pub use workers::notification::{EmailMessage, LoggingMailer, Mailer, NotificationWorker};
