//! Worker configuration.

use pyrostage_common::config::{CompanySettings, EmailSettings};

/// Runtime configuration for the notification worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Queue key prefix shared with the API process
    pub queue_prefix: String,
    /// Number of concurrent consumer tasks
    pub pool_size: usize,
    /// BRPOP blocking timeout in seconds
    pub blocking_timeout_seconds: u64,
    /// Outbound e-mail settings
    pub email: EmailSettings,
    /// Company details rendered into e-mails
    pub company: CompanySettings,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            queue_prefix: "pyrostage".to_string(),
            pool_size: 4,
            blocking_timeout_seconds: 5,
            email: EmailSettings::default(),
            company: CompanySettings::default(),
        }
    }
}
