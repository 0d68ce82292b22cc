//! PyroStage notification worker binary.

use anyhow::Context;
use clap::Parser;
use pyrostage_common::config::AppConfig;
use pyrostage_common::telemetry::init_telemetry;
use pyrostage_worker::{LoggingMailer, NotificationWorker, QueueConsumer, WorkerConfig};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pyrostage-worker", about = "PyroStage notification worker")]
struct Args {
    /// Redis connection URL (overrides config)
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Number of concurrent consumer tasks
    #[arg(long, default_value_t = 4)]
    pool_size: usize,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_telemetry(&args.log_level, args.log_json);

    let app_config = AppConfig::load().context("failed to load application config")?;

    let config = WorkerConfig {
        redis_url: args
            .redis_url
            .unwrap_or_else(|| app_config.redis.url.clone()),
        queue_prefix: app_config.redis.queue_prefix.clone(),
        pool_size: args.pool_size,
        email: app_config.email.clone(),
        company: app_config.company.clone(),
        ..Default::default()
    };

    let mailer = Arc::new(LoggingMailer::new(config.email.from_address.clone()));
    let worker = Arc::new(NotificationWorker::new(mailer, config.clone()));

    let consumer = QueueConsumer::connect(config).await?;
    let handles = consumer.start(worker);

    info!("Notification worker running; press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("Shutting down notification worker");
    for handle in handles {
        handle.abort();
    }

    Ok(())
}
