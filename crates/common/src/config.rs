//! Application configuration.
//!
//! Configuration is layered: an optional `config/default.toml` file first,
//! then `PYROSTAGE__`-prefixed environment variables (double underscore as
//! section separator, e.g. `PYROSTAGE__DATABASE__URL`). Business constants
//! like the booking lead time travel in [`BookingSettings`] and are injected
//! into the ledger as an explicit policy, never read from ambient state.

use pyrostage_domain::booking::{BookingPolicy, CancellationPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    pub email: EmailSettings,
    pub company: CompanySettings,
    pub booking: BookingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            redis: RedisSettings::default(),
            email: EmailSettings::default(),
            company: CompanySettings::default(),
            booking: BookingSettings::default(),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/pyrostage".to_string(),
            max_connections: 10,
            acquire_timeout_seconds: 5,
        }
    }
}

/// Redis queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    pub url: String,
    pub queue_prefix: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            queue_prefix: "pyrostage".to_string(),
        }
    }
}

/// Outbound e-mail settings for the notification worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub admin_address: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            from_address: "noreply@pyrostage.example".to_string(),
            admin_address: "bookings@pyrostage.example".to_string(),
        }
    }
}

/// Company details rendered into notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanySettings {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            name: "PyroStage Fireworks & Stage FX".to_string(),
            phone: "+254 700 000 000".to_string(),
            email: "hello@pyrostage.example".to_string(),
        }
    }
}

/// Booking business-rule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSettings {
    /// Minimum advance-booking window in days
    pub min_lead_days: i64,
    /// Days before the event inside which the late fee rate applies
    pub late_cancel_window_days: i64,
    /// Days before the event inside which the standard fee rate applies
    pub standard_cancel_window_days: i64,
    /// Fee rate for late cancellations (fraction of total price)
    pub late_cancel_fee_rate: Decimal,
    /// Fee rate for standard-window cancellations
    pub standard_cancel_fee_rate: Decimal,
}

impl Default for BookingSettings {
    fn default() -> Self {
        let policy = BookingPolicy::default();
        Self {
            min_lead_days: policy.min_lead_days,
            late_cancel_window_days: policy.cancellation.late_window_days,
            standard_cancel_window_days: policy.cancellation.standard_window_days,
            late_cancel_fee_rate: policy.cancellation.late_fee_rate,
            standard_cancel_fee_rate: policy.cancellation.standard_fee_rate,
        }
    }
}

impl BookingSettings {
    /// Convert settings into the policy struct the ledger consumes.
    pub fn to_policy(&self) -> BookingPolicy {
        BookingPolicy {
            min_lead_days: self.min_lead_days,
            cancellation: CancellationPolicy {
                late_window_days: self.late_cancel_window_days,
                standard_window_days: self.standard_cancel_window_days,
                late_fee_rate: self.late_cancel_fee_rate,
                standard_fee_rate: self.standard_cancel_fee_rate,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from `config/default.toml` (optional) overlaid
    /// with `PYROSTAGE__`-prefixed environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("PYROSTAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_domain_policy() {
        let settings = BookingSettings::default();
        let policy = settings.to_policy();
        assert_eq!(policy.min_lead_days, 7);
        assert_eq!(policy.cancellation.late_window_days, 7);
        assert_eq!(policy.cancellation.standard_window_days, 30);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let config = AppConfig::load().expect("config should load from defaults");
        assert!(config.database.max_connections > 0);
        assert!(!config.redis.queue_prefix.is_empty());
    }
}
