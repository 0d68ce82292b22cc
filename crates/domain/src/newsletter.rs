//! Newsletter subscription list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::SubscriberId;

/// A newsletter subscriber. Emails are unique; unsubscribing deactivates
/// the record rather than deleting it, and resubscribing reactivates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    pub id: SubscriberId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub source: String,
    pub consent_given: bool,
    pub consent_date: DateTime<Utc>,
}

impl NewsletterSubscriber {
    /// Build a new active subscriber; emails are lowercased and trimmed.
    pub fn create(
        id: SubscriberId,
        email: &str,
        name: Option<String>,
        source: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email: email.trim().to_lowercase(),
            name,
            subscribed_at: now,
            unsubscribed_at: None,
            is_active: true,
            source: source.to_string(),
            consent_given: true,
            consent_date: now,
        }
    }

    /// Reactivate a lapsed subscription with a fresh subscription time.
    pub fn resubscribe(&mut self, now: DateTime<Utc>) {
        self.is_active = true;
        self.subscribed_at = now;
        self.unsubscribed_at = None;
    }

    /// Deactivate and stamp the unsubscription time.
    pub fn unsubscribe(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.unsubscribed_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn subscribe_unsubscribe_resubscribe_round_trip() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let mut sub = NewsletterSubscriber::create(
            SubscriberId::new(),
            "  Fan@Example.com ",
            None,
            "website",
            t0,
        );
        assert_eq!(sub.email, "fan@example.com");
        assert!(sub.is_active);

        let t1 = t0 + chrono::Duration::days(10);
        sub.unsubscribe(t1);
        assert!(!sub.is_active);
        assert_eq!(sub.unsubscribed_at, Some(t1));

        let t2 = t1 + chrono::Duration::days(30);
        sub.resubscribe(t2);
        assert!(sub.is_active);
        assert_eq!(sub.subscribed_at, t2);
        assert!(sub.unsubscribed_at.is_none());
    }
}
