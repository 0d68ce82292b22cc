//! Contact form inquiries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::ContactMessageId;

/// An inquiry submitted through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    pub responded: bool,
    /// Staff-only follow-up notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Caller-supplied fields for a new contact inquiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessageDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_type: String,
    pub event_date: Option<NaiveDate>,
    pub budget: Option<String>,
    pub message: String,
}

impl ContactMessage {
    /// Build a new inquiry; emails are stored lowercased.
    pub fn create(id: ContactMessageId, draft: ContactMessageDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email.to_lowercase(),
            phone: draft.phone,
            event_type: draft.event_type,
            event_date: draft.event_date,
            budget: draft.budget,
            message: draft.message,
            created_at: now,
            is_read: false,
            responded: false,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn create_normalizes_email_and_defaults_flags() {
        let msg = ContactMessage::create(
            ContactMessageId::new(),
            ContactMessageDraft {
                name: "Jon Kariuki".into(),
                email: "Jon.K@Example.COM".into(),
                phone: "+254711000111".into(),
                event_type: "corporate".into(),
                event_date: None,
                budget: Some("100k-200k".into()),
                message: "Looking for a year-end display".into(),
            },
            Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap(),
        );

        assert_eq!(msg.email, "jon.k@example.com");
        assert!(!msg.is_read);
        assert!(!msg.responded);
        assert!(msg.notes.is_none());
    }
}
