//! Service catalog offerings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::identifiers::ServiceId;

/// A display package offered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: ServiceId,
    pub name: String,
    /// URL-safe unique identifier, lowercase kebab-case
    pub slug: String,
    pub category: String,
    pub description: String,
    pub features: Vec<String>,
    pub base_price: Decimal,
    pub price_range_min: Decimal,
    pub price_range_max: Decimal,
    pub duration: String,
    pub is_popular: bool,
    pub is_active: bool,
    pub display_order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOfferingDraft {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    pub features: Vec<String>,
    pub base_price: Decimal,
    pub price_range_min: Decimal,
    pub price_range_max: Decimal,
    pub duration: String,
    pub is_popular: bool,
    pub display_order: u32,
    pub image_url: Option<String>,
    pub disclaimer: Option<String>,
    pub min_guests: Option<u32>,
    pub max_guests: Option<u32>,
}

/// Mutable subset for catalog updates; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceOfferingUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub base_price: Option<Decimal>,
    pub price_range_min: Option<Decimal>,
    pub price_range_max: Option<Decimal>,
    pub duration: Option<String>,
    pub is_popular: Option<bool>,
    pub display_order: Option<u32>,
    pub image_url: Option<String>,
    pub disclaimer: Option<String>,
}

impl ServiceOffering {
    /// Build a new active catalog entry.
    pub fn create(id: ServiceId, draft: ServiceOfferingDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            slug: draft.slug,
            category: draft.category,
            description: draft.description,
            features: draft.features,
            base_price: draft.base_price,
            price_range_min: draft.price_range_min,
            price_range_max: draft.price_range_max,
            duration: draft.duration,
            is_popular: draft.is_popular,
            is_active: true,
            display_order: draft.display_order,
            image_url: draft.image_url,
            disclaimer: draft.disclaimer,
            min_guests: draft.min_guests,
            max_guests: draft.max_guests,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an in-place update, stamping `updated_at`.
    pub fn apply(&mut self, update: ServiceOfferingUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(features) = update.features {
            self.features = features;
        }
        if let Some(base_price) = update.base_price {
            self.base_price = base_price;
        }
        if let Some(min) = update.price_range_min {
            self.price_range_min = min;
        }
        if let Some(max) = update.price_range_max {
            self.price_range_max = max;
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
        }
        if let Some(is_popular) = update.is_popular {
            self.is_popular = is_popular;
        }
        if let Some(order) = update.display_order {
            self.display_order = order;
        }
        if update.image_url.is_some() {
            self.image_url = update.image_url;
        }
        if update.disclaimer.is_some() {
            self.disclaimer = update.disclaimer;
        }
        self.updated_at = now;
    }
}
