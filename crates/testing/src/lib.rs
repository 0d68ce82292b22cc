//! Test utilities for the PyroStage workspace.
//!
//! - `builders` — fluent builders for domain entities
//! - `fixtures` — ready-made request payloads with fake data
//! - `mocks` — in-memory port implementations, a recording notifier, and a
//!   fixed clock for date-rule tests

pub mod builders;
pub mod fixtures;
pub mod mocks;

pub use builders::BookingBuilder;
pub use mocks::{
    FailingNotifier, FixedClock, InMemoryBookingRepository, InMemoryCatalogRepository,
    InMemoryContactRepository, InMemoryNewsletterRepository, InMemoryTestimonialRepository,
    RecordingNotifier,
};
