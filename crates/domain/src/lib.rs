//! PyroStage Domain Types
//!
//! Core domain model for the PyroStage booking backend. Defines the booking
//! ledger (status state machine, payment math, cancellation fee schedule),
//! the content entities (contact inquiries, service catalog, testimonials,
//! newsletter subscribers), domain events, and the error taxonomy shared by
//! every layer above.
//!
//! ## Modules
//!
//! - **identifiers**: strongly-typed UUID-based identifiers for all entities
//! - **booking**: the booking ledger — entity, state machine, pricing rules
//! - **contact**: contact form inquiries
//! - **catalog**: service catalog offerings
//! - **testimonial**: client testimonials
//! - **newsletter**: newsletter subscribers
//! - **user**: principal roles for the administrative surface
//! - **events**: notification events emitted by ledger operations
//! - **errors**: error types with HTTP status codes

#![warn(clippy::all)]

pub mod booking;
pub mod catalog;
pub mod contact;
pub mod errors;
pub mod events;
pub mod identifiers;
pub mod newsletter;
pub mod testimonial;
pub mod user;

pub use booking::{
    Booking, BookingDraft, BookingPolicy, BookingStatus, CancellationPolicy, DisplayType,
    PaymentStatus, VenueType,
};
pub use errors::{BookingError, ContentError, UnknownVariant};
pub use events::{BookingSnapshot, NotificationEvent};
pub use identifiers::*;
pub use user::UserRole;
