//! Job handlers.

pub mod notification;
