//! Core business logic for voyage.
//!
//! - [`moderation`]: the approval workflow shared by listings and bookings
//! - [`pricing`]: booking amount calculation
//! - [`availability`]: listing calendars
//! - [`services`]: domain services and third-party integrations

pub mod availability;
pub mod moderation;
pub mod pricing;
pub mod services;

pub use moderation::{Moderated, ResourceKind, can_transition};
pub use services::*;
