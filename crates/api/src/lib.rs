//! HTTP API layer for voyage.
//!
//! - **Endpoints**: one router per resource, nested under `/api` by the server
//! - **Extractors**: authenticated user, verified identity, pagination
//! - **Middleware**: bearer-token authentication and role gates
//! - **Response**: the `{"data": ...}` envelope
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
