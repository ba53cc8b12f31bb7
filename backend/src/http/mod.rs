//! HTTP server module.
//!
//! Axum-based REST surface over the service layer and repository pattern.
//! Handlers parse and validate requests, delegate to the scheduler and
//! services, and map domain errors onto HTTP status codes. Authentication
//! and session handling live in the gateway in front of this service.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
