//! Prepdash API - REST boundary of the platform client
//!
//! Wire models, HTTP client construction and the [`PlatformApi`] trait
//! with its reqwest-backed implementation. Higher layers (session
//! management, composite updates) live in `prepdash-app` and only talk
//! to the platform through the trait seam defined here.

pub mod client;
pub mod models;
pub mod rest;

#[cfg(test)]
mod tests;

pub use client::{create_http_client, handle_response_error, ApiClientConfig};
pub use models::{unwrap_envelope, LoginPayload, RefreshPayload, UnlockedExam, UserDetail, UserSummary};
pub use rest::{PlatformApi, RestClient};
