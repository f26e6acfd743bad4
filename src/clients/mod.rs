//! Clients - HTTP Clients for External APIs
//!
//! This module contains the HTTP client for the distributor's REST backend
//! and the path builders for every endpoint it consumes.

pub mod endpoints;
pub mod soda_api_client;

// Re-export main types for convenience
pub use soda_api_client::{SodaApiClient, TokenProvider, UnauthorizedHandler, APP_VERSION_HEADER};
