//! Backend API integration.
//!
//! This module provides the logical interface to the value-betting backend
//! and its HTTP binding, handling rate limiting and data conversion.

mod client;
mod converter;

pub use client::{BackendApi, HttpBackend};
pub use converter::{DataConverter, RawWagerRecord};

#[cfg(test)]
pub use client::MockBackendApi;
