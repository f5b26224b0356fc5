//! Client core for the Malmoon speech-therapy platform.
//!
//! The `data` feature exposes the domain types, forms, DTOs and repository
//! traits. The default `client` feature adds the REST repository, the
//! services driving each page and the `malmoon` terminal front-end.

pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
#[cfg(feature = "client")]
pub mod models;
pub mod repository;
#[cfg(feature = "client")]
pub mod services;

/// Interval between chat transcript fetches.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;
