//! Caching subsystem.
//!
//! [`ResponseCache`] holds normalized upstream responses for a configurable
//! TTL, keyed by [`RequestSignature`]. It is owned by the
//! [`TourismClient`](crate::client::TourismClient); nothing else writes to it.

pub mod response;

pub use response::{CacheConfig, RequestSignature, ResponseCache};
