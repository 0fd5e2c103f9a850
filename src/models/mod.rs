//! Database models and request-scoped models shared across the registry.

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod customer;
pub mod profile;
