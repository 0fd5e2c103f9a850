//! Domain aggregates exposed by the registry service layer.

pub mod customer;
pub mod dashboard;
pub mod profile;
pub mod query;
pub mod types;
