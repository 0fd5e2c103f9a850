//! DTO modules that bridge services with templates and APIs.

pub mod api;
pub mod customers;
pub mod dashboard;
pub mod management;
pub mod reports;
