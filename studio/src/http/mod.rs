//! HTTP clients for the external services

pub mod client;
pub mod completions;
pub mod platform;
