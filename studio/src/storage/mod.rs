//! Persisted configuration

pub mod api_config;
pub mod layout;
pub mod settings;
