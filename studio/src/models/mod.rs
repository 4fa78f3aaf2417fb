//! Data models

pub mod chat;
pub mod workflow;
