//! Velo Studio Library
//!
//! Drafts n8n workflow graphs from spoken or typed prompts, checks them,
//! renders them as Mermaid diagrams and deploys them to an n8n instance.

pub mod app;
pub mod assistant;
pub mod deploy;
pub mod diagram;
pub mod drafter;
pub mod editor;
pub mod emotion;
pub mod errors;
pub mod filesys;
pub mod generator;
pub mod http;
pub mod logs;
pub mod models;
pub mod prompts;
pub mod server;
pub mod storage;
pub mod utils;
pub mod validation;
pub mod voice;
