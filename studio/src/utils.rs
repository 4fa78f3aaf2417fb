//! Utility functions

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Version information for velo-studio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Generate a random UUID v4
pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Milliseconds since the Unix epoch
pub fn unix_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

static CODE_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)^```(?:json)?\s*(.*?)\s*(?:```)?$").ok());

static WHITESPACE_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());

/// Strip a surrounding markdown code fence (```json ... ``` or ``` ... ```)
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    CODE_FENCE
        .as_ref()
        .and_then(|fence| fence.captures(trimmed))
        .and_then(|captures| captures.get(1))
        .map_or(trimmed, |body| body.as_str())
}

/// Replace every whitespace run with a single underscore
pub fn underscore_whitespace(text: &str) -> String {
    match WHITESPACE_RUN.as_ref() {
        Some(run) => run.replace_all(text, "_").into_owned(),
        None => text.to_string(),
    }
}
