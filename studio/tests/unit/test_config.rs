//! Settings and API configuration storage tests

use velo_studio::app::state::AppState;
use velo_studio::errors::BuilderError;
use velo_studio::logs::LogLevel;
use velo_studio::storage::api_config::{load_api_config, save_api_config, ApiConfig};
use velo_studio::storage::layout::StorageLayout;
use velo_studio::storage::settings::{load_settings, Settings};

#[tokio::test]
async fn test_missing_files_yield_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::new(dir.path());

    let config = load_api_config(&layout.api_config_file()).await.unwrap();
    assert_eq!(config, ApiConfig::default());

    let settings = load_settings(&layout.settings_file()).await.unwrap();
    assert_eq!(settings.log_level, LogLevel::Info);
    assert_eq!(settings.server.port, 8787);
}

#[tokio::test]
async fn test_api_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::new(dir.path().join("nested"));
    let file = layout.api_config_file();

    let config = ApiConfig {
        openrouter_api_key: "sk-or-v1-abcdef".to_string(),
        n8n_url: "http://n8n.local:5678".to_string(),
        n8n_api_key: "n8n-key-1234".to_string(),
    };
    save_api_config(&file, &config).await.unwrap();

    let loaded = load_api_config(&file).await.unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.platform_url(), "http://n8n.local:5678/api/v1");

    let stored: serde_json::Value = file.read_json().await.unwrap();
    assert_eq!(stored["openRouterKey"], "sk-or-v1-abcdef");
    assert_eq!(stored["n8nUrl"], "http://n8n.local:5678");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[tokio::test]
async fn test_save_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let file = StorageLayout::new(dir.path()).api_config_file();

    let mut config = ApiConfig {
        n8n_api_key: "first".to_string(),
        ..Default::default()
    };
    save_api_config(&file, &config).await.unwrap();
    config.n8n_api_key = "second".to_string();
    save_api_config(&file, &config).await.unwrap();

    assert_eq!(load_api_config(&file).await.unwrap().n8n_api_key, "second");
}

#[tokio::test]
async fn test_corrupt_config_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = StorageLayout::new(dir.path()).api_config_file();
    std::fs::write(file.path(), "{ not json").unwrap();

    let result = load_api_config(&file).await;
    assert!(matches!(result, Err(BuilderError::StorageError(_))));
}

#[tokio::test]
async fn test_state_starts_over_corrupt_config() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::new(dir.path());
    std::fs::write(layout.api_config_file().path(), "{ not json").unwrap();

    let state = AppState::init(&layout, Settings::default()).await.unwrap();
    assert_eq!(*state.api_config.read().await, ApiConfig::default());

    let services = state.services().await;
    assert!(services.platform.is_none());
    assert!(!services.drafter.has_provider());
}

#[tokio::test]
async fn test_partial_settings_fill_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::new(dir.path());
    std::fs::write(
        layout.settings_file().path(),
        r#"{"log_level": "debug", "server": {"port": 9000}}"#,
    )
    .unwrap();

    let settings = load_settings(&layout.settings_file()).await.unwrap();
    assert_eq!(settings.log_level, LogLevel::Debug);
    assert_eq!(settings.server.port, 9000);
    assert_eq!(settings.server.host, "127.0.0.1");
    assert!(!settings.log_to_file);
}

#[test]
fn test_redacted_masks_keys() {
    let config = ApiConfig {
        openrouter_api_key: "sk-or-v1-abcdef".to_string(),
        n8n_url: "http://n8n.local".to_string(),
        n8n_api_key: String::new(),
    };
    let redacted = config.redacted();
    assert_eq!(redacted.openrouter_api_key, "***********cdef");
    assert_eq!(redacted.n8n_api_key, "");
    assert_eq!(redacted.n8n_url, "http://n8n.local");
}
