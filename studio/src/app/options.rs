//! Application configuration options

use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Storage layout paths
    pub layout: StorageLayout,

    /// Process settings
    pub settings: Settings,

    /// Local HTTP server configuration
    pub server: ServerOptions,
}

impl AppOptions {
    /// Options for `layout`, taking server options from `settings`
    pub fn new(layout: StorageLayout, settings: Settings) -> Self {
        let server = ServerOptions {
            host: settings.server.host.clone(),
            port: settings.server.port,
        };
        Self {
            layout,
            settings,
            server,
        }
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}
