//! Main application run loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::app::state::AppState;
use crate::errors::BuilderError;
use crate::server::serve::serve;

/// Longest wait for in-flight requests after a shutdown signal
const MAX_SHUTDOWN_DELAY: Duration = Duration::from_secs(10);

/// Run the studio API server until `shutdown_signal` resolves
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), BuilderError> {
    info!("Initializing Velo Studio...");

    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);

    let app_state = Arc::new(AppState::init(&options.layout, options.settings.clone()).await?);
    let server_handle = init_server(&options, app_state, shutdown_tx.subscribe()).await?;

    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    let _ = shutdown_tx.send(());
    shutdown(server_handle).await
}

async fn init_server(
    options: &AppOptions,
    app_state: Arc<AppState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<JoinHandle<Result<(), BuilderError>>, BuilderError> {
    info!("Initializing local HTTP server...");

    serve(&options.server, app_state, async move {
        let _ = shutdown_rx.recv().await;
    })
    .await
}

async fn shutdown(server_handle: JoinHandle<Result<(), BuilderError>>) -> Result<(), BuilderError> {
    match tokio::time::timeout(MAX_SHUTDOWN_DELAY, server_handle).await {
        Ok(joined) => {
            joined.map_err(|e| BuilderError::ServerError(e.to_string()))??;
            info!("Shutdown complete");
            Ok(())
        }
        Err(_) => {
            error!("Shutdown timed out after {:?}", MAX_SHUTDOWN_DELAY);
            Err(BuilderError::ServerError("shutdown timed out".to_string()))
        }
    }
}
