//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::app::state::AppState;
use crate::errors::BuilderError;
use crate::server::handlers::{
    activate_handler, chat_handler, chat_history_handler, deactivate_handler, delete_workflow_handler,
    deploy_handler, diagram_handler, draft_handler, edit_handler, emotion_handler, execute_handler,
    execution_handler, executions_handler, get_config_handler, get_workflow_handler, health_handler,
    import_handler, improve_handler, list_workflows_handler, parse_handler, put_config_handler,
    test_config_handler, update_workflow_handler, validate_handler, version_handler,
};

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Local graph operations
        .route("/workflows/parse", post(parse_handler))
        .route("/workflows/draft", post(draft_handler))
        .route("/workflows/improve", post(improve_handler))
        .route("/workflows/import", post(import_handler))
        .route("/workflows/validate", post(validate_handler))
        .route("/workflows/diagram", post(diagram_handler))
        .route("/workflows/edit", post(edit_handler))
        .route("/workflows/deploy", post(deploy_handler))
        // Execution platform passthrough
        .route("/platform/workflows", get(list_workflows_handler))
        .route(
            "/platform/workflows/{id}",
            get(get_workflow_handler)
                .put(update_workflow_handler)
                .delete(delete_workflow_handler),
        )
        .route("/platform/workflows/{id}/activate", post(activate_handler))
        .route("/platform/workflows/{id}/deactivate", post(deactivate_handler))
        .route("/platform/workflows/{id}/execute", post(execute_handler))
        .route("/platform/workflows/{id}/executions", get(executions_handler))
        .route("/platform/executions/{id}", get(execution_handler))
        // Voice and assistant
        .route("/emotion", post(emotion_handler))
        .route("/chat", post(chat_handler))
        .route("/chat/history", get(chat_history_handler))
        // Configuration
        .route("/config", get(get_config_handler).put(put_config_handler))
        .route("/config/test", get(test_config_handler))
        // State and middleware
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<AppState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), BuilderError>>, BuilderError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| BuilderError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| BuilderError::ServerError(e.to_string()))
    });

    Ok(handle)
}
