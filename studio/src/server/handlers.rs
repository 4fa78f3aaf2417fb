//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use openapi_client::models::{Execution, ListEnvelope};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::state::AppState;
use crate::assistant::{AssistantMode, AssistantSession};
use crate::deploy::deploy;
use crate::diagram::to_mermaid;
use crate::drafter::Draft;
use crate::editor::{apply_edits, EditOp};
use crate::emotion::{classify, EmotionReading};
use crate::generator::{import_generated, parse};
use crate::http::completions::CompletionProvider;
use crate::http::platform::{Pagination, WorkflowPlatform, DEFAULT_EXECUTION_LIMIT};
use crate::models::chat::{AssistantReply, ChatMessage};
use crate::models::workflow::WorkflowGraph;
use crate::server::errors::HandlerError;
use crate::storage::api_config::ApiConfig;
use crate::utils::version_info;
use crate::validation::{validate, ValidationReport};

type HandlerResult<T> = Result<Json<T>, HandlerError>;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "velo-studio".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    Json(version_info())
}

// ================================ LOCAL GRAPHS =================================== //

/// Prompt request
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// A graph with its report and diagram
#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub graph: WorkflowGraph,
    pub report: ValidationReport,
    pub diagram: String,
}

impl GraphResponse {
    fn new(graph: WorkflowGraph) -> Self {
        let report = graph.validate();
        Self::with_report(graph, report)
    }

    fn with_report(graph: WorkflowGraph, report: ValidationReport) -> Self {
        let diagram = to_mermaid(&graph);
        Self {
            graph,
            report,
            diagram,
        }
    }
}

/// Keyword-parse a prompt
pub async fn parse_handler(Json(request): Json<PromptRequest>) -> impl IntoResponse {
    Json(GraphResponse::new(parse(&request.prompt)))
}

/// Draft response
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    #[serde(flatten)]
    pub draft: Draft,
    pub diagram: String,
}

impl From<Draft> for DraftResponse {
    fn from(draft: Draft) -> Self {
        let diagram = to_mermaid(&draft.graph);
        Self { draft, diagram }
    }
}

/// Draft a graph with the language model, falling back to the keyword parser
pub async fn draft_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromptRequest>,
) -> HandlerResult<DraftResponse> {
    let drafter = state.services().await.drafter;
    let draft = drafter.draft(&request.prompt).await?;
    Ok(Json(draft.into()))
}

/// Improvement request
#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub workflow: WorkflowGraph,
    pub request: String,
}

/// Revise a graph with the language model
pub async fn improve_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImproveRequest>,
) -> HandlerResult<DraftResponse> {
    let drafter = state.services().await.drafter;
    let draft = drafter.improve(&request.workflow, &request.request).await?;
    Ok(Json(draft.into()))
}

/// Raw model output
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub text: String,
}

/// Import a graph from model output or exported JSON
pub async fn import_handler(Json(request): Json<ImportRequest>) -> HandlerResult<GraphResponse> {
    let imported = import_generated(&request.text)?;
    Ok(Json(GraphResponse::with_report(imported.graph, imported.report)))
}

/// Validate an arbitrary JSON graph
pub async fn validate_handler(Json(workflow): Json<Value>) -> impl IntoResponse {
    Json(validate(&workflow))
}

/// Diagram response
#[derive(Debug, Serialize)]
pub struct DiagramResponse {
    pub diagram: String,
}

/// Project a graph to Mermaid text
pub async fn diagram_handler(Json(graph): Json<WorkflowGraph>) -> impl IntoResponse {
    Json(DiagramResponse {
        diagram: to_mermaid(&graph),
    })
}

/// Edit request
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub workflow: WorkflowGraph,
    pub edits: Vec<EditOp>,
}

/// Apply editor operations to a graph and return the result
pub async fn edit_handler(Json(request): Json<EditRequest>) -> HandlerResult<GraphResponse> {
    let mut graph = request.workflow;
    apply_edits(&mut graph, &request.edits)?;
    Ok(Json(GraphResponse::new(graph)))
}

/// Deploy request
#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    pub workflow: WorkflowGraph,
    #[serde(default)]
    pub activate: bool,
}

/// Validate and create a graph on the platform
pub async fn deploy_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeployRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let platform = state.services().await.require_platform()?;
    let created = deploy(platform.as_ref(), &request.workflow, request.activate).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ============================== PLATFORM PASSTHROUGH ============================= //

async fn platform(state: &AppState) -> Result<Arc<dyn WorkflowPlatform>, HandlerError> {
    Ok(state.services().await.require_platform()?)
}

/// Pagination query
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// List workflows on the platform
pub async fn list_workflows_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<ListEnvelope<WorkflowGraph>> {
    let page = Pagination {
        limit: query.limit,
        cursor: query.cursor,
    };
    let workflows = platform(&state).await?.list_workflows(Some(&page)).await?;
    Ok(Json(workflows))
}

/// Get a workflow from the platform
pub async fn get_workflow_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult<WorkflowGraph> {
    Ok(Json(platform(&state).await?.get_workflow(&id).await?))
}

/// Replace a workflow on the platform
pub async fn update_workflow_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(graph): Json<WorkflowGraph>,
) -> HandlerResult<WorkflowGraph> {
    let report = graph.validate();
    if !report.valid {
        return Err(crate::errors::BuilderError::ValidationFailed(report.errors).into());
    }
    Ok(Json(platform(&state).await?.update_workflow(&id, &graph).await?))
}

/// Delete a workflow on the platform
pub async fn delete_workflow_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    platform(&state).await?.delete_workflow(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activate a workflow
pub async fn activate_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult<WorkflowGraph> {
    Ok(Json(platform(&state).await?.set_active(&id, true).await?))
}

/// Deactivate a workflow
pub async fn deactivate_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult<WorkflowGraph> {
    Ok(Json(platform(&state).await?.set_active(&id, false).await?))
}

/// Execution input
#[derive(Debug, Default, Deserialize)]
pub struct ExecuteRequest {
    pub data: Option<Value>,
}

/// Run a workflow
pub async fn execute_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<ExecuteRequest>>,
) -> HandlerResult<Value> {
    let data = body.and_then(|Json(request)| request.data);
    Ok(Json(platform(&state).await?.execute_workflow(&id, data).await?))
}

/// Execution listing query
#[derive(Debug, Deserialize)]
pub struct ExecutionsQuery {
    pub limit: Option<u32>,
}

/// List executions of a workflow
pub async fn executions_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ExecutionsQuery>,
) -> HandlerResult<Vec<Execution>> {
    let limit = query.limit.unwrap_or(DEFAULT_EXECUTION_LIMIT);
    Ok(Json(platform(&state).await?.list_executions(&id, limit).await?))
}

/// Get an execution
pub async fn execution_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult<Execution> {
    Ok(Json(platform(&state).await?.get_execution(&id).await?))
}

// ============================== VOICE AND ASSISTANT ============================== //

/// Transcript to classify
#[derive(Debug, Deserialize)]
pub struct EmotionRequest {
    pub text: String,
}

/// Classify the tone of a transcript
pub async fn emotion_handler(Json(request): Json<EmotionRequest>) -> impl IntoResponse {
    let reading: EmotionReading = classify(&request.text);
    Json(reading)
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub mode: AssistantMode,
    /// Model override for this and later messages
    #[serde(default)]
    pub model: Option<String>,
}

/// Chat response; `reply` is absent when the message was blank
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: Option<AssistantReply>,
}

/// Send a message to the assistant
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> HandlerResult<ChatResponse> {
    let completions = state.services().await.require_completions()?;

    let mut assistant = state.assistant.lock().await;
    let session = assistant.get_or_insert_with(|| {
        let provider: Arc<dyn CompletionProvider> = completions;
        AssistantSession::new(provider).with_model(state.settings.model.clone())
    });
    if let Some(model) = request.model {
        session.set_model(Some(model));
    }

    let reply = session.send(&request.message, request.mode).await?;
    Ok(Json(ChatResponse { reply }))
}

/// Assistant history
pub async fn chat_history_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let assistant = state.assistant.lock().await;
    let history: Vec<ChatMessage> = assistant
        .as_ref()
        .map(|session| session.history().to_vec())
        .unwrap_or_default();
    Json(history)
}

// ================================= CONFIGURATION ================================= //

/// Current configuration with keys masked
pub async fn get_config_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.api_config.read().await.redacted())
}

/// Replace and persist the configuration.
///
/// Keys sent back in their masked form keep their stored values.
pub async fn put_config_handler(
    State(state): State<Arc<AppState>>,
    Json(config): Json<ApiConfig>,
) -> HandlerResult<ApiConfig> {
    let config = config.keep_masked_keys(&*state.api_config.read().await);
    state.replace_config(config.clone()).await?;
    Ok(Json(config.redacted()))
}

/// Connection test results; `None` when the service is not configured
#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub openrouter: Option<bool>,
    pub n8n: Option<bool>,
}

/// Check both configured services
pub async fn test_config_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let services = state.services().await;
    let openrouter = match &services.completions {
        Some(client) => Some(client.test_connection().await),
        None => None,
    };
    let n8n = match &services.platform {
        Some(platform) => Some(platform.test_connection().await),
        None => None,
    };
    Json(ConnectionStatus { openrouter, n8n })
}
