//! Execution platform (n8n public API) client

use async_trait::async_trait;
use openapi_client::models::{ExecuteWorkflowRequest, Execution, ListEnvelope};
use secrecy::SecretString;
use serde_json::Value;
use tracing::info;

use crate::errors::BuilderError;
use crate::http::client::HttpClient;
use crate::models::workflow::WorkflowGraph;

/// Path of the public API below an instance URL
pub const PLATFORM_API_PATH: &str = "/api/v1";

/// Default platform API base URL
pub const DEFAULT_PLATFORM_URL: &str = "http://localhost:5678/api/v1";

/// Default number of executions to list
pub const DEFAULT_EXECUTION_LIMIT: u32 = 20;

/// Page request for list endpoints
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl Pagination {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            query.push(("cursor", cursor.clone()));
        }
        query
    }
}

/// Remote workflow store and runner
#[async_trait]
pub trait WorkflowPlatform: Send + Sync {
    /// Check that the platform is reachable with the configured key
    async fn test_connection(&self) -> bool;

    /// List workflows, one page at a time
    async fn list_workflows(
        &self,
        page: Option<&Pagination>,
    ) -> Result<ListEnvelope<WorkflowGraph>, BuilderError>;

    /// Get a workflow by ID
    async fn get_workflow(&self, workflow_id: &str) -> Result<WorkflowGraph, BuilderError>;

    /// Create a workflow
    async fn create_workflow(&self, workflow: &WorkflowGraph) -> Result<WorkflowGraph, BuilderError>;

    /// Replace a workflow
    async fn update_workflow(
        &self,
        workflow_id: &str,
        workflow: &WorkflowGraph,
    ) -> Result<WorkflowGraph, BuilderError>;

    /// Delete a workflow
    async fn delete_workflow(&self, workflow_id: &str) -> Result<(), BuilderError>;

    /// Activate or deactivate a workflow
    async fn set_active(&self, workflow_id: &str, active: bool)
        -> Result<WorkflowGraph, BuilderError>;

    /// Run a workflow with an optional input payload
    async fn execute_workflow(
        &self,
        workflow_id: &str,
        data: Option<Value>,
    ) -> Result<Value, BuilderError>;

    /// Get an execution by ID
    async fn get_execution(&self, execution_id: &str) -> Result<Execution, BuilderError>;

    /// List the latest executions of a workflow
    async fn list_executions(
        &self,
        workflow_id: &str,
        limit: u32,
    ) -> Result<Vec<Execution>, BuilderError>;
}

/// n8n REST client
pub struct N8nClient {
    http: HttpClient,
}

impl N8nClient {
    /// Create a new platform client
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, BuilderError> {
        Ok(Self {
            http: HttpClient::new(base_url, api_key)?,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[async_trait]
impl WorkflowPlatform for N8nClient {
    async fn test_connection(&self) -> bool {
        self.http
            .reachable("/workflows", &[("limit", "1".to_string())])
            .await
    }

    async fn list_workflows(
        &self,
        page: Option<&Pagination>,
    ) -> Result<ListEnvelope<WorkflowGraph>, BuilderError> {
        let query = page.map(Pagination::query).unwrap_or_default();
        self.http.get("/workflows", &query, "Fetch workflows").await
    }

    async fn get_workflow(&self, workflow_id: &str) -> Result<WorkflowGraph, BuilderError> {
        let path = format!("/workflows/{}", workflow_id);
        self.http.get(&path, &[], "Fetch workflow").await
    }

    async fn create_workflow(&self, workflow: &WorkflowGraph) -> Result<WorkflowGraph, BuilderError> {
        let created: WorkflowGraph = self
            .http
            .post("/workflows", Some(workflow), "Create workflow")
            .await?;
        info!(
            "Created workflow '{}' ({})",
            created.name,
            created.id.as_deref().unwrap_or("no id")
        );
        Ok(created)
    }

    async fn update_workflow(
        &self,
        workflow_id: &str,
        workflow: &WorkflowGraph,
    ) -> Result<WorkflowGraph, BuilderError> {
        let path = format!("/workflows/{}", workflow_id);
        self.http.put(&path, workflow, "Update workflow").await
    }

    async fn delete_workflow(&self, workflow_id: &str) -> Result<(), BuilderError> {
        let path = format!("/workflows/{}", workflow_id);
        self.http.delete(&path, "Delete workflow").await
    }

    async fn set_active(
        &self,
        workflow_id: &str,
        active: bool,
    ) -> Result<WorkflowGraph, BuilderError> {
        let (action, op) = if active {
            ("activate", "Activate workflow")
        } else {
            ("deactivate", "Deactivate workflow")
        };
        let path = format!("/workflows/{}/{}", workflow_id, action);
        self.http.post::<_, Value>(&path, None, op).await
    }

    async fn execute_workflow(
        &self,
        workflow_id: &str,
        data: Option<Value>,
    ) -> Result<Value, BuilderError> {
        let path = format!("/workflows/{}/execute", workflow_id);
        let body = ExecuteWorkflowRequest { data };
        self.http.post(&path, Some(&body), "Execute workflow").await
    }

    async fn get_execution(&self, execution_id: &str) -> Result<Execution, BuilderError> {
        let path = format!("/executions/{}", execution_id);
        self.http.get(&path, &[], "Fetch execution").await
    }

    async fn list_executions(
        &self,
        workflow_id: &str,
        limit: u32,
    ) -> Result<Vec<Execution>, BuilderError> {
        let query = [
            ("workflowId", workflow_id.to_string()),
            ("limit", limit.to_string()),
        ];
        let envelope: ListEnvelope<Execution> =
            self.http.get("/executions", &query, "Fetch executions").await?;
        Ok(envelope.data)
    }
}
