//! In-memory stand-ins for the external services

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use openapi_client::models::{Execution, ListEnvelope, Usage};
use serde_json::{json, Value};

use velo_studio::errors::BuilderError;
use velo_studio::http::completions::{Completion, CompletionProvider, CompletionRequest};
use velo_studio::http::platform::{Pagination, WorkflowPlatform};
use velo_studio::models::workflow::WorkflowGraph;

/// Completion provider replaying canned replies in order
#[derive(Default)]
pub struct FakeProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeProvider {
    pub fn replying(replies: &[&str]) -> Self {
        let provider = Self::default();
        for reply in replies {
            provider.push_reply(reply);
        }
        provider
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    pub fn push_failure(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, BuilderError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no reply queued".to_string()));

        reply
            .map(|content| Completion {
                content,
                model: "fake/model".to_string(),
                usage: Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                },
            })
            .map_err(BuilderError::GenerationError)
    }
}

/// Platform that stores created workflows in memory
#[derive(Default)]
pub struct FakePlatform {
    pub created: Mutex<Vec<WorkflowGraph>>,
    pub activated: Mutex<Vec<String>>,
}

impl FakePlatform {
    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl WorkflowPlatform for FakePlatform {
    async fn test_connection(&self) -> bool {
        true
    }

    async fn list_workflows(
        &self,
        _page: Option<&Pagination>,
    ) -> Result<ListEnvelope<WorkflowGraph>, BuilderError> {
        Ok(ListEnvelope {
            data: self.created.lock().unwrap().clone(),
            next_cursor: None,
        })
    }

    async fn get_workflow(&self, workflow_id: &str) -> Result<WorkflowGraph, BuilderError> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id.as_deref() == Some(workflow_id))
            .cloned()
            .ok_or_else(|| BuilderError::NotFound(workflow_id.to_string()))
    }

    async fn create_workflow(&self, workflow: &WorkflowGraph) -> Result<WorkflowGraph, BuilderError> {
        let mut created = self.created.lock().unwrap();
        let mut stored = workflow.clone();
        stored.id = Some(format!("wf-{}", created.len() + 1));
        created.push(stored.clone());
        Ok(stored)
    }

    async fn update_workflow(
        &self,
        workflow_id: &str,
        workflow: &WorkflowGraph,
    ) -> Result<WorkflowGraph, BuilderError> {
        let mut updated = workflow.clone();
        updated.id = Some(workflow_id.to_string());
        Ok(updated)
    }

    async fn delete_workflow(&self, _workflow_id: &str) -> Result<(), BuilderError> {
        Ok(())
    }

    async fn set_active(
        &self,
        workflow_id: &str,
        active: bool,
    ) -> Result<WorkflowGraph, BuilderError> {
        self.activated.lock().unwrap().push(workflow_id.to_string());
        let mut workflow = self.get_workflow(workflow_id).await?;
        workflow.active = active;
        Ok(workflow)
    }

    async fn execute_workflow(
        &self,
        workflow_id: &str,
        data: Option<Value>,
    ) -> Result<Value, BuilderError> {
        Ok(json!({ "workflowId": workflow_id, "data": data }))
    }

    async fn get_execution(&self, execution_id: &str) -> Result<Execution, BuilderError> {
        Err(BuilderError::NotFound(execution_id.to_string()))
    }

    async fn list_executions(
        &self,
        _workflow_id: &str,
        _limit: u32,
    ) -> Result<Vec<Execution>, BuilderError> {
        Ok(Vec::new())
    }
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
