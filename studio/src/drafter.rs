//! Workflow drafting with the language model and local fallback

use std::sync::Arc;

use openapi_client::models::ChatTurn;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::BuilderError;
use crate::generator::{import_generated, parse, ImportedGraph};
use crate::http::completions::{CompletionProvider, CompletionRequest, Sampling};
use crate::models::workflow::WorkflowGraph;
use crate::prompts::{WORKFLOW_GENERATOR, WORKFLOW_OPTIMIZER};
use crate::validation::ValidationReport;

const GENERATE_SAMPLING: Sampling = Sampling {
    temperature: 0.3,
    max_tokens: 2000,
    top_p: Some(0.9),
};

const IMPROVE_SAMPLING: Sampling = Sampling {
    temperature: 0.2,
    max_tokens: 2000,
    top_p: None,
};

/// Where a drafted graph came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftSource {
    /// Parsed from language-model output
    Generated,
    /// Built by the keyword parser
    Local,
}

/// A drafted graph with its validation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub graph: WorkflowGraph,
    pub source: DraftSource,
    pub report: ValidationReport,
}

impl Draft {
    fn new(graph: WorkflowGraph, source: DraftSource) -> Self {
        let report = graph.validate();
        Self {
            graph,
            source,
            report,
        }
    }

    /// Keep the report taken from the model's JSON as received
    fn generated(imported: ImportedGraph) -> Self {
        Self {
            graph: imported.graph,
            source: DraftSource::Generated,
            report: imported.report,
        }
    }
}

/// Drafts workflow graphs from prompts
#[derive(Clone, Default)]
pub struct WorkflowDrafter {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl WorkflowDrafter {
    /// Drafter that only uses the keyword parser
    pub fn local() -> Self {
        Self { provider: None }
    }

    /// Drafter backed by a language model
    pub fn with_provider(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Whether a language model is configured
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Draft a graph for `prompt`.
    ///
    /// Model output that is not JSON falls back to the keyword parser. JSON
    /// that breaks the graph rules is kept and its problems are reported.
    /// Request failures are returned to the caller.
    pub async fn draft(&self, prompt: &str) -> Result<Draft, BuilderError> {
        let Some(provider) = &self.provider else {
            return Ok(Draft::new(parse(prompt), DraftSource::Local));
        };

        let request = CompletionRequest {
            model: None,
            messages: vec![
                turn("system", WORKFLOW_GENERATOR),
                turn("user", prompt),
            ],
            sampling: GENERATE_SAMPLING,
        };
        let completion = provider.complete(&request).await?;
        info!(
            "Model {} drafted a workflow ({} tokens)",
            completion.model, completion.usage.total_tokens
        );

        match import_generated(&completion.content) {
            Ok(imported) => {
                if !imported.report.valid {
                    warn!("Drafted workflow has problems: {:?}", imported.report.errors);
                }
                Ok(Draft::generated(imported))
            }
            Err(BuilderError::InvalidFormat(reason)) => {
                warn!("{}; using keyword parser instead", reason);
                Ok(Draft::new(parse(prompt), DraftSource::Local))
            }
            Err(e) => Err(e),
        }
    }

    /// Ask the model to revise `current` according to `request`
    pub async fn improve(
        &self,
        current: &WorkflowGraph,
        request: &str,
    ) -> Result<Draft, BuilderError> {
        let Some(provider) = &self.provider else {
            return Err(BuilderError::ConfigError(
                "Improving a workflow requires a language-model API key".to_string(),
            ));
        };

        let content = format!(
            "Current workflow: {}\n\nImprovement request: {}",
            serde_json::to_string(current)?,
            request
        );
        let completion = provider
            .complete(&CompletionRequest {
                model: None,
                messages: vec![turn("system", WORKFLOW_OPTIMIZER), turn("user", &content)],
                sampling: IMPROVE_SAMPLING,
            })
            .await?;

        Ok(Draft::generated(import_generated(&completion.content)?))
    }
}

fn turn(role: &str, content: &str) -> ChatTurn {
    ChatTurn {
        role: role.to_string(),
        content: content.to_string(),
    }
}
