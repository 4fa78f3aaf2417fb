//! Pushing validated graphs to the execution platform

use tracing::{info, warn};

use crate::errors::BuilderError;
use crate::http::platform::WorkflowPlatform;
use crate::models::workflow::WorkflowGraph;

/// Validate `graph` and create it on the platform.
///
/// Nothing is sent when validation fails. With `activate` set, the created
/// workflow is switched on as well.
pub async fn deploy(
    platform: &dyn WorkflowPlatform,
    graph: &WorkflowGraph,
    activate: bool,
) -> Result<WorkflowGraph, BuilderError> {
    let report = graph.validate();
    if !report.valid {
        warn!("Refusing to deploy '{}': {:?}", graph.name, report.errors);
        return Err(BuilderError::ValidationFailed(report.errors));
    }
    for warning in &report.warnings {
        warn!("Deploying '{}' with warning: {}", graph.name, warning);
    }

    // The platform assigns IDs and activation state itself
    let mut payload = graph.clone();
    payload.id = None;
    payload.active = false;

    let created = platform.create_workflow(&payload).await?;
    info!("Workflow '{}' deployed", created.name);

    match (&created.id, activate) {
        (Some(id), true) => platform.set_active(id, true).await,
        (None, true) => {
            warn!("Platform returned no workflow ID; skipping activation");
            Ok(created)
        }
        _ => Ok(created),
    }
}
