//! Deployment tests

use velo_studio::deploy::deploy;
use velo_studio::errors::BuilderError;
use velo_studio::generator::parse;
use velo_studio::models::workflow::{Node, WorkflowGraph};

use crate::fakes::FakePlatform;

#[tokio::test]
async fn test_invalid_graph_is_never_sent() {
    let platform = FakePlatform::default();
    let mut graph = WorkflowGraph::new("No trigger");
    graph
        .nodes
        .push(Node::new("a", "Send Email", "n8n-nodes-base.gmail", [0.0, 0.0]));

    match deploy(&platform, &graph, true).await {
        Err(BuilderError::ValidationFailed(errors)) => {
            assert_eq!(errors, ["Workflow must have at least one trigger node"]);
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert_eq!(platform.created_count(), 0);
}

#[tokio::test]
async fn test_deploy_strips_id_and_activation() {
    let platform = FakePlatform::default();
    let mut graph = parse("typeform to airtable");
    graph.id = Some("local-7".to_string());
    graph.active = true;

    let created = deploy(&platform, &graph, false).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("wf-1"));
    assert!(!created.active);

    let sent = &platform.created.lock().unwrap()[0];
    assert!(!sent.active);
    assert_eq!(sent.nodes, graph.nodes);
    assert!(platform.activated.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_deploy_and_activate() {
    let platform = FakePlatform::default();
    let created = deploy(&platform, &parse("payment email"), true)
        .await
        .unwrap();

    assert!(created.active);
    assert_eq!(*platform.activated.lock().unwrap(), ["wf-1"]);
}
