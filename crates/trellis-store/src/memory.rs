use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use trellis_workflow::Workflow;

use crate::{StoreError, WorkflowStore};

/// In-memory workflow store.
///
/// Reference implementation for embedding and tests. Workflows are keyed by
/// name; `update` replaces the stored copy wholesale.
#[derive(Default)]
pub struct MemoryStore {
  workflows: RwLock<HashMap<String, Workflow>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
  async fn get(&self, name: &str) -> Result<Workflow, StoreError> {
    self
      .workflows
      .read()
      .await
      .get(name)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(name.to_string()))
  }

  async fn list(&self) -> Result<Vec<Workflow>, StoreError> {
    Ok(self.workflows.read().await.values().cloned().collect())
  }

  async fn update(&self, workflow: &Workflow) -> Result<(), StoreError> {
    self
      .workflows
      .write()
      .await
      .insert(workflow.name.clone(), workflow.clone());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use trellis_workflow::{
    ContainerTemplate, NodePhase, NodeStatus, Template, WorkflowSpec, WorkflowStatus,
  };

  use super::*;

  fn sample(name: &str) -> Workflow {
    let mut templates = HashMap::new();
    templates.insert(
      "work".to_string(),
      Template::Container(ContainerTemplate {
        container: serde_json::json!({"image": "alpine:3.20"}),
      }),
    );
    Workflow {
      name: name.to_string(),
      spec: WorkflowSpec {
        entrypoint: "work".to_string(),
        templates,
      },
      status: WorkflowStatus::default(),
    }
  }

  #[tokio::test]
  async fn get_missing_workflow() {
    let store = MemoryStore::new();
    let err = store.get("nope").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
  }

  #[tokio::test]
  async fn update_then_get() {
    let store = MemoryStore::new();
    store.update(&sample("demo")).await.unwrap();
    let loaded = store.get("demo").await.unwrap();
    assert_eq!(loaded.name, "demo");
  }

  #[tokio::test]
  async fn update_replaces_status() {
    let store = MemoryStore::new();
    let mut wf = sample("demo");
    store.update(&wf).await.unwrap();

    let id = wf.node_id("demo");
    let mut nodes = HashMap::new();
    nodes.insert(
      id.clone(),
      NodeStatus {
        id,
        name: "demo".to_string(),
        phase: NodePhase::Running,
      },
    );
    wf.status.nodes = Some(nodes);
    store.update(&wf).await.unwrap();

    let loaded = store.get("demo").await.unwrap();
    assert!(loaded.status.nodes.is_some());
    assert_eq!(loaded, wf);
  }

  #[tokio::test]
  async fn list_returns_all() {
    let store = MemoryStore::new();
    store.update(&sample("one")).await.unwrap();
    store.update(&sample("two")).await.unwrap();
    let mut names: Vec<String> = store
      .list()
      .await
      .unwrap()
      .into_iter()
      .map(|wf| wf.name)
      .collect();
    names.sort();
    assert_eq!(names, vec!["one", "two"]);
  }
}
