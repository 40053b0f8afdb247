use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::id;
use crate::node::{NodePhase, NodeStatus};
use crate::template::Template;

/// The unit of orchestration: an immutable spec plus the mutable run status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
  pub name: String,
  pub spec: WorkflowSpec,
  #[serde(default)]
  pub status: WorkflowStatus,
}

/// The declarative half of a workflow. Immutable for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSpec {
  /// Name of the root template.
  pub entrypoint: String,
  /// Template library, keyed by unique template name.
  pub templates: HashMap<String, Template>,
}

/// The mutable half of a workflow, written only by the operator's working
/// copy during an evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStatus {
  /// Node status table, keyed by node id. `None` until the operator
  /// initializes it on the first pass.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub nodes: Option<HashMap<String, NodeStatus>>,
}

impl WorkflowSpec {
  /// Resolve a template by name from the library.
  pub fn template(&self, name: &str) -> Option<&Template> {
    self.templates.get(name)
  }
}

impl Workflow {
  /// Derive the deterministic node id for a fully qualified node name.
  pub fn node_id(&self, node_name: &str) -> String {
    id::node_id(&self.name, node_name)
  }

  /// Look up a node by id.
  pub fn node(&self, node_id: &str) -> Option<&NodeStatus> {
    self
      .status
      .nodes
      .as_ref()
      .and_then(|nodes| nodes.get(node_id))
  }

  /// The entrypoint node, if the evaluator has created it yet.
  ///
  /// The root node's fully qualified name is the workflow name itself.
  pub fn entry_node(&self) -> Option<&NodeStatus> {
    self.node(&self.node_id(&self.name))
  }

  /// Whether the workflow has reached a terminal state.
  pub fn completed(&self) -> bool {
    self.entry_node().is_some_and(|node| node.completed())
  }

  /// Record the observed terminal outcome of a running node.
  ///
  /// This is the interface the external watch mechanism uses when a
  /// launched unit of work finishes: the transition goes directly into the
  /// node table, and a later evaluation pass aggregates it upward. Only
  /// `Running` nodes may be completed, and only with a terminal phase.
  pub fn complete_node(
    &mut self,
    node_id: &str,
    phase: NodePhase,
  ) -> Result<(), WorkflowError> {
    if !phase.completed() {
      return Err(WorkflowError::NotTerminal { phase });
    }
    let node = self
      .status
      .nodes
      .as_mut()
      .and_then(|nodes| nodes.get_mut(node_id))
      .ok_or_else(|| WorkflowError::NodeNotFound(node_id.to_string()))?;
    if node.completed() {
      return Err(WorkflowError::AlreadyCompleted {
        node: node.name.clone(),
        phase: node.phase,
      });
    }
    node.phase = phase;
    Ok(())
  }
}
