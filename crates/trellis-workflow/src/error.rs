use thiserror::Error;

use crate::node::NodePhase;

#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("node not found: {0}")]
  NodeNotFound(String),

  #[error("phase {phase:?} is not terminal")]
  NotTerminal { phase: NodePhase },

  #[error("node '{node}' already completed as {phase:?}")]
  AlreadyCompleted { node: String, phase: NodePhase },

  #[error("entrypoint template '{0}' undefined")]
  UndefinedEntrypoint(String),

  #[error("template '{referenced_by}' references undefined template '{template}'")]
  UndefinedStepTemplate {
    referenced_by: String,
    template: String,
  },

  #[error("step group {group} of template '{template}' is empty")]
  EmptyStepGroup { template: String, group: usize },

  #[error("template '{0}' is recursively defined")]
  RecursiveTemplate(String),
}
