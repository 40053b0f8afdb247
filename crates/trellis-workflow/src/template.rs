use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A set of steps with no ordering dependency among themselves.
///
/// Keys are step names, unique within the group. Iteration order is
/// irrelevant to the outcome; a group gates entry to the next group in the
/// sequence.
pub type StepGroup = HashMap<String, WorkflowStep>;

/// A reusable unit definition in the workflow's template library.
///
/// The variant set is closed: a template is either an atomic unit of work
/// or an ordered sequence of step groups. Composite templates may reference
/// other templates by name, so a single node can expand into a sub-DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Template {
  /// An atomic unit of work dispatched to the external launcher.
  Container(ContainerTemplate),
  /// An ordered sequence of step groups.
  Steps(StepsTemplate),
}

/// Launch parameters for an atomic unit of work.
///
/// The payload is opaque to the evaluator; it is handed to the launcher
/// unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerTemplate {
  #[serde(default)]
  pub container: serde_json::Value,
}

/// The step groups of a composite template.
///
/// Order between groups is significant: group `i + 1` may not begin until
/// group `i` has fully resolved successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepsTemplate {
  pub groups: Vec<StepGroup>,
}

/// A reference from a step to the template it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
  /// Name of the target template in the library.
  pub template: String,
  /// Opaque arguments forwarded down to leaf execution.
  #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
  pub arguments: serde_json::Value,
}
