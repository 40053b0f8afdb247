use serde::{Deserialize, Serialize};

/// Phase of a node in the expanded execution tree.
///
/// `Succeeded`, `Failed`, and `Error` are terminal: once a node reaches one
/// of them it is never revisited. `Failed` records an unsuccessful but
/// ordinary outcome of the work itself; `Error` records a structural or
/// system fault (an undefined template reference, a hard evaluation error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodePhase {
  Running,
  Succeeded,
  Failed,
  Error,
}

impl NodePhase {
  /// Whether this phase is terminal.
  pub fn completed(&self) -> bool {
    matches!(
      self,
      NodePhase::Succeeded | NodePhase::Failed | NodePhase::Error
    )
  }

  /// Whether this phase is the successful terminal phase.
  pub fn successful(&self) -> bool {
    matches!(self, NodePhase::Succeeded)
  }
}

/// Execution state of one position in the expanded execution tree.
///
/// Entries are created lazily, the first time the evaluator visits a
/// position, and are owned exclusively by their workflow's status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
  /// Deterministic id derived from the fully qualified node name.
  pub id: String,
  /// Human-readable fully qualified path (e.g. `demo[0].fetch`), sufficient
  /// to reconstruct the structural position for display and debugging.
  pub name: String,
  pub phase: NodePhase,
}

impl NodeStatus {
  pub fn completed(&self) -> bool {
    self.phase.completed()
  }

  pub fn successful(&self) -> bool {
    self.phase.successful()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn terminal_phases() {
    assert!(!NodePhase::Running.completed());
    assert!(NodePhase::Succeeded.completed());
    assert!(NodePhase::Failed.completed());
    assert!(NodePhase::Error.completed());
  }

  #[test]
  fn only_succeeded_is_successful() {
    assert!(NodePhase::Succeeded.successful());
    assert!(!NodePhase::Running.successful());
    assert!(!NodePhase::Failed.successful());
    assert!(!NodePhase::Error.successful());
  }
}
