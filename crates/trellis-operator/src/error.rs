//! Evaluation errors.

use thiserror::Error;

use crate::launcher::LaunchError;

/// Hard failures reported by an evaluation pass.
///
/// Ordinary unsuccessful outcomes (`Failed` nodes) are not errors: they
/// propagate through the node table as normal terminal phases. These
/// variants cover structural spec faults and boundary-call failures only.
#[derive(Debug, Error)]
pub enum OperationError {
  /// A node referenced a template name with no entry in the library.
  /// Structural: re-evaluating the same spec reproduces it, so the node is
  /// recorded as a terminal `Error`.
  #[error("node '{node_name}': template '{template_name}' undefined")]
  UndefinedTemplate {
    node_name: String,
    template_name: String,
  },

  /// The launcher could not issue a launch request. The node is left
  /// absent from the table, so a later pass retries the launch.
  #[error("node '{node_name}': launch request failed")]
  Launch {
    node_name: String,
    #[source]
    source: LaunchError,
  },
}
