//! The execution-unit launcher boundary.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use trellis_workflow::ContainerTemplate;

/// Error returned by a launcher implementation.
#[derive(Debug, Error)]
pub enum LaunchError {
  /// The launcher refused the request.
  #[error("launch rejected: {0}")]
  Rejected(String),

  /// The launcher backend failed.
  #[error("launcher backend error: {0}")]
  Backend(#[from] anyhow::Error),
}

/// Requests creation of execution units for leaf nodes.
///
/// The operator consults the node table before calling, so for a node it
/// has recorded as running, `launch` is never requested again.
/// Implementations must additionally be idempotent per node identity: a
/// launch that failed indeterminately (for example, a timeout after the
/// unit was partially created) is retried on a later pass with the same
/// node name and must not produce a duplicate unit.
#[async_trait]
pub trait Launcher: Send + Sync {
  /// Request creation of one execution unit for `node_name`, forwarding
  /// the template payload and arguments unchanged.
  async fn launch(
    &self,
    node_name: &str,
    template: &ContainerTemplate,
    arguments: &Value,
  ) -> Result<(), LaunchError>;
}
