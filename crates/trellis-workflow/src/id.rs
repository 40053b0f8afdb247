//! Deterministic node identity.
//!
//! Node ids are part of the persisted-state contract: repeated evaluation
//! passes, including passes in a restarted process, must address the same
//! table entry for the same logical position. The id is therefore a pure
//! function of the workflow name and the node's structural path, with no
//! wall-clock or random component.

use sha2::{Digest, Sha256};

/// Hex characters of the path digest kept in a node id.
const DIGEST_LEN: usize = 10;

/// Derive the node id for a fully qualified node name.
///
/// The same `(workflow_name, node_name)` pair always yields the same id.
pub fn node_id(workflow_name: &str, node_name: &str) -> String {
  let digest = Sha256::digest(node_name.as_bytes());
  format!("{}-{}", workflow_name, &hex::encode(digest)[..DIGEST_LEN])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_name_same_id() {
    assert_eq!(node_id("demo", "demo[0].fetch"), node_id("demo", "demo[0].fetch"));
  }

  #[test]
  fn distinct_paths_distinct_ids() {
    let a = node_id("demo", "demo[0].fetch");
    let b = node_id("demo", "demo[0].parse");
    let c = node_id("demo", "demo[1].fetch");
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_ne!(b, c);
  }

  #[test]
  fn id_is_prefixed_with_workflow_name() {
    let id = node_id("demo", "demo");
    assert!(id.starts_with("demo-"));
    assert_eq!(id.len(), "demo-".len() + 10);
  }
}
