//! Trellis Store
//!
//! This crate provides the storage boundary for workflow objects. The
//! operator persists a workflow's full status through [`WorkflowStore`]
//! after any evaluation pass that changed a node; the external watch loop
//! reads workflows back out to decide when to evaluate next.
//!
//! Persistence is idempotent from the caller's perspective: `update` is an
//! upsert of the workflow's current state, so a retried update after a
//! reported error is safe.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use trellis_workflow::Workflow;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The requested workflow was not found.
  #[error("workflow not found: {0}")]
  NotFound(String),

  /// The storage backend failed.
  #[error("store backend error: {0}")]
  Backend(#[from] anyhow::Error),
}

/// Storage trait for workflow objects.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
  /// Get a workflow by name.
  async fn get(&self, name: &str) -> Result<Workflow, StoreError>;

  /// List all stored workflows.
  async fn list(&self) -> Result<Vec<Workflow>, StoreError>;

  /// Persist a workflow's current state. Upserts; safe to retry.
  async fn update(&self, workflow: &Workflow) -> Result<(), StoreError>;
}
