//! The workflow operator: entry point for one evaluation pass.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error, info};
use trellis_store::WorkflowStore;
use trellis_workflow::Workflow;

use crate::context::OperationContext;
use crate::error::OperationError;
use crate::events::{NoopNotifier, OperationEvent, OperationNotifier};
use crate::launcher::Launcher;

/// Result of one evaluation pass.
#[derive(Debug)]
pub struct OperationResult {
  /// The operator's working copy, including any node changes from the
  /// pass. Feed this back into the next pass (or re-read from the store).
  pub workflow: Workflow,
  /// Whether any node changed during the pass.
  pub updated: bool,
  /// Hard evaluation error reported by the pass, if any. The failure is
  /// already recorded in the node table; this surfaces it to the caller.
  pub error: Option<OperationError>,
}

/// Drives workflows toward completion, one bounded evaluation pass at a
/// time.
///
/// Generic over the store, the launcher, and a notifier (defaulting to
/// [`NoopNotifier`]). A single operator may serve many distinct workflows;
/// the caller must serialize passes per workflow identity, since a pass
/// assumes exclusive ownership of that workflow's node table.
pub struct Operator<S, L, N = NoopNotifier> {
  store: S,
  launcher: L,
  notifier: N,
}

impl<S: WorkflowStore, L: Launcher> Operator<S, L> {
  /// Create an operator that discards operation events.
  pub fn new(store: S, launcher: L) -> Self {
    Self::with_notifier(store, launcher, NoopNotifier)
  }
}

impl<S: WorkflowStore, L: Launcher, N: OperationNotifier> Operator<S, L, N> {
  /// Create an operator with a custom notifier.
  pub fn with_notifier(store: S, launcher: L, notifier: N) -> Self {
    Self {
      store,
      launcher,
      notifier,
    }
  }

  /// Run one evaluation pass over a workflow snapshot.
  ///
  /// Works on a private copy: the caller's instance (typically an entry in
  /// a shared read-only cache) is never mutated. If any node changed, the
  /// copy is persisted through the store before returning, on both the
  /// normal and the error path. A persistence failure is logged and the
  /// in-memory result returned anyway, so progress is re-persisted rather
  /// than lost on the next pass.
  pub async fn operate(&self, workflow: &Workflow) -> OperationResult {
    if workflow.completed() {
      debug!(workflow = %workflow.name, "workflow already completed");
      return OperationResult {
        workflow: workflow.clone(),
        updated: false,
        error: None,
      };
    }

    let mut ctx = OperationContext::new(workflow, &self.launcher, &self.notifier);
    if ctx.wf.status.nodes.is_none() {
      ctx.wf.status.nodes = Some(HashMap::new());
      ctx.updated = true;
    }

    let entrypoint = ctx.wf.spec.entrypoint.clone();
    let root_node_name = ctx.wf.name.clone();
    let result = ctx
      .execute_template(entrypoint, Value::Null, root_node_name)
      .await;
    if let Err(err) = &result {
      error!(workflow = %ctx.wf.name, error = %err, "evaluation pass reported error");
    }

    if let Some(root) = ctx.wf.entry_node() {
      if root.completed() {
        info!(workflow = %ctx.wf.name, phase = ?root.phase, "workflow completed");
        self.notifier.notify(OperationEvent::WorkflowCompleted {
          workflow: ctx.wf.name.clone(),
          phase: root.phase,
        });
      }
    }

    if ctx.updated {
      if let Err(err) = self.store.update(&ctx.wf).await {
        // In-memory progress is kept; the next updating pass persists it.
        error!(workflow = %ctx.wf.name, error = %err, "failed to persist workflow status");
      }
    }

    OperationResult {
      workflow: ctx.wf,
      updated: ctx.updated,
      error: result.err(),
    }
  }
}
