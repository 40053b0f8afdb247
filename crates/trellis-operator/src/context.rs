//! The per-pass operation context and the recursive template evaluator.

use std::collections::HashMap;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, info, warn};
use trellis_workflow::{NodePhase, NodeStatus, StepGroup, Template, Workflow};

use crate::error::OperationError;
use crate::events::{OperationEvent, OperationNotifier};
use crate::launcher::Launcher;

/// Context for one evaluation pass over one workflow.
///
/// Owns a private working copy of the workflow; the caller's instance is
/// never touched. `updated` records whether any node changed, which decides
/// whether the operator persists the copy at the end of the pass.
pub(crate) struct OperationContext<'a, L, N> {
  pub(crate) wf: Workflow,
  pub(crate) updated: bool,
  launcher: &'a L,
  notifier: &'a N,
}

impl<'a, L: Launcher, N: OperationNotifier> OperationContext<'a, L, N> {
  pub(crate) fn new(workflow: &Workflow, launcher: &'a L, notifier: &'a N) -> Self {
    Self {
      wf: workflow.clone(),
      updated: false,
      launcher,
      notifier,
    }
  }

  /// Evaluate a single named node against its resolved template.
  ///
  /// Terminal nodes are returned from untouched; this guard is what makes
  /// repeated passes safe. A leaf template launches its unit of work at
  /// most once; a composite template walks its step groups in order,
  /// short-circuiting on the first unresolved or unsuccessful group.
  pub(crate) fn execute_template(
    &mut self,
    template_name: String,
    arguments: Value,
    node_name: String,
  ) -> BoxFuture<'_, Result<(), OperationError>> {
    async move {
      debug!(node = %node_name, template = %template_name, "evaluating node");
      let node_id = self.wf.node_id(&node_name);
      if self.wf.node(&node_id).is_some_and(|node| node.completed()) {
        debug!(node = %node_name, "node already completed");
        return Ok(());
      }

      let Some(template) = self.wf.spec.template(&template_name).cloned() else {
        self.record_node(NodeStatus {
          id: node_id,
          name: node_name.clone(),
          phase: NodePhase::Error,
        });
        return Err(OperationError::UndefinedTemplate {
          node_name,
          template_name,
        });
      };

      match template {
        Template::Container(container) => {
          if self.wf.node(&node_id).is_none() {
            if let Err(source) = self
              .launcher
              .launch(&node_name, &container, &arguments)
              .await
            {
              // The node stays absent: absence is what distinguishes
              // "never attempted" from "attempted", so the next pass
              // retries the launch.
              return Err(OperationError::Launch { node_name, source });
            }
            self.record_node(NodeStatus {
              id: node_id,
              name: node_name,
              phase: NodePhase::Running,
            });
          }
          // A running unit of work is in flight; its completion is
          // recorded by the external watcher, not by the evaluator.
          Ok(())
        }

        Template::Steps(steps) => {
          if self.wf.node(&node_id).is_none() {
            self.record_node(NodeStatus {
              id: node_id.clone(),
              name: node_name.clone(),
              phase: NodePhase::Running,
            });
          }
          for (index, group) in steps.groups.iter().enumerate() {
            let group_node_name = format!("{node_name}[{index}]");
            let group_node_id = self.wf.node_id(&group_node_name);
            if let Err(err) = self.execute_step_group(group, group_node_name).await {
              self.transition(&node_id, NodePhase::Error);
              return Err(err);
            }
            match self.wf.node(&group_node_id).map(|node| node.phase) {
              Some(phase) if phase.completed() => {
                if !phase.successful() {
                  info!(node = %node_name, group = index, "step group unsuccessful");
                  self.transition(&node_id, NodePhase::Failed);
                  return Ok(());
                }
              }
              // Group still in flight; later groups may not start yet.
              _ => {
                debug!(node = %node_name, group = index, "step group not yet completed");
                return Ok(());
              }
            }
          }
          self.transition(&node_id, NodePhase::Succeeded);
          Ok(())
        }
      }
    }
    .boxed()
  }

  /// Evaluate one parallel group of steps and aggregate child outcomes
  /// into the group's own node.
  async fn execute_step_group(
    &mut self,
    group: &StepGroup,
    node_name: String,
  ) -> Result<(), OperationError> {
    let node_id = self.wf.node_id(&node_name);
    if self.wf.node(&node_id).is_some_and(|node| node.completed()) {
      debug!(node = %node_name, "step group already completed");
      return Ok(());
    }
    if self.wf.node(&node_id).is_none() {
      self.record_node(NodeStatus {
        id: node_id.clone(),
        name: node_name.clone(),
        phase: NodePhase::Running,
      });
    }

    // Advance every step in the group before looking at any outcome, so one
    // slow sibling does not keep the others from being started in this
    // pass. A hard error aborts the group immediately; siblings already
    // launched are independently idempotent and are revisited next pass.
    let mut child_ids = Vec::with_capacity(group.len());
    for (step_name, step) in group {
      let child_name = format!("{node_name}.{step_name}");
      child_ids.push(self.wf.node_id(&child_name));
      if let Err(err) = self
        .execute_template(step.template.clone(), step.arguments.clone(), child_name)
        .await
      {
        self.transition(&node_id, NodePhase::Error);
        return Err(err);
      }
    }

    // Still waiting on parallel work: the group stays running.
    if child_ids
      .iter()
      .any(|id| !self.wf.node(id).is_some_and(|node| node.completed()))
    {
      return Ok(());
    }

    // All children terminal. Determine the group outcome.
    let failed_child = child_ids
      .iter()
      .find(|id| !self.wf.node(id.as_str()).is_some_and(|node| node.successful()));
    if let Some(child) = failed_child {
      info!(node = %node_name, child = %child, "step group failed due to unsuccessful child");
      self.transition(&node_id, NodePhase::Failed);
    } else {
      info!(node = %node_name, "step group succeeded");
      self.transition(&node_id, NodePhase::Succeeded);
    }
    Ok(())
  }

  /// Insert a freshly created node and mark the table changed.
  fn record_node(&mut self, node: NodeStatus) {
    info!(node = %node.name, phase = ?node.phase, "initialized node");
    let event = if node.completed() {
      OperationEvent::NodeCompleted {
        node_id: node.id.clone(),
        node_name: node.name.clone(),
        phase: node.phase,
      }
    } else {
      OperationEvent::NodeStarted {
        node_id: node.id.clone(),
        node_name: node.name.clone(),
      }
    };
    self
      .wf
      .status
      .nodes
      .get_or_insert_with(HashMap::new)
      .insert(node.id.clone(), node);
    self.updated = true;
    self.notifier.notify(event);
  }

  /// Move an existing node to a new phase and mark the table changed.
  fn transition(&mut self, node_id: &str, phase: NodePhase) {
    let Some(node) = self
      .wf
      .status
      .nodes
      .as_mut()
      .and_then(|nodes| nodes.get_mut(node_id))
    else {
      warn!(node_id = %node_id, "transition target missing from node table");
      return;
    };
    node.phase = phase;
    let (id, name) = (node.id.clone(), node.name.clone());
    info!(node = %name, phase = ?phase, "node transitioned");
    self.updated = true;
    if phase.completed() {
      self.notifier.notify(OperationEvent::NodeCompleted {
        node_id: id,
        node_name: name,
        phase,
      });
    }
  }
}
