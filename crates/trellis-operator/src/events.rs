//! Operation events and notifiers for observability.
//!
//! Events are emitted as the evaluator moves nodes through the state
//! machine, so consumers can observe progress, stream to UIs, or mirror
//! transitions elsewhere without hooking into the evaluator itself.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use trellis_workflow::NodePhase;

/// Events emitted during an evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OperationEvent {
  /// A node was created and is now running.
  NodeStarted { node_id: String, node_name: String },

  /// A node reached a terminal phase.
  NodeCompleted {
    node_id: String,
    node_name: String,
    phase: NodePhase,
  },

  /// The workflow's entrypoint node reached a terminal phase.
  WorkflowCompleted { workflow: String, phase: NodePhase },
}

/// Trait for receiving operation events.
///
/// The operator calls `notify` for each event. Implementations decide
/// what to do with them (persist, broadcast, log, ignore).
pub trait OperationNotifier: Send + Sync {
  fn notify(&self, event: OperationEvent);
}

/// A no-op notifier that discards all events.
///
/// Useful for tests or when event observation is not needed.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl OperationNotifier for NoopNotifier {
  fn notify(&self, _event: OperationEvent) {}
}

/// A notifier that sends events to an unbounded channel.
///
/// The channel is unbounded so a slow consumer cannot stall an evaluation
/// pass; volume is low (a handful of events per node lifetime).
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<OperationEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<OperationEvent>) -> Self {
    Self { sender }
  }
}

impl OperationNotifier for ChannelNotifier {
  fn notify(&self, event: OperationEvent) {
    // Receiver may have been dropped; events are best-effort.
    let _ = self.sender.send(event);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn channel_notifier_delivers_events() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let notifier = ChannelNotifier::new(tx);

    notifier.notify(OperationEvent::NodeStarted {
      node_id: "demo-0000000000".to_string(),
      node_name: "demo".to_string(),
    });

    match rx.try_recv().unwrap() {
      OperationEvent::NodeStarted { node_name, .. } => assert_eq!(node_name, "demo"),
      other => panic!("unexpected event: {other:?}"),
    }
  }

  #[test]
  fn channel_notifier_tolerates_dropped_receiver() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let notifier = ChannelNotifier::new(tx);
    notifier.notify(OperationEvent::WorkflowCompleted {
      workflow: "demo".to_string(),
      phase: NodePhase::Succeeded,
    });
  }
}
