//! Trellis Workflow
//!
//! This crate provides the workflow data model for Trellis: the declarative
//! spec (entrypoint plus template library), the per-run node status table,
//! and the deterministic node identity scheme shared by every evaluation
//! pass.
//!
//! A workflow's spec is immutable for the duration of a run. Only the
//! operator mutates the status, and only through its own working copy;
//! callers holding a cached `Workflow` never see partial state.

mod error;
mod id;
mod node;
mod template;
mod validate;
mod workflow;

pub use error::WorkflowError;
pub use id::node_id;
pub use node::{NodePhase, NodeStatus};
pub use template::{ContainerTemplate, StepGroup, StepsTemplate, Template, WorkflowStep};
pub use workflow::{Workflow, WorkflowSpec, WorkflowStatus};
