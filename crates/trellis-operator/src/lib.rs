//! Trellis Operator
//!
//! The evaluation core of Trellis: given a workflow snapshot and its
//! current progress, one call to [`Operator::operate`] decides the next
//! unit of work, requests exactly one execution unit per logical leaf node,
//! and aggregates child outcomes into parent outcomes.
//!
//! # Architecture
//!
//! ```text
//! Operator::operate(workflow)
//! ├── private working copy + node table init
//! └── OperationContext::execute_template(entrypoint)
//!     ├── container template -> at-most-one Launcher::launch
//!     └── steps template -> execute_step_group per ordered group
//!         └── execute_template per step (recursion)
//! ```
//!
//! A pass is bounded: it makes whatever progress the node table allows and
//! returns without waiting for launched units of work. Completion of a unit
//! is recorded by the external watch mechanism via
//! [`trellis_workflow::Workflow::complete_node`]; the next pass aggregates
//! it upward. Re-invoking `operate` against an unchanged workflow is a
//! no-op: terminal nodes are never revisited and running leaves are left
//! in flight.
//!
//! One pass evaluates one workflow on a single logical thread of control;
//! callers must not run two passes over the same workflow concurrently.
//! Distinct workflows may be operated concurrently without restriction.

mod context;
mod error;
mod events;
mod launcher;
mod operator;

pub use error::OperationError;
pub use events::{ChannelNotifier, NoopNotifier, OperationEvent, OperationNotifier};
pub use launcher::{LaunchError, Launcher};
pub use operator::{OperationResult, Operator};
