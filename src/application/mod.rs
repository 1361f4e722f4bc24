//! Application layer: Use cases and session state.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod action;
mod history;
mod service;
mod session;
mod toast;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{Action, Job, JobResult, Outcome, Task};
pub use history::{OperationHistory, HISTORY_CAPACITY};
pub use service::{Created, Decrypted, LoadReport, Stage, SubscriptionService};
pub use session::{Completion, Session};
pub use toast::{Toast, ToastKind, ERROR_TTL, SUCCESS_TTL};
