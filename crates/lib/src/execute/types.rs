//! Types for dispatching lifecycle requests to remote agents.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manager::{InvocationRequest, Operation};
use crate::util::hash::ObjectHash;

/// The executor that applies a lifecycle payload to the remote resource policy.
///
/// Implementations only accept the request; the policy merge itself happens
/// on the agent's side. An `Ok` means the request was delivered, not that the
/// remote policy already reflects it.
pub trait RemoteAgent {
  fn invoke(
    &self,
    request: &InvocationRequest,
  ) -> impl Future<Output = Result<Acknowledgement, RemoteExecutionError>> + Send;
}

/// Receipt for a delivered request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
  /// Content hash of the delivered request. Redelivering the same request
  /// yields the same key.
  pub idempotency_key: ObjectHash,
  pub function_name: String,
  pub operation: Operation,
}

impl Acknowledgement {
  pub fn for_request(request: &InvocationRequest, idempotency_key: ObjectHash) -> Self {
    Self {
      idempotency_key,
      function_name: request.function_name.clone(),
      operation: request.operation(),
    }
  }
}

/// Errors reported while delivering a request.
///
/// None of these are retried by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteExecutionError {
  /// The agent did not acknowledge within the caller timeout.
  #[error("{operation} request to `{function_name}` timed out after {}s", .after.as_secs_f64())]
  Timeout {
    function_name: String,
    operation: Operation,
    after: Duration,
  },

  /// The agent refused the request.
  #[error("{operation} request to `{function_name}` rejected: {reason}")]
  Rejected {
    function_name: String,
    operation: Operation,
    reason: String,
  },

  /// The transport to the agent is gone.
  #[error("transport to `{function_name}` is closed")]
  TransportClosed { function_name: String },

  /// The delivery task panicked or was cancelled before reporting back.
  #[error("{operation} request to `{function_name}` was lost: {reason}")]
  TaskFailed {
    function_name: String,
    operation: Operation,
    reason: String,
  },
}

impl RemoteExecutionError {
  pub fn function_name(&self) -> &str {
    match self {
      RemoteExecutionError::Timeout { function_name, .. }
      | RemoteExecutionError::Rejected { function_name, .. }
      | RemoteExecutionError::TransportClosed { function_name }
      | RemoteExecutionError::TaskFailed { function_name, .. } => function_name,
    }
  }
}

/// Configuration for dispatching many managers at once.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
  /// Maximum number of requests in flight.
  pub parallelism: usize,
}

impl Default for DispatchConfig {
  fn default() -> Self {
    Self {
      parallelism: std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4),
    }
  }
}

/// Outcome of dispatching one operation for a set of managers.
///
/// Keys are manager keys (`<family>/<resource>`).
#[derive(Debug, Default)]
pub struct DispatchReport {
  pub delivered: BTreeMap<String, Acknowledgement>,
  pub failed: BTreeMap<String, RemoteExecutionError>,
}

impl DispatchReport {
  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }

  pub fn total(&self) -> usize {
    self.delivered.len() + self.failed.len()
  }
}
