//! In-memory agent that records every delivered request.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::debug;

use super::types::{Acknowledgement, RemoteAgent, RemoteExecutionError};
use crate::manager::InvocationRequest;
use crate::util::hash::Hashable;

/// Agent that accepts every request and keeps it for inspection.
///
/// Used by `xa dispatch` for local runs and by tests.
#[derive(Debug, Default)]
pub struct RecordingAgent {
  delivered: Mutex<Vec<InvocationRequest>>,
  closed: AtomicBool,
}

impl RecordingAgent {
  pub fn new() -> Self {
    Self::default()
  }

  /// Refuse all further requests with [`RemoteExecutionError::TransportClosed`].
  pub fn close(&self) {
    self.closed.store(true, Ordering::SeqCst);
  }

  /// Requests delivered so far, in arrival order.
  pub async fn delivered(&self) -> Vec<InvocationRequest> {
    self.delivered.lock().await.clone()
  }
}

impl RemoteAgent for RecordingAgent {
  async fn invoke(&self, request: &InvocationRequest) -> Result<Acknowledgement, RemoteExecutionError> {
    if self.closed.load(Ordering::SeqCst) {
      return Err(RemoteExecutionError::TransportClosed {
        function_name: request.function_name.clone(),
      });
    }

    let key = request.compute_hash().map_err(|e| RemoteExecutionError::Rejected {
      function_name: request.function_name.clone(),
      operation: request.operation(),
      reason: e.to_string(),
    })?;

    debug!(function = %request.function_name, key = %key, "recorded request");
    self.delivered.lock().await.push(request.clone());
    Ok(Acknowledgement::for_request(request, key))
  }
}
