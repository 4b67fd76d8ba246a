//! Lifecycle request dispatch.
//!
//! This module hands the requests of constructed lifecycle managers to a
//! [`RemoteAgent`]. It handles:
//! - Bounding each wait by the manager's caller timeout
//! - Parallel delivery across managers
//! - Collecting acknowledgements and failures per manager
//!
//! Failures are reported, never retried.
//!
//! # Submodules
//!
//! - [`recording`] - In-memory agent for local runs and tests
//! - [`types`] - Agent trait, acknowledgements, errors, and reports

pub mod recording;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::manager::{InvocationRequest, LifecycleManager, Operation};

pub use recording::RecordingAgent;
pub use types::{Acknowledgement, DispatchConfig, DispatchReport, RemoteAgent, RemoteExecutionError};

/// Deliver `request` to `agent`, waiting at most `caller_timeout`.
pub async fn dispatch<A: RemoteAgent>(
  request: &InvocationRequest,
  agent: &A,
  caller_timeout: Duration,
) -> Result<Acknowledgement, RemoteExecutionError> {
  debug!(
    function = %request.function_name,
    operation = %request.operation(),
    accessors = request.payload.accessors.len(),
    "dispatching lifecycle request"
  );

  match tokio::time::timeout(caller_timeout, agent.invoke(request)).await {
    Ok(Ok(ack)) => {
      info!(
        function = %ack.function_name,
        operation = %ack.operation,
        key = %ack.idempotency_key,
        "lifecycle request acknowledged"
      );
      Ok(ack)
    }
    Ok(Err(e)) => {
      warn!(error = %e, "lifecycle request failed");
      Err(e)
    }
    Err(_) => {
      let err = RemoteExecutionError::Timeout {
        function_name: request.function_name.clone(),
        operation: request.operation(),
        after: caller_timeout,
      };
      warn!(error = %err, "lifecycle request timed out");
      Err(err)
    }
  }
}

/// Deliver `operation` for every manager, at most `config.parallelism` at a time.
pub async fn dispatch_all<A>(
  managers: &[LifecycleManager],
  operation: Operation,
  agent: Arc<A>,
  config: &DispatchConfig,
) -> DispatchReport
where
  A: RemoteAgent + Send + Sync + 'static,
{
  info!(managers = managers.len(), operation = %operation, "dispatching lifecycle operation");

  let semaphore = Arc::new(Semaphore::new(config.parallelism.max(1)));
  let mut join_set = JoinSet::new();
  // Task id -> (manager key, function name).
  let mut in_flight = HashMap::new();

  for manager in managers {
    let key = manager.key();
    let request = manager.requests.get(operation).clone();
    let function_name = request.function_name.clone();
    let caller_timeout = manager.caller_timeout();
    let agent = agent.clone();
    let semaphore = semaphore.clone();

    let handle = join_set.spawn(async move {
      // The semaphore is never closed; a failed acquire only loses the bound.
      let _permit = semaphore.acquire().await.ok();
      dispatch(&request, agent.as_ref(), caller_timeout).await
    });
    in_flight.insert(handle.id(), (key, function_name));
  }

  let mut report = DispatchReport::default();
  while let Some(joined) = join_set.join_next_with_id().await {
    let (id, result) = match joined {
      Ok((id, result)) => (id, result),
      Err(e) => {
        error!(error = %e, "dispatch task failed");
        let id = e.id();
        let function_name = in_flight.get(&id).map(|(_, name)| name.clone()).unwrap_or_default();
        let lost = RemoteExecutionError::TaskFailed {
          function_name,
          operation,
          reason: e.to_string(),
        };
        (id, Err(lost))
      }
    };
    let Some((key, _)) = in_flight.remove(&id) else {
      continue;
    };
    match result {
      Ok(ack) => {
        report.delivered.insert(key, ack);
      }
      Err(e) => {
        report.failed.insert(key, e);
      }
    }
  }

  info!(
    delivered = report.delivered.len(),
    failed = report.failed.len(),
    "lifecycle operation dispatched"
  );
  report
}
