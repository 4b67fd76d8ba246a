//! Lifecycle manager types: operations, payloads, requests, and props.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_CALLER_TIMEOUT_SECS, DEFAULT_MANAGER_TIMEOUT_SECS};
use crate::naming::NamingError;
use crate::policy::PolicyStatement;
use crate::registry::RegistryError;
use crate::util::hash::Hashable;

/// A lifecycle event of the owning deployment unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
  Create,
  Update,
  Delete,
}

impl Operation {
  pub const ALL: [Operation; 3] = [Operation::Create, Operation::Update, Operation::Delete];

  pub fn as_str(&self) -> &'static str {
    match self {
      Operation::Create => "create",
      Operation::Update => "update",
      Operation::Delete => "delete",
    }
  }
}

impl std::fmt::Display for Operation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Operation {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "create" => Ok(Operation::Create),
      "update" => Ok(Operation::Update),
      "delete" => Ok(Operation::Delete),
      other => Err(format!("unknown operation '{}': expected create, update, or delete", other)),
    }
  }
}

/// The document handed to the remote agent.
///
/// ```json
/// { "operation": "create", "accessors": { "distA": ["read"], "distB": ["read", "write"] } }
/// ```
///
/// Accessors are a [`BTreeMap`] of sorted lists, so identical registration sets
/// always serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecyclePayload {
  pub operation: Operation,
  pub accessors: BTreeMap<String, Vec<String>>,
}

impl LifecyclePayload {
  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string(self)
  }
}

/// How the transport hands a request to the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationType {
  /// Asynchronous: the caller only waits for the agent to accept the request.
  #[default]
  Event,
  /// Synchronous: the caller waits for the agent to finish.
  RequestResponse,
}

/// One lifecycle call to the remote agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
  /// Stable id shared by the create/update/delete requests of one manager, so
  /// the orchestration layer treats them as one resource.
  pub physical_resource_id: String,
  pub function_name: String,
  pub invocation_type: InvocationType,
  pub payload: LifecyclePayload,
}

impl Hashable for InvocationRequest {}

impl InvocationRequest {
  pub fn operation(&self) -> Operation {
    self.payload.operation
  }
}

/// The three requests a manager emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleRequests {
  pub create: InvocationRequest,
  pub update: InvocationRequest,
  pub delete: InvocationRequest,
}

impl LifecycleRequests {
  pub fn get(&self, operation: Operation) -> &InvocationRequest {
    match operation {
      Operation::Create => &self.create,
      Operation::Update => &self.update,
      Operation::Delete => &self.delete,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &InvocationRequest> {
    [&self.create, &self.update, &self.delete].into_iter()
  }
}

/// The accessor-side role the agent runs as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRole {
  pub role_name: String,
  pub description: String,
  /// Service allowed to run as this role.
  pub assumed_by: String,
  /// The only permission: assume the remote management role.
  pub policy: PolicyStatement,
}

/// The agent the manager drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
  pub function_name: String,
  /// Execution budget of the agent itself.
  pub timeout_secs: u64,
  pub environment: BTreeMap<String, String>,
}

/// Inputs to [`LifecycleManager`](super::LifecycleManager) construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerProps {
  /// The target identifier used during registration.
  pub resource_identifier: String,
  /// Account that owns the resource.
  pub remote_account_id: String,
  pub manager_timeout: Duration,
  pub caller_timeout: Duration,
}

impl ManagerProps {
  pub fn new(resource_identifier: impl Into<String>, remote_account_id: impl Into<String>) -> Self {
    Self {
      resource_identifier: resource_identifier.into(),
      remote_account_id: remote_account_id.into(),
      manager_timeout: Duration::from_secs(DEFAULT_MANAGER_TIMEOUT_SECS),
      caller_timeout: Duration::from_secs(DEFAULT_CALLER_TIMEOUT_SECS),
    }
  }

  pub fn with_manager_timeout(mut self, timeout: Duration) -> Self {
    self.manager_timeout = timeout;
    self
  }

  pub fn with_caller_timeout(mut self, timeout: Duration) -> Self {
    self.caller_timeout = timeout;
    self
  }
}

/// Errors raised while constructing a lifecycle manager.
#[derive(Debug, Error)]
pub enum ManagerError {
  /// Registry errors propagate unmodified.
  #[error(transparent)]
  Registry(#[from] RegistryError),

  #[error(transparent)]
  Naming(#[from] NamingError),

  /// The unit's declarations must be sealed before managers consume them.
  #[error("cannot create manager for `{target}`: declarations of unit `{unit}` are not sealed")]
  DeclarationsOpen { unit: String, target: String },

  #[error("timeout for `{target}` must be a whole number of seconds, at least one")]
  InvalidTimeout { target: String },
}
