//! Lifecycle managers.
//!
//! A lifecycle manager runs in the accessor account and drives the policy of a
//! resource owned by another account. Constructing one:
//!
//! 1. derives the remote management role (`<resource>-xa-mgmt`) and a local
//!    execution role allowed only to assume it
//! 2. consumes the unit's registry for the resource under the manager's family
//! 3. builds one payload per lifecycle operation from the frozen grant set
//!
//! The resulting create/update/delete requests are handed to a
//! [`RemoteAgent`](crate::execute::RemoteAgent) by the orchestration layer.
//!
//! # Submodules
//!
//! - [`family`] - Manager families and registration facades

pub mod family;
mod types;

pub use family::{AllowAccessor, BucketPolicy, KeyPolicy, ManagedResource, register_accessor};
pub use types::*;

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::{AGENT_SERVICE_PRINCIPAL, CALLER_PHYSICAL_ID};
use crate::execute::{self, Acknowledgement, RemoteAgent, RemoteExecutionError};
use crate::naming;
use crate::policy::PolicyStatement;
use crate::registry::{self, GrantRecord, ManagerFamily};
use crate::unit::DeploymentUnit;

/// A constructed lifecycle manager and the requests it emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleManager {
  pub family: String,
  pub resource_identifier: String,
  pub remote_account_id: String,
  pub management_role_arn: String,
  pub execution_role: ExecutionRole,
  pub agent: AgentSpec,
  /// Frozen grant set: accessor -> sorted permissions.
  pub accessors: BTreeMap<String, Vec<String>>,
  /// Budget for the orchestration layer's wait on the agent.
  pub caller_timeout_secs: u64,
  pub requests: LifecycleRequests,
}

impl LifecycleManager {
  /// Construct the manager for `props.resource_identifier` under `M`'s family.
  pub fn new<M: ManagedResource>(unit: &DeploymentUnit, props: ManagerProps) -> Result<Self, ManagerError> {
    Self::for_family(unit, M::FAMILY, props)
  }

  /// Construct a manager for an explicit family tag.
  ///
  /// Every check runs before the registry is consumed, so a rejected
  /// construction leaves the target open.
  pub fn for_family(unit: &DeploymentUnit, family: ManagerFamily, props: ManagerProps) -> Result<Self, ManagerError> {
    let ManagerProps {
      resource_identifier,
      remote_account_id,
      manager_timeout,
      caller_timeout,
    } = props;

    naming::validate_resource_identifier(&resource_identifier)?;
    naming::validate_account_id(&remote_account_id)?;
    if !is_whole_seconds(manager_timeout) || !is_whole_seconds(caller_timeout) {
      return Err(ManagerError::InvalidTimeout {
        target: resource_identifier,
      });
    }
    if !unit.is_sealed()? {
      return Err(ManagerError::DeclarationsOpen {
        unit: unit.name().to_string(),
        target: resource_identifier,
      });
    }

    let management_role_arn = naming::management_role_arn(&remote_account_id, &resource_identifier);
    let execution_role = ExecutionRole {
      role_name: naming::execution_role_name(&resource_identifier),
      description: format!("Execution role for {} manager agent.", resource_identifier),
      assumed_by: AGENT_SERVICE_PRINCIPAL.to_string(),
      policy: PolicyStatement::allow(["sts:AssumeRole"], [management_role_arn.as_str()]),
    };

    let grants = registry::consume(unit, family, &resource_identifier)?;
    let accessors = accessor_map(grants);

    let agent = AgentSpec {
      function_name: naming::agent_function_name(&resource_identifier),
      timeout_secs: manager_timeout.as_secs(),
      environment: BTreeMap::from([
        ("XA_MGMT_ROLE_ARN".to_string(), management_role_arn.clone()),
        ("RESOURCE_ID".to_string(), resource_identifier.clone()),
        ("ACCESSOR_ACCOUNT_ID".to_string(), unit.account_id().to_string()),
        ("ACCESSOR_STACK_NAME".to_string(), unit.name().to_string()),
      ]),
    };

    let request_for = |operation: Operation| InvocationRequest {
      physical_resource_id: CALLER_PHYSICAL_ID.to_string(),
      function_name: agent.function_name.clone(),
      invocation_type: InvocationType::Event,
      payload: LifecyclePayload {
        operation,
        accessors: accessors.clone(),
      },
    };
    let requests = LifecycleRequests {
      create: request_for(Operation::Create),
      update: request_for(Operation::Update),
      delete: request_for(Operation::Delete),
    };

    info!(
      family = %family,
      resource = %resource_identifier,
      remote_account = %remote_account_id,
      accessors = accessors.len(),
      "lifecycle manager created"
    );
    debug!(accessors = ?accessors, "manager grant set");

    Ok(Self {
      family: family.as_str().to_string(),
      resource_identifier,
      remote_account_id,
      management_role_arn,
      execution_role,
      agent,
      accessors,
      caller_timeout_secs: caller_timeout.as_secs(),
      requests,
    })
  }

  pub fn payload(&self, operation: Operation) -> &LifecyclePayload {
    &self.requests.get(operation).payload
  }

  pub fn caller_timeout(&self) -> Duration {
    Duration::from_secs(self.caller_timeout_secs)
  }

  /// Key identifying this manager within a manifest.
  pub fn key(&self) -> String {
    format!("{}/{}", self.family, self.resource_identifier)
  }

  /// Hand the request for `operation` to `agent`, bounded by the caller timeout.
  pub async fn dispatch<A: RemoteAgent>(
    &self,
    operation: Operation,
    agent: &A,
  ) -> Result<Acknowledgement, RemoteExecutionError> {
    execute::dispatch(self.requests.get(operation), agent, self.caller_timeout()).await
  }
}

/// Timeouts are carried as whole seconds, at least one.
fn is_whole_seconds(timeout: Duration) -> bool {
  timeout.as_secs() > 0 && timeout.subsec_nanos() == 0
}

fn accessor_map(grants: Vec<GrantRecord>) -> BTreeMap<String, Vec<String>> {
  grants
    .into_iter()
    .map(|grant| {
      let permissions = grant.sorted_permissions();
      (grant.accessor, permissions)
    })
    .collect()
}
