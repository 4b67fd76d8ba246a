//! Management roles on the owning side.
//!
//! The owning account provisions, next to each cross-account resource, a role
//! named `<resource>-xa-mgmt`. The role may only read and write the resource's
//! policy, and only the accessor accounts' `<resource>-xa-mgmt-ex` roles may
//! assume it.
//!
//! Provisioning the resource itself is left to the infrastructure layer; this
//! module only describes the trust boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::naming::{self, NamingError};
use crate::policy::PolicyStatement;

/// Actions the management role of a bucket may perform.
pub const BUCKET_POLICY_ACTIONS: &[&str] = &["s3:GetBucketPolicy", "s3:PutBucketPolicy"];

/// Actions the management role of a key may perform.
pub const KEY_POLICY_ACTIONS: &[&str] = &["kms:GetKeyPolicy", "kms:PutKeyPolicy"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
  #[error(transparent)]
  Naming(#[from] NamingError),

  #[error("management role for `{0}` must trust at least one account")]
  NoTrustedAccounts(String),
}

/// Description of a resource's cross-account management role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementRole {
  pub resource_identifier: String,
  pub role_name: String,
  pub description: String,
  /// Inline policy letting the role update the resource policy.
  pub policy: PolicyStatement,
  /// Assume-role statement naming every whitelisted execution role.
  pub trust: PolicyStatement,
}

impl ManagementRole {
  /// Describe the management role for `resource_identifier`.
  ///
  /// `policy_target` is the resource the role acts on (usually an ARN) and
  /// `accessor_accounts` the accounts whose execution roles may assume it.
  pub fn new<S: AsRef<str>>(
    resource_identifier: &str,
    policy_target: &str,
    actions: &[&str],
    accessor_accounts: &[S],
  ) -> Result<Self, ProvisionError> {
    naming::validate_resource_identifier(resource_identifier)?;
    if accessor_accounts.is_empty() {
      return Err(ProvisionError::NoTrustedAccounts(resource_identifier.to_string()));
    }

    let mut principals = Vec::with_capacity(accessor_accounts.len());
    for account in accessor_accounts {
      let account = account.as_ref();
      naming::validate_account_id(account)?;
      principals.push(naming::execution_role_arn(account, resource_identifier));
    }
    principals.sort();
    principals.dedup();

    let role_name = naming::management_role_name(resource_identifier);
    info!(
      role = %role_name,
      resource = policy_target,
      trusted = principals.len(),
      "describing management role"
    );

    Ok(Self {
      resource_identifier: resource_identifier.to_string(),
      description: format!(
        "IAM role to enable cross-account management of policy for {}",
        resource_identifier
      ),
      policy: PolicyStatement::allow(actions.iter().copied(), [policy_target]),
      trust: PolicyStatement::trust(["sts:AssumeRole"], principals),
      role_name,
    })
  }

  /// Management role for a storage bucket.
  pub fn for_bucket<S: AsRef<str>>(bucket_name: &str, accessor_accounts: &[S]) -> Result<Self, ProvisionError> {
    let bucket_arn = format!("arn:aws:s3:::{}", bucket_name);
    Self::new(bucket_name, &bucket_arn, BUCKET_POLICY_ACTIONS, accessor_accounts)
  }

  /// Management role for an encryption key.
  pub fn for_key<S: AsRef<str>>(key_id: &str, key_arn: &str, accessor_accounts: &[S]) -> Result<Self, ProvisionError> {
    Self::new(key_id, key_arn, KEY_POLICY_ACTIONS, accessor_accounts)
  }

  /// ARN of this role once created in `account_id`.
  pub fn arn(&self, account_id: &str) -> String {
    naming::role_arn(account_id, &self.role_name)
  }

  pub fn trusted_principals(&self) -> &[String] {
    &self.trust.principals
  }
}
