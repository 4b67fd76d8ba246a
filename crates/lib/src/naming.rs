//! Role naming contract shared by the owning and accessor accounts.
//!
//! The owned resource's management role is `<resource>-xa-mgmt`; the accessor
//! side's execution role is `<resource>-xa-mgmt-ex`. Both sides derive these
//! independently, so the names must be deterministic and must fit the
//! provider's 64-character role name limit.

use thiserror::Error;

use crate::consts::{AGENT_FUNCTION_SUFFIX, EXECUTION_ROLE_SUFFIX, MANAGEMENT_ROLE_SUFFIX, MAX_RESOURCE_IDENTIFIER_LEN};

/// Errors in identifiers that feed the naming contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
  #[error("resource identifier must not be empty")]
  EmptyIdentifier,

  #[error("resource identifier `{identifier}` is {len} characters; must be {max} characters or less")]
  IdentifierTooLong { identifier: String, len: usize, max: usize },

  #[error("invalid account id `{0}`: expected 12 digits")]
  InvalidAccountId(String),
}

/// Check that `identifier` can be suffixed into valid role names.
pub fn validate_resource_identifier(identifier: &str) -> Result<(), NamingError> {
  if identifier.is_empty() {
    return Err(NamingError::EmptyIdentifier);
  }
  let len = identifier.chars().count();
  if len > MAX_RESOURCE_IDENTIFIER_LEN {
    return Err(NamingError::IdentifierTooLong {
      identifier: identifier.to_string(),
      len,
      max: MAX_RESOURCE_IDENTIFIER_LEN,
    });
  }
  Ok(())
}

/// Check that `account_id` is a 12-digit account id.
pub fn validate_account_id(account_id: &str) -> Result<(), NamingError> {
  if account_id.len() == 12 && account_id.chars().all(|c| c.is_ascii_digit()) {
    Ok(())
  } else {
    Err(NamingError::InvalidAccountId(account_id.to_string()))
  }
}

pub fn management_role_name(resource_identifier: &str) -> String {
  format!("{}{}", resource_identifier, MANAGEMENT_ROLE_SUFFIX)
}

pub fn execution_role_name(resource_identifier: &str) -> String {
  format!("{}{}", resource_identifier, EXECUTION_ROLE_SUFFIX)
}

pub fn agent_function_name(resource_identifier: &str) -> String {
  format!("{}{}", resource_identifier, AGENT_FUNCTION_SUFFIX)
}

pub fn role_arn(account_id: &str, role_name: &str) -> String {
  format!("arn:aws:iam::{}:role/{}", account_id, role_name)
}

pub fn management_role_arn(account_id: &str, resource_identifier: &str) -> String {
  role_arn(account_id, &management_role_name(resource_identifier))
}

pub fn execution_role_arn(account_id: &str, resource_identifier: &str) -> String {
  role_arn(account_id, &execution_role_name(resource_identifier))
}
