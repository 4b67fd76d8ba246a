//! Registry types: manager families, grant records, and registry errors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies which kind of lifecycle manager owns a slice of the registry.
///
/// Each manager kind declares one stable tag. All managers of the same family
/// within a deployment unit share one registry namespace, so grants can be
/// registered before any manager instance exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManagerFamily(&'static str);

impl ManagerFamily {
  /// Create a family from its tag.
  pub const fn new(tag: &'static str) -> Self {
    Self(tag)
  }

  /// The family's tag.
  pub fn as_str(&self) -> &'static str {
    self.0
  }
}

impl std::fmt::Display for ManagerFamily {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.0)
  }
}

/// A single "accessor needs these permissions on that target" fact.
///
/// Permissions are held in a [`BTreeSet`], so they are deduplicated and sorted
/// from the moment the record is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRecord {
  /// The consuming principal or resource (e.g. a CDN distribution id).
  pub accessor: String,
  /// The owned resource whose policy is managed.
  pub target: String,
  /// Normalized permission set.
  pub permissions: BTreeSet<String>,
}

impl GrantRecord {
  pub fn new<I, S>(accessor: impl Into<String>, target: impl Into<String>, permissions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      accessor: accessor.into(),
      target: target.into(),
      permissions: permissions.into_iter().map(Into::into).collect(),
    }
  }

  /// Permissions as a sorted list, ready for externalization.
  pub fn sorted_permissions(&self) -> Vec<String> {
    self.permissions.iter().cloned().collect()
  }
}

/// Structured form of a registration, equivalent to the positional
/// [`register`](super::register) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRequest {
  pub family: ManagerFamily,
  pub target: String,
  pub accessor: String,
  pub permissions: Vec<String>,
}

impl GrantRequest {
  pub fn new(family: ManagerFamily, target: impl Into<String>, accessor: impl Into<String>) -> Self {
    Self {
      family,
      target: target.into(),
      accessor: accessor.into(),
      permissions: Vec::new(),
    }
  }

  pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.permissions = permissions.into_iter().map(Into::into).collect();
    self
  }
}

/// Errors raised by the grant registry.
///
/// These are configuration or programmer errors: they are raised synchronously
/// at the call site and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
  /// Registration or re-consumption attempted after the target was frozen.
  #[error("{}", already_consumed_message(.target, .accessor.as_deref()))]
  AlreadyConsumed { target: String, accessor: Option<String> },

  /// The same accessor was registered twice for one target.
  #[error("`{accessor}` has already been registered for `{target}` manager")]
  DuplicateGrant { target: String, accessor: String },

  /// Registration attempted after the deployment unit sealed its declarations.
  #[error("cannot register `{accessor}` for `{target}` manager: declarations are sealed")]
  DeclarationsSealed { target: String, accessor: String },

  /// A thread panicked while holding the registry lock.
  #[error("grant registry lock poisoned")]
  LockPoisoned,
}

impl RegistryError {
  /// The target named by this error, if any.
  pub fn target(&self) -> Option<&str> {
    match self {
      RegistryError::AlreadyConsumed { target, .. }
      | RegistryError::DuplicateGrant { target, .. }
      | RegistryError::DeclarationsSealed { target, .. } => Some(target),
      RegistryError::LockPoisoned => None,
    }
  }
}

fn already_consumed_message(target: &str, accessor: Option<&str>) -> String {
  match accessor {
    Some(accessor) => format!("Cannot register resources for `{target}` manager after creation (registering `{accessor}`)"),
    None => format!("Manager for `{target}` has already been consumed"),
  }
}
