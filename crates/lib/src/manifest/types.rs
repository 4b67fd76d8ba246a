//! Manifest types for xaccess.
//!
//! The manifest is the evaluated result of one deployment unit: every
//! management role declared on the owning side and every lifecycle manager
//! constructed on the accessor side.
//!
//! # Structure
//!
//! - `management_roles`: keyed by role name
//! - `managers`: keyed by `<family>/<resource>`
//! - `unmanaged_targets`: targets that received grants but no manager, per family
//!
//! # Ordering
//!
//! Every map is a [`BTreeMap`], so two evaluations of the same declarations
//! serialize, and therefore hash, identically.
//!
//! # Example
//!
//! ```json
//! {
//!   "unit": "accessor-stack",
//!   "account_id": "111111111111",
//!   "management_roles": {},
//!   "managers": {
//!     "bucket-policy/bucket1": { "function_name": "...", "accessors": { "distA": ["s3:GetObject"] }, ... }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manager::LifecycleManager;
use crate::provision::ManagementRole;
use crate::unit::DeploymentUnit;
use crate::util::hash::Hashable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
  #[error("management role `{0}` is declared twice")]
  DuplicateRole(String),

  #[error("manager `{0}` is declared twice")]
  DuplicateManager(String),
}

/// Serializable record of an evaluated deployment unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
  pub unit: String,
  pub account_id: String,
  #[serde(default)]
  pub management_roles: BTreeMap<String, ManagementRole>,
  #[serde(default)]
  pub managers: BTreeMap<String, LifecycleManager>,
  /// Family -> targets whose grants no manager consumed.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub unmanaged_targets: BTreeMap<String, Vec<String>>,
}

impl Hashable for Manifest {}

impl Manifest {
  pub fn new(unit: &DeploymentUnit) -> Self {
    Self {
      unit: unit.name().to_string(),
      account_id: unit.account_id().to_string(),
      ..Default::default()
    }
  }

  pub fn add_management_role(&mut self, role: ManagementRole) -> Result<(), ManifestError> {
    if self.management_roles.contains_key(&role.role_name) {
      return Err(ManifestError::DuplicateRole(role.role_name));
    }
    self.management_roles.insert(role.role_name.clone(), role);
    Ok(())
  }

  pub fn add_manager(&mut self, manager: LifecycleManager) -> Result<(), ManifestError> {
    let key = manager.key();
    if self.managers.contains_key(&key) {
      return Err(ManifestError::DuplicateManager(key));
    }
    self.managers.insert(key, manager);
    Ok(())
  }

  pub fn is_empty(&self) -> bool {
    self.management_roles.is_empty() && self.managers.is_empty()
  }
}
