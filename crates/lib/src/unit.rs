//! Deployment units.
//!
//! A deployment unit is an isolated collection of declarations, the equivalent
//! of one template or stack. It owns its grant registry: code that registers or
//! consumes grants must be handed the unit explicitly, and state can never leak
//! between two units in the same process.

use tracing::info;

use crate::registry::{GrantRegistry, RegistryError};

/// An isolated collection of resource declarations.
///
/// Units are compared by identity, never by value, so this type deliberately
/// implements neither `Clone` nor `PartialEq`. Share one through a reference
/// or an `Arc`.
#[derive(Debug)]
pub struct DeploymentUnit {
  name: String,
  account_id: String,
  registry: GrantRegistry,
}

impl DeploymentUnit {
  /// Create a unit named `name` that deploys into `account_id`.
  pub fn new(name: impl Into<String>, account_id: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      account_id: account_id.into(),
      registry: GrantRegistry::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn account_id(&self) -> &str {
    &self.account_id
  }

  pub fn registry(&self) -> &GrantRegistry {
    &self.registry
  }

  /// Close the declaration phase.
  ///
  /// Lifecycle managers may only be constructed after this call, and new
  /// grants are rejected from then on.
  pub fn seal(&self) -> Result<(), RegistryError> {
    info!(unit = %self.name, "sealing declarations");
    self.registry.seal()
  }

  pub fn is_sealed(&self) -> Result<bool, RegistryError> {
    self.registry.is_sealed()
  }
}
