//! Grant registry.
//!
//! The registry accumulates "accessor needs these permissions on that target"
//! facts during the declaration phase and hands them, exactly once, to the
//! lifecycle manager for the target.
//!
//! # Keying
//!
//! Each [`DeploymentUnit`] owns one [`GrantRegistry`], so units never observe
//! each other's grants and a registry lives exactly as long as its unit. Inside
//! a registry, grants are partitioned by [`ManagerFamily`] and then by target.
//!
//! # State machine
//!
//! Per (unit, family, target): `OPEN -> CONSUMED`. `OPEN` accepts any number of
//! distinct accessors. [`GrantRegistry::consume`] performs the only transition;
//! every later `register` or `consume` on that triple fails with
//! [`RegistryError::AlreadyConsumed`].
//!
//! # Submodules
//!
//! - [`consumption`] - Per-target consumption marks

pub mod consumption;
mod types;

pub use types::*;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::unit::DeploymentUnit;
use consumption::ConsumptionTracker;

#[derive(Debug, Default)]
struct Partition {
  grants: HashMap<String, Vec<GrantRecord>>,
  consumption: ConsumptionTracker,
}

#[derive(Debug, Default)]
struct RegistryState {
  sealed: bool,
  partitions: HashMap<ManagerFamily, Partition>,
}

impl RegistryState {
  fn partition_mut(&mut self, family: ManagerFamily) -> &mut Partition {
    self.partitions.entry(family).or_default()
  }
}

/// The grant store of a single deployment unit.
///
/// All mutations go through one lock, so a `register` racing a `consume` on
/// the same target either lands before the freeze or fails.
#[derive(Debug, Default)]
pub struct GrantRegistry {
  state: Mutex<RegistryState>,
}

impl GrantRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> Result<MutexGuard<'_, RegistryState>, RegistryError> {
    self.state.lock().map_err(|_| RegistryError::LockPoisoned)
  }

  /// Record that `accessor` needs `permissions` on `target` under `family`.
  ///
  /// # Errors
  ///
  /// - [`RegistryError::AlreadyConsumed`] if a manager already consumed `target`
  /// - [`RegistryError::DeclarationsSealed`] if the registry is sealed, even for
  ///   a target no manager will ever consume
  /// - [`RegistryError::DuplicateGrant`] if `accessor` is already registered
  pub fn register<I, S>(
    &self,
    family: ManagerFamily,
    target: &str,
    accessor: &str,
    permissions: I,
  ) -> Result<(), RegistryError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut state = self.lock()?;
    let sealed = state.sealed;
    let partition = state.partition_mut(family);

    partition.consumption.ensure_open(target, accessor).inspect_err(|err| {
      warn!(family = %family, resource = target, accessor, error = %err, "rejected registration");
    })?;

    if sealed {
      warn!(family = %family, resource = target, accessor, "registration after declarations were sealed");
      return Err(RegistryError::DeclarationsSealed {
        target: target.to_string(),
        accessor: accessor.to_string(),
      });
    }

    let grants = partition.grants.entry(target.to_string()).or_default();
    if grants.iter().any(|grant| grant.accessor == accessor) {
      warn!(family = %family, resource = target, accessor, "duplicate grant");
      return Err(RegistryError::DuplicateGrant {
        target: target.to_string(),
        accessor: accessor.to_string(),
      });
    }

    let record = GrantRecord::new(accessor, target, permissions);
    debug!(family = %family, resource = target, accessor, permissions = ?record.permissions, "grant registered");
    grants.push(record);
    Ok(())
  }

  /// Structured form of [`register`](Self::register).
  pub fn register_grant(&self, request: GrantRequest) -> Result<(), RegistryError> {
    self.register(request.family, &request.target, &request.accessor, request.permissions)
  }

  /// Freeze `target` under `family` and return its grants in registration order.
  pub fn consume(&self, family: ManagerFamily, target: &str) -> Result<Vec<GrantRecord>, RegistryError> {
    let mut state = self.lock()?;
    let partition = state.partition_mut(family);

    partition.consumption.mark_consumed(target).inspect_err(|err| {
      warn!(family = %family, resource = target, error = %err, "rejected consumption");
    })?;

    let grants: Vec<GrantRecord> = partition
      .grants
      .get(target)
      .map(|grants| grants.iter().filter(|g| g.target == target).cloned().collect())
      .unwrap_or_default();

    info!(family = %family, resource = target, grant_count = grants.len(), "registry consumed");
    Ok(grants)
  }

  /// Whether `target` under `family` has been consumed. Unknown triples are open.
  pub fn is_consumed(&self, family: ManagerFamily, target: &str) -> bool {
    self
      .lock()
      .map(|state| {
        state
          .partitions
          .get(&family)
          .is_some_and(|partition| partition.consumption.is_consumed(target))
      })
      .unwrap_or(false)
  }

  /// Close the declaration phase. Idempotent.
  pub fn seal(&self) -> Result<(), RegistryError> {
    let mut state = self.lock()?;
    if !state.sealed {
      state.sealed = true;
      let pending: usize = state
        .partitions
        .values()
        .flat_map(|partition| partition.grants.values())
        .map(Vec::len)
        .sum();
      info!(pending_grants = pending, "declarations sealed");
    }
    Ok(())
  }

  pub fn is_sealed(&self) -> Result<bool, RegistryError> {
    Ok(self.lock()?.sealed)
  }

  /// Targets registered under `family` that no manager has consumed yet.
  pub fn unconsumed_targets(&self, family: ManagerFamily) -> Result<Vec<String>, RegistryError> {
    let state = self.lock()?;
    let mut targets: Vec<String> = state
      .partitions
      .get(&family)
      .map(|partition| {
        partition
          .grants
          .keys()
          .filter(|target| !partition.consumption.is_consumed(target))
          .cloned()
          .collect()
      })
      .unwrap_or_default();
    targets.sort();
    Ok(targets)
  }
}

/// Register a grant in `unit`'s registry.
///
/// Fails as [`GrantRegistry::register`] does.
pub fn register<I, S>(
  unit: &DeploymentUnit,
  family: ManagerFamily,
  target: &str,
  accessor: &str,
  permissions: I,
) -> Result<(), RegistryError>
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  unit.registry().register(family, target, accessor, permissions)
}

/// Register a grant in `unit`'s registry from its structured form.
pub fn register_grant(unit: &DeploymentUnit, request: GrantRequest) -> Result<(), RegistryError> {
  unit.registry().register_grant(request)
}

/// Consume the grants for `target` under `family` in `unit`.
pub fn consume(unit: &DeploymentUnit, family: ManagerFamily, target: &str) -> Result<Vec<GrantRecord>, RegistryError> {
  unit.registry().consume(family, target)
}

/// Whether `target` under `family` in `unit` has been consumed.
pub fn is_consumed(unit: &DeploymentUnit, family: ManagerFamily, target: &str) -> bool {
  unit.registry().is_consumed(family, target)
}
