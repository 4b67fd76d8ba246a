//! Configuration file evaluation.
//!
//! This module provides the `evaluate_config` function which takes a Lua
//! configuration file and a deployment unit and returns the resulting
//! [`Manifest`].
//!
//! A configuration returns a table with two phases:
//!
//! ```lua
//! return {
//!   setup = function()
//!     xa.bucket.allow_cloudfront({ bucket = "assets", distribution_id = "E123" })
//!   end,
//!   managers = function()
//!     xa.bucket.manager({ bucket = "assets", account = "098765432109" })
//!   end,
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use mlua::prelude::*;
use tracing::{info, warn};

use crate::lua::{LuaContext, runtime};
use crate::manager::{BucketPolicy, KeyPolicy, ManagedResource};
use crate::manifest::Manifest;
use crate::registry::{ManagerFamily, RegistryError};
use crate::unit::DeploymentUnit;

/// Errors that can occur during config evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  /// Lua evaluation error, including errors raised by `xa` functions.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// The unit's registry failed outside of a Lua call.
  #[error(transparent)]
  Registry(#[from] RegistryError),

  /// The configuration does not have the expected shape.
  #[error("invalid config: {0}")]
  InvalidConfig(String),
}

/// Families whose unconsumed grants are reported after evaluation.
const FAMILIES: [ManagerFamily; 2] = [BucketPolicy::FAMILY, KeyPolicy::FAMILY];

/// Evaluate a Lua configuration file against `unit`.
///
/// This function:
/// 1. Creates a Lua runtime with the `xa` global bound to `unit`
/// 2. Loads and executes the configuration file
/// 3. Calls `setup()` (the declaration phase)
/// 4. Seals the unit
/// 5. Calls `managers()`, if present
/// 6. Returns the manifest of every management role and manager declared
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use std::sync::Arc;
/// use xaccess_lib::{eval::evaluate_config, unit::DeploymentUnit};
///
/// let unit = Arc::new(DeploymentUnit::new("accessor-stack", "111111111111"));
/// let manifest = evaluate_config(Path::new("init.lua"), unit)?;
/// println!("Managers: {}", manifest.managers.len());
/// ```
pub fn evaluate_config(path: &Path, unit: Arc<DeploymentUnit>) -> Result<Manifest, EvalError> {
  info!(path = %path.display(), unit = %unit.name(), "evaluating config");
  evaluate(unit, |lua| runtime::load_file(lua, path))
}

/// Evaluate Lua configuration source against `unit`.
pub fn evaluate_str(source: &str, unit: Arc<DeploymentUnit>) -> Result<Manifest, EvalError> {
  evaluate(unit, |lua| runtime::load_str(lua, source, "=config"))
}

fn evaluate<F>(unit: Arc<DeploymentUnit>, load: F) -> Result<Manifest, EvalError>
where
  F: FnOnce(&Lua) -> LuaResult<LuaValue>,
{
  let ctx = LuaContext::new(unit.clone());

  {
    let lua = runtime::create_runtime(&ctx)?;
    let config = load(&lua)?;

    let LuaValue::Table(config_table) = config else {
      return Err(EvalError::InvalidConfig(
        "config must return a table with 'setup' and 'managers' fields".to_string(),
      ));
    };

    let setup: Option<LuaFunction> = config_table.get("setup")?;
    let managers: Option<LuaFunction> = config_table.get("managers")?;
    let Some(setup) = setup else {
      return Err(EvalError::InvalidConfig("config must have a 'setup' function".to_string()));
    };

    setup.call::<()>(())?;
    unit.seal()?;
    if let Some(managers) = managers {
      managers.call::<()>(())?;
    }
  }

  let mut manifest = ctx.manifest.borrow().clone();
  for family in FAMILIES {
    let targets = unit.registry().unconsumed_targets(family)?;
    if !targets.is_empty() {
      warn!(family = %family, targets = ?targets, "grants registered without a manager");
      manifest.unmanaged_targets.insert(family.as_str().to_string(), targets);
    }
  }

  info!(
    roles = manifest.management_roles.len(),
    managers = manifest.managers.len(),
    "config evaluated"
  );
  Ok(manifest)
}
