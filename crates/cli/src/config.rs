//! Deployment unit settings.
//!
//! The unit name and account come from `--unit`/`--account`, falling back to
//! `XA_UNIT_NAME`/`XA_ACCOUNT_ID`. The unit name finally defaults to the
//! config file's stem.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;

use xaccess_lib::naming;
use xaccess_lib::unit::DeploymentUnit;

pub const UNIT_NAME_ENV: &str = "XA_UNIT_NAME";
pub const ACCOUNT_ID_ENV: &str = "XA_ACCOUNT_ID";

#[derive(Debug, Clone, Default, Args)]
pub struct UnitArgs {
  /// Deployment unit name [env: XA_UNIT_NAME]
  #[arg(long, global = true)]
  pub unit: Option<String>,

  /// Account the unit deploys into [env: XA_ACCOUNT_ID]
  #[arg(long, global = true)]
  pub account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitConfig {
  pub name: String,
  pub account_id: String,
}

impl UnitConfig {
  pub fn into_unit(self) -> Arc<DeploymentUnit> {
    Arc::new(DeploymentUnit::new(self.name, self.account_id))
  }
}

impl UnitArgs {
  /// Resolve flags and environment into a unit config for `config_path`.
  pub fn resolve(&self, config_path: &Path) -> Result<UnitConfig> {
    let name = match self.unit.clone().or_else(|| std::env::var(UNIT_NAME_ENV).ok()) {
      Some(name) => name,
      None => config_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "default".to_string()),
    };
    if name.is_empty() {
      bail!("unit name must not be empty");
    }

    let Some(account_id) = self.account.clone().or_else(|| std::env::var(ACCOUNT_ID_ENV).ok()) else {
      bail!("no account id: pass --account or set {}", ACCOUNT_ID_ENV);
    };
    naming::validate_account_id(&account_id).with_context(|| format!("Invalid account id for unit '{}'", name))?;

    Ok(UnitConfig { name, account_id })
  }
}
