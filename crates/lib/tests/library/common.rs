//! Shared helpers for library integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use xaccess_lib::unit::DeploymentUnit;

pub const ACCESSOR_ACCOUNT: &str = "111111111111";
pub const OWNER_ACCOUNT: &str = "098765432109";

/// A fresh, unsealed accessor-side unit.
pub fn accessor_unit() -> Arc<DeploymentUnit> {
  Arc::new(DeploymentUnit::new("accessor-stack", ACCESSOR_ACCOUNT))
}

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

pub fn strings(values: &[&str]) -> Vec<String> {
  values.iter().map(|s| s.to_string()).collect()
}
