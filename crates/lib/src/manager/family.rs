//! Manager families and their registration facades.
//!
//! Every kind of lifecycle manager is a [`ManagedResource`]: it names its
//! registry partition with a stable [`ManagerFamily`] tag and supplies the
//! permissions an accessor gets when the caller does not list any.

use crate::registry::{self, GrantRequest, ManagerFamily, RegistryError};
use crate::unit::DeploymentUnit;

/// A kind of resource whose cross-account policy a lifecycle manager drives.
pub trait ManagedResource {
  /// Registry partition shared by every manager of this kind.
  const FAMILY: ManagerFamily;

  /// Permissions granted when a registration does not specify any.
  const DEFAULT_PERMISSIONS: &'static [&'static str];

  /// Human label for the target, used in declarations and diagnostics.
  const TARGET_LABEL: &'static str;

  /// Grant `accessor` the default permissions on `target`.
  fn allow(unit: &DeploymentUnit, target: &str, accessor: &str) -> Result<(), RegistryError> {
    register_accessor(unit, Self::FAMILY, target, accessor, Self::DEFAULT_PERMISSIONS.iter().copied())
  }

  /// Grant `accessor` explicit `permissions` on `target`.
  fn allow_with<I, S>(unit: &DeploymentUnit, target: &str, accessor: &str, permissions: I) -> Result<(), RegistryError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    register_accessor(unit, Self::FAMILY, target, accessor, permissions)
  }

  /// Structured form of [`allow`](Self::allow) / [`allow_with`](Self::allow_with).
  fn allow_accessor(unit: &DeploymentUnit, request: AllowAccessor) -> Result<(), RegistryError> {
    let permissions = match request.permissions {
      Some(permissions) => permissions,
      None => Self::DEFAULT_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
    };
    registry::register_grant(
      unit,
      GrantRequest::new(Self::FAMILY, request.target, request.accessor).with_permissions(permissions),
    )
  }
}

/// Named-field registration for a [`ManagedResource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowAccessor {
  pub target: String,
  pub accessor: String,
  /// `None` selects the family's default permissions.
  pub permissions: Option<Vec<String>>,
}

/// Register `accessor` for `target` under `family`.
///
/// Thin facade over [`registry::register`]; family types call this with their
/// own tag and default permissions.
pub fn register_accessor<I, S>(
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
  registry::register(unit, family, target, accessor, permissions)
}

/// Storage bucket policy manager.
#[derive(Debug, Clone, Copy)]
pub struct BucketPolicy;

impl ManagedResource for BucketPolicy {
  const FAMILY: ManagerFamily = ManagerFamily::new("bucket-policy");
  const DEFAULT_PERMISSIONS: &'static [&'static str] = &["s3:GetObject"];
  const TARGET_LABEL: &'static str = "bucket";
}

/// Encryption key policy manager.
#[derive(Debug, Clone, Copy)]
pub struct KeyPolicy;

impl ManagedResource for KeyPolicy {
  const FAMILY: ManagerFamily = ManagerFamily::new("key-policy");
  const DEFAULT_PERMISSIONS: &'static [&'static str] =
    &["kms:Decrypt", "kms:Encrypt", "kms:GenerateDataKey*", "kms:DescribeKey"];
  const TARGET_LABEL: &'static str = "key_id";
}
